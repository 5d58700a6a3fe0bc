//! # Yatube Core
//!
//! The domain layer of the Yatube blog.
//! Entities, repository ports, the pagination engine and the post services
//! live here, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use pagination::{Page, Paginator};
