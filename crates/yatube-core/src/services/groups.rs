//! Group administration.

use std::sync::Arc;

use crate::domain::Group;
use crate::error::{DomainError, RepoError};
use crate::ports::GroupRepository;

#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.list_all().await?)
    }

    pub async fn get(&self, slug: &str) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(slug.to_string())
            .await?
            .ok_or_else(|| DomainError::not_found("Group", slug))
    }

    pub async fn create(
        &self,
        slug: &str,
        title: &str,
        description: &str,
    ) -> Result<Group, DomainError> {
        let group = Group::new(slug, title, description)?;
        if self.groups.find_by_id(group.slug.clone()).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "group '{}' already exists",
                group.slug
            )));
        }

        let group = self.groups.create(group).await?;
        tracing::info!(slug = %group.slug, "Group created: {group}");
        Ok(group)
    }

    /// Remove a group. Its posts survive with no group.
    pub async fn delete(&self, slug: &str) -> Result<(), DomainError> {
        self.groups
            .delete(slug.to_string())
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found("Group", slug),
                other => other.into(),
            })?;
        tracing::info!(slug = %slug, "Group deleted");
        Ok(())
    }
}
