//! Request ID middleware - tags every request with an ID that appears in
//! the logs and is echoed back in the `X-Request-ID` response header.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_INCOMING_LEN: usize = 64;

/// Reuse a well-formed incoming ID (from a proxy or client), otherwise mint one.
fn resolve_request_id(incoming: Option<&HeaderValue>) -> String {
    incoming
        .and_then(|v| v.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_INCOMING_LEN
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        })
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestIdService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = resolve_request_id(req.headers().get(&REQUEST_ID_HEADER));
        let span = tracing::info_span!("request", request_id = %request_id);

        let fut = span.in_scope(|| self.service.call(req));

        Box::pin(
            async move {
                let mut res = fut.await?;
                if let Ok(value) = HeaderValue::from_str(&request_id) {
                    res.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_well_formed_incoming_id() {
        let value = HeaderValue::from_static("abc-123_x.y");
        assert_eq!(resolve_request_id(Some(&value)), "abc-123_x.y");
    }

    #[test]
    fn test_replaces_suspicious_incoming_id() {
        let value = HeaderValue::from_static("bad id with spaces");
        let id = resolve_request_id(Some(&value));
        assert!(Uuid::parse_str(&id).is_ok());

        let long = HeaderValue::from_str(&"a".repeat(65)).unwrap();
        assert_ne!(resolve_request_id(Some(&long)), "a".repeat(65));
    }

    #[test]
    fn test_generates_when_missing() {
        assert!(Uuid::parse_str(&resolve_request_id(None)).is_ok());
    }
}
