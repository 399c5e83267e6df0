/// HTTP middleware utilities for discussion-service
///
/// Authentication lives in the upstream gateway; requests arrive with the
/// caller's identity in the `X-User-Id` header. The extractor here is the
/// only seam the engine has with that collaborator.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

/// Header carrying the authenticated caller's id, set by the gateway.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Extracted user identifier for handlers that mutate or vote.
#[derive(Debug, Clone)]
pub struct UserId(pub Uuid);

impl FromRequest for UserId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let parsed = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ErrorUnauthorized("Missing X-User-Id header"))
            .and_then(|raw| {
                Uuid::parse_str(raw).map_err(|_| ErrorUnauthorized("Invalid user ID"))
            })
            .map(UserId);

        ready(parsed)
    }
}

// =====================================================================
// Request metrics
// =====================================================================

/// Logs per-request latency at debug level.
pub struct MetricsMiddleware;

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let path = req.path().to_string();
        let method = req.method().to_string();
        let start = Instant::now();

        Box::pin(async move {
            let res = service.call(req).await;
            let elapsed = start.elapsed().as_millis();
            match &res {
                Ok(response) => {
                    let status = response.status().as_u16();
                    tracing::debug!(%method, %path, status, %elapsed, "request completed");
                }
                Err(_) => {
                    tracing::debug!(%method, %path, %elapsed, "request failed");
                }
            }
            res
        })
    }
}
