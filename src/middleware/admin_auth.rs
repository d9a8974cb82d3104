use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;
use subtle::ConstantTimeEq;

/// Bearer-token guard for the admin scope.
///
/// Requests need `Authorization: Bearer <ADMIN_API_KEY>`. With no key
/// configured every request is refused.
pub struct AdminAuth {
    api_key: Option<Rc<str>>,
}

impl AdminAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(Rc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthMiddleware {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        }))
    }
}

pub struct AdminAuthMiddleware<S> {
    service: Rc<S>,
    api_key: Option<Rc<str>>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let api_key = self.api_key.clone();

        Box::pin(async move {
            let expected = api_key
                .ok_or_else(|| Error::from(AppError::unauthorized("Admin API is disabled")))?;

            let provided = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    Error::from(AppError::unauthorized("Missing bearer token"))
                })?;

            if !bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
                tracing::warn!(path = %req.path(), "Rejected admin request with invalid token");
                return Err(Error::from(AppError::unauthorized("Invalid bearer token")));
            }

            svc.call(req).await
        })
    }
}
