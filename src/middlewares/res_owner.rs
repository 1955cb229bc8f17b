use std::future::{Ready, ready};

use crate::utils::jwt::Claims;
use actix_web::error::{ErrorForbidden, ErrorUnauthorized};
use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;

/// Only lets a request through when the owner id in the path matches the token subject.
pub struct ResourceOwnership {
    pub param_name: String, // Name of the URL parameter that contains the owner id
}

impl<S, B> Transform<S, ServiceRequest> for ResourceOwnership
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = ResourceOwnershipMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResourceOwnershipMiddleware {
            service,
            param_name: self.param_name.clone(),
        }))
    }
}

pub struct ResourceOwnershipMiddleware<S> {
    service: S,
    param_name: String,
}

impl<S, B> Service<ServiceRequest> for ResourceOwnershipMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let current_owner = match req.extensions().get::<Claims>() {
            Some(claims) => claims.sub.clone(),
            None => {
                return Box::pin(async move { Err(ErrorUnauthorized("User not authenticated")) });
            }
        };

        let resource_owner = match req.match_info().get(&self.param_name) {
            Some(id) => id.to_string(),
            None => return Box::pin(self.service.call(req)),
        };

        if current_owner != resource_owner {
            return Box::pin(async move {
                Err(ErrorForbidden(
                    "Access denied: You can only access your own QR codes",
                ))
            });
        }

        Box::pin(self.service.call(req))
    }
}
