//! Authentication middleware and extractors.
//!
//! [`Authentication`] wraps the `/api` scope. It never rejects a request for
//! lacking credentials; it only resolves a bearer token to a user and stores
//! the result as an [`Identity`] in the request extensions. Handlers that need
//! a caller take [`Identity`]; handlers that merely care take
//! [`OptionalIdentity`].

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
    web,
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

use juicebox_core::domain::PublicUser;

use crate::middleware::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
pub fn parse_bearer(value: &str) -> Result<&str, AppError> {
    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AppError::AuthorizationHeader)
}

/// Resolve the request's bearer token, if any, to a user.
async fn authenticate(req: &ServiceRequest) -> Result<Option<PublicUser>, AppError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AppError::AuthorizationHeader)?;
    let token = parse_bearer(value)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("AppState not found in app data".to_string()))?;

    let claims = state.tokens.validate_token(token)?;
    let users = state.users.clone();

    match users.find_public_user(claims.user_id).await? {
        Some(user) => {
            tracing::debug!(user_id = %user.id, username = %user.username, "User is set");
            Ok(Some(user))
        }
        None => {
            tracing::warn!(user_id = %claims.user_id, "Token refers to a user that no longer exists");
            Ok(None)
        }
    }
}

/// Middleware factory for bearer authentication.
pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthenticationService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticationService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthenticationService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            match authenticate(&req).await {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(Identity(user));
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::debug!(error = %err, "Authentication failed");
                    let response = err.error_response();
                    let (http_req, _payload) = req.into_parts();
                    return Ok(ServiceResponse::new(http_req, response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Authenticated user extractor.
///
/// Fails with `MissingUserError` when no user is attached:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.0.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub PublicUser);

impl Identity {
    pub fn id(&self) -> Uuid {
        self.0.id
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or(AppError::MissingUser),
        )
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(Identity::id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(req.extensions().get::<Identity>().cloned())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def").unwrap(), "abc.def");
        assert!(matches!(
            parse_bearer("Token abc"),
            Err(AppError::AuthorizationHeader)
        ));
        assert!(matches!(
            parse_bearer("bearer abc"),
            Err(AppError::AuthorizationHeader)
        ));
    }
}
