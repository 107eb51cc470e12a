use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use vidshare_core::AppError;
use vidshare_infra::get_request_id;

use crate::auth::models::{JwtClaims, UserContext};
use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AuthState {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthState {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<UserContext, AppError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "JWT verification failed");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(UserContext {
            user_id: data.claims.sub,
        })
    }
}

fn unauthorized(request: &Request, message: &str) -> Response {
    tracing::debug!(
        request_id = ?get_request_id(request),
        path = %request.uri().path(),
        reason = message,
        "Rejected unauthenticated request"
    );
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    else {
        return unauthorized(&request, "Missing authorization header");
    };

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return unauthorized(&request, "Invalid authorization header format");
    };

    match auth_state.verify(token.trim()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(request_id = ?get_request_id(&request), "Rejected bearer token");
            HttpAppError(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret-that-is-at-least-32-characters";

    fn token(sub: Uuid, exp_offset: i64, secret: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            sub,
            exp: now + exp_offset,
            iat: now,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_subject() {
        let user_id = Uuid::new_v4();
        let state = AuthState::new(SECRET);
        assert_eq!(state.verify(&token(user_id, 3600, SECRET)).unwrap().user_id, user_id);
    }

    #[test]
    fn test_expired_or_foreign_token_rejected() {
        let state = AuthState::new(SECRET);
        let expired = token(Uuid::new_v4(), -3600, SECRET);
        assert!(matches!(state.verify(&expired), Err(AppError::Unauthorized(_))));

        let foreign = token(Uuid::new_v4(), 3600, "another-secret-of-sufficient-length-xx");
        assert!(matches!(state.verify(&foreign), Err(AppError::Unauthorized(_))));
    }
}
