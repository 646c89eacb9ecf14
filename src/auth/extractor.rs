use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::auth::jwt::{self, Claims};
use crate::error::AppError;
use crate::models::UserRole;
use crate::services::users;
use crate::state::SharedState;

/// The authenticated caller. Built from token claims, never from the
/// `User` row itself.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl AuthUser {
    /// `None` means the request carried no credentials at all.
    pub fn from_session(session: Option<Claims>) -> Result<Self, AppError> {
        let Some(claims) = session else {
            return Err(AppError::AuthenticationRequired(
                "Authentication required".to_string(),
            ));
        };
        let user_id = users::resolve_current_user_id(Some(&claims))?;

        let role = claims.role.parse::<UserRole>().map_err(|_| {
            AppError::InvalidState(format!("Unknown role in token: {}", claims.role))
        })?;

        Ok(AuthUser {
            user_id,
            username: claims.sub,
            role,
        })
    }
}

fn bearer_or_cookie(parts: &Parts) -> Result<Option<String>, AppError> {
    // Bearer token from Authorization header first
    if let Some(auth_header) = parts.headers.get("authorization") {
        let auth_str = auth_header.to_str().map_err(|_| {
            AppError::AuthenticationRequired("Invalid authorization header".to_string())
        })?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(Some(token.to_string()));
        }
    }

    let jar = CookieJar::from_headers(&parts.headers);
    Ok(jar.get("access_token").map(|c| c.value().to_string()))
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let session = match bearer_or_cookie(parts)? {
            Some(token) => Some(
                jwt::decode_token(&token, &state.config.jwt_secret).map_err(|_| {
                    AppError::AuthenticationRequired("Invalid or expired token".to_string())
                })?,
            ),
            None => None,
        };

        AuthUser::from_session(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> Claims {
        Claims {
            sub: "bob".into(),
            uid: Some(9),
            role: "ADMIN".into(),
            typ: jwt::ACCESS_TOKEN.into(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[test]
    fn valid_session_yields_principal() {
        let user = AuthUser::from_session(Some(claims())).unwrap();
        assert_eq!(user.user_id, 9);
        assert_eq!(user.username, "bob");
        assert_eq!(user.role, UserRole::Admin);
    }

    #[test]
    fn missing_session_requires_authentication() {
        let err = AuthUser::from_session(None).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationRequired(_)));
    }

    #[test]
    fn unknown_role_is_invalid_state() {
        let mut c = claims();
        c.role = "ROOT".into();
        let err = AuthUser::from_session(Some(c)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn session_checks_run_before_role_parsing() {
        let mut c = claims();
        c.typ = "refresh".into();
        c.role = "ROOT".into();
        let err = AuthUser::from_session(Some(c)).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidState(ref m) if m == "Authenticated principal is not a user"
        ));

        let mut c = claims();
        c.uid = None;
        let err = AuthUser::from_session(Some(c)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
