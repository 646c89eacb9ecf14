use crate::auth::jwt::{self, Claims};
use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::config::Config;
use crate::dto::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};
use crate::error::AppError;
use crate::models::{NewUser, UserRole};
use crate::rate_limit::LoginRateLimiter;
use crate::store::Store;

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

fn validate_registration(req: &RegisterRequest) -> Result<(), AppError> {
    let username_len = req.username.trim().chars().count();
    if !USERNAME_LEN.contains(&username_len) {
        return Err(AppError::InvalidArgument(
            "Username must be between 3 and 50 characters".to_string(),
        ));
    }

    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidArgument(
            "Email must be a valid address".to_string(),
        ));
    }

    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidArgument(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(())
}

pub async fn register(store: &dyn Store, req: RegisterRequest) -> Result<UserResponse, AppError> {
    validate_registration(&req)?;

    let username = req.username.trim().to_string();
    let email = req.email.trim().to_string();

    if store.user_exists_by_username(&username).await? {
        return Err(AppError::Duplicate("Username already exists".to_string()));
    }
    if store.user_exists_by_email(&email).await? {
        return Err(AppError::Duplicate("Email already exists".to_string()));
    }

    let password_hash = password::hash(&req.password).map_err(AppError::Internal)?;

    let user = store
        .insert_user(NewUser {
            username,
            email,
            password_hash,
            role: UserRole::User,
            enabled: true,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    Ok(UserResponse::from(&user))
}

pub async fn login(
    store: &dyn Store,
    limiter: &LoginRateLimiter,
    config: &Config,
    req: LoginRequest,
) -> Result<LoginResponse, AppError> {
    if limiter.check(&req.username).is_err() {
        tracing::warn!(username = %req.username, "Login rate limited");
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let invalid = || AppError::AuthenticationRequired("Invalid credentials".to_string());

    let Some(user) = store.find_user_by_username(&req.username).await? else {
        limiter.record_failure(&req.username);
        tracing::warn!(username = %req.username, "Login failed: unknown user");
        return Err(invalid());
    };

    let valid = password::verify(&req.password, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        limiter.record_failure(&req.username);
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    if !user.enabled {
        tracing::warn!(user_id = user.id, "Login refused: account disabled");
        return Err(AppError::AccessDenied("Account is disabled".to_string()));
    }

    limiter.reset(&req.username);

    let ttl = config.jwt_ttl();
    let claims = Claims::for_user(&user, ttl);
    let token = jwt::encode_token(&claims, &config.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: ttl.num_seconds(),
        username: user.username,
    })
}

/// Numeric id of the authenticated caller.
pub fn resolve_current_user_id(session: Option<&Claims>) -> Result<i64, AppError> {
    let claims = session.ok_or_else(|| {
        AppError::AuthenticationRequired("Authentication required".to_string())
    })?;

    if !claims.is_user_access() {
        return Err(AppError::InvalidState(
            "Authenticated principal is not a user".to_string(),
        ));
    }

    claims
        .uid
        .ok_or_else(|| {
            AppError::NotFound("User id missing from authenticated principal".to_string())
        })
}

pub async fn profile(store: &dyn Store, user_id: i64) -> Result<UserResponse, AppError> {
    let user = store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with id: {user_id}")))?;
    Ok(UserResponse::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(typ: &str, uid: Option<i64>) -> Claims {
        Claims {
            sub: "alice".into(),
            uid,
            role: "USER".into(),
            typ: typ.into(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    #[test]
    fn no_session_requires_authentication() {
        let err = resolve_current_user_id(None).unwrap_err();
        assert!(matches!(err, AppError::AuthenticationRequired(_)));
    }

    #[test]
    fn non_user_principal_is_invalid_state() {
        let c = claims("service", Some(1));
        let err = resolve_current_user_id(Some(&c)).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn missing_uid_is_not_found() {
        let c = claims(jwt::ACCESS_TOKEN, None);
        let err = resolve_current_user_id(Some(&c)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn user_access_token_yields_id() {
        let c = claims(jwt::ACCESS_TOKEN, Some(17));
        assert_eq!(resolve_current_user_id(Some(&c)).unwrap(), 17);
    }

    fn request(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn registration_validation() {
        assert!(validate_registration(&request("alice", "a@example.com", "longenough")).is_ok());
        assert!(validate_registration(&request("al", "a@example.com", "longenough")).is_err());
        let long_name = request(&"x".repeat(51), "a@example.com", "longenough");
        assert!(validate_registration(&long_name).is_err());
        assert!(validate_registration(&request("alice", "example.com", "longenough")).is_err());
        assert!(validate_registration(&request("alice", "a@example.com", "short")).is_err());
    }
}
