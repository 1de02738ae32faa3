//! Account service: login policy, registration, and administrator
//! reconciliation

use serde::Deserialize;

use crate::crypto::{hash_password, verify_password};
use crate::error::ApiError;
use crate::store::{NewUser, Role, User, UserStore};

/// Sentinel email of the single reserved administrator account
pub const ADMIN_EMAIL: &str = "admin@dlcms";

/// Password seeded for the administrator account
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Display name of the administrator account
pub const ADMIN_NAME: &str = "Admin";

#[derive(Debug, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub admin_secret: Option<String>,
}

/// Authenticate a user by email and password.
///
/// Beyond credential verification, enforces the reserved-identity rule: the
/// `Admin` role and the sentinel email must coincide. An `Admin` account at
/// any other address, or the sentinel address without the `Admin` role, is
/// rejected even when the password verifies.
pub fn login<U: UserStore>(store: &U, input: LoginInput) -> Result<User, ApiError> {
    let (email, password) = match (input.email, input.password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(ApiError::Validation(
                "Email and password required.".to_string(),
            ))
        }
    };

    let user = store
        .get_user_by_email(&email.to_lowercase())?
        .ok_or(ApiError::InvalidCredentials)?;

    let verified = verify_password(&password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    if !verified {
        return Err(ApiError::InvalidCredentials);
    }

    let is_reserved = user.email == ADMIN_EMAIL;
    let is_admin = user.role == Role::Admin;
    if is_admin != is_reserved {
        return Err(ApiError::Unauthorized(
            "Account violates the reserved admin identity.".to_string(),
        ));
    }

    Ok(user)
}

/// Register a new account.
///
/// The sentinel identity can never be re-registered, secret or not; the
/// `Admin` role is only granted when the configured shared secret matches.
pub fn register<U: UserStore>(
    store: &U,
    configured_secret: &str,
    input: RegisterInput,
) -> Result<User, ApiError> {
    let name = input.name.unwrap_or_default();
    let email = input.email.unwrap_or_default();
    let password = input.password.unwrap_or_default();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email, and password required.".to_string(),
        ));
    }

    let normalized_email = email.trim().to_lowercase();
    if name.trim().to_lowercase() == "admin" || normalized_email == ADMIN_EMAIL {
        return Err(ApiError::Reserved("Admin account is reserved.".to_string()));
    }

    let wants_admin = input.role.as_deref() == Some("Admin");
    if wants_admin && input.admin_secret.as_deref() != Some(configured_secret) {
        return Err(ApiError::Unauthorized(
            "Unauthorized admin creation.".to_string(),
        ));
    }

    let password_hash = hash_password(&password).map_err(|e| ApiError::Internal(e.to_string()))?;

    store.create_user(NewUser {
        name,
        email: normalized_email,
        password_hash,
        role: if wants_admin { Role::Admin } else { Role::Learner },
    })
}

/// Idempotent startup reconciliation of the administrator account: create
/// the sentinel record when absent, correct its role or password hash when
/// they have drifted. Invoked once by process bootstrap.
pub fn ensure_admin_account<U: UserStore>(store: &U) -> Result<(), ApiError> {
    match store.get_user_by_email(ADMIN_EMAIL)? {
        None => {
            let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
                .map_err(|e| ApiError::Internal(e.to_string()))?;
            store.create_user(NewUser {
                name: ADMIN_NAME.to_string(),
                email: ADMIN_EMAIL.to_string(),
                password_hash,
                role: Role::Admin,
            })?;
            tracing::info!(email = ADMIN_EMAIL, "Created administrator account");
        }
        Some(mut user) => {
            let mut corrected = false;

            if user.role != Role::Admin {
                user.role = Role::Admin;
                corrected = true;
            }

            let hash_matches =
                verify_password(DEFAULT_ADMIN_PASSWORD, &user.password_hash).unwrap_or(false);
            if !hash_matches {
                user.password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)
                    .map_err(|e| ApiError::Internal(e.to_string()))?;
                corrected = true;
            }

            if corrected {
                store.update_user(&user)?;
                tracing::warn!(email = ADMIN_EMAIL, "Corrected administrator account record");
            }
        }
    }

    Ok(())
}
