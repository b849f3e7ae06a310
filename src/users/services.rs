use tracing::warn;
use uuid::Uuid;

use super::{
    dto::{CreateUserRequest, UpdateUserRequest},
    repo::UserRepository,
    repo_types::{NewUser, User, UserChanges, DEFAULT_PROFILE},
};
use crate::{
    auth::password::PasswordHasher,
    error::AppError,
    validation::{normalize_email, required, required_if_present},
};

/// Passwords are taken verbatim; only emptiness is rejected.
fn password_field(value: Option<String>) -> Result<Option<String>, AppError> {
    match value {
        Some(p) if p.is_empty() => Err(AppError::Validation("password is required".into())),
        other => Ok(other),
    }
}

/// Rejects an email or login already held by a user other than `except`.
async fn ensure_unique(
    repo: &dyn UserRepository,
    email: Option<&str>,
    login: Option<&str>,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(email) = email {
        if let Some(found) = repo.find_by_email(email).await? {
            if Some(found.id) != except {
                warn!(%email, "email already registered");
                return Err(AppError::Validation("email already registered".into()));
            }
        }
    }
    if let Some(login) = login {
        if let Some(found) = repo.find_by_login(login).await? {
            if Some(found.id) != except {
                warn!(%login, "login already taken");
                return Err(AppError::Validation("login already taken".into()));
            }
        }
    }
    Ok(())
}

pub async fn create_user(
    repo: &dyn UserRepository,
    hasher: &PasswordHasher,
    req: CreateUserRequest,
) -> Result<User, AppError> {
    let name = required("name", req.name)?;
    let email = normalize_email(&required("email", req.email)?);
    let login = required("login", req.login)?;
    let password = password_field(req.password)?
        .ok_or_else(|| AppError::Validation("password is required".into()))?;
    let profile = req
        .profile
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    ensure_unique(repo, Some(&email), Some(&login), None).await?;

    let password = hasher.hash_password(&password)?;
    repo.insert(NewUser {
        name,
        email,
        login,
        password,
        profile,
    })
    .await
}

pub async fn update_user(
    repo: &dyn UserRepository,
    hasher: &PasswordHasher,
    id: Uuid,
    req: UpdateUserRequest,
) -> Result<User, AppError> {
    let mut changes = UserChanges {
        name: required_if_present("name", req.name)?,
        email: required_if_present("email", req.email)?.map(|e| normalize_email(&e)),
        login: required_if_present("login", req.login)?,
        password: password_field(req.password)?,
        profile: required_if_present("profile", req.profile)?,
    };

    if repo.find_by_id(id).await?.is_none() {
        return Err(not_found());
    }
    ensure_unique(
        repo,
        changes.email.as_deref(),
        changes.login.as_deref(),
        Some(id),
    )
    .await?;

    // Only a supplied password is hashed; otherwise the stored hash stays put.
    if let Some(plain) = changes.password.take() {
        changes.password = Some(hasher.hash_password(&plain)?);
    }

    repo.update(id, changes).await?.ok_or_else(not_found)
}

pub fn not_found() -> AppError {
    AppError::NotFound("User not found".into())
}
