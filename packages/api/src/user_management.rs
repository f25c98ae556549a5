//! Dashboard accounts: password hashing, registration and login.
//!
//! Passwords are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`) with a 16 byte random salt.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter,
};

use crate::entity::{sea_orm_active_enums::UserRole, user};

const SALT_LEN: usize = 16;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account is deactivated")]
    Inactive,
    #[error("failed to hash password: {0}")]
    Hashing(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

pub fn hash_password(password: &str) -> Result<String, UserError> {
    let mut salt = [0u8; SALT_LEN];
    getrandom::fill(&mut salt).map_err(|e| UserError::Hashing(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt).map_err(|e| UserError::Hashing(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::Hashing(e.to_string()))
}

/// Unparseable hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), UserError> {
        let username_len = self.username.trim().chars().count();
        if !(3..=50).contains(&username_len) {
            return Err(UserError::Validation(
                "Username must be between 3 and 50 characters".to_string(),
            ));
        }
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

pub fn validate_email(email: &str) -> Result<(), UserError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(UserError::Validation("Invalid email address".to_string())),
    }
}

pub fn validate_password(password: &str) -> Result<(), UserError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(UserError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Validates, hashes the password and inserts the account.
#[tracing::instrument(name = "create_user", skip(db, new_user), fields(username = %new_user.username))]
pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    new_user: NewUser,
) -> Result<user::Model, UserError> {
    new_user.validate()?;

    let username = new_user.username.trim().to_string();
    let email = new_user.email.trim().to_lowercase();

    let existing = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(&username))
                .add(user::Column::Email.eq(&email)),
        )
        .one(db)
        .await?;
    if let Some(existing) = existing {
        let field = if existing.username == username {
            "Username"
        } else {
            "Email"
        };
        return Err(UserError::Conflict(format!("{field} already in use")));
    }

    let password_hash = hash_password(&new_user.password)?;
    let now = Utc::now().naive_utc();

    let model = user::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        username: Set(username),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(new_user.role),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let created = model.insert(db).await?;
    tracing::info!(user_id = %created.id, role = ?created.role, "User created");
    Ok(created)
}

/// Looks the account up by username or email and checks the password.
/// Records the login time on success.
pub async fn authenticate<C: ConnectionTrait>(
    db: &C,
    login: &str,
    password: &str,
) -> Result<user::Model, UserError> {
    let login = login.trim();
    let account = user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(login))
                .add(user::Column::Email.eq(login.to_lowercase())),
        )
        .one(db)
        .await?
        .ok_or(UserError::InvalidCredentials)?;

    if !verify_password(password, &account.password_hash) {
        return Err(UserError::InvalidCredentials);
    }
    if !account.is_active {
        return Err(UserError::Inactive);
    }

    let now = Utc::now().naive_utc();
    let mut active: user::ActiveModel = account.into();
    active.last_login = Set(Some(now));
    active.updated_at = Set(now);
    Ok(active.update(db).await?)
}

pub async fn change_password<C: ConnectionTrait>(
    db: &C,
    user_id: &str,
    current_password: &str,
    new_password: &str,
) -> Result<(), UserError> {
    validate_password(new_password)?;

    let account = user::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await?
        .ok_or(UserError::InvalidCredentials)?;
    if !verify_password(current_password, &account.password_hash) {
        return Err(UserError::InvalidCredentials);
    }

    let mut active: user::ActiveModel = account.into();
    active.password_hash = Set(hash_password(new_password)?);
    active.updated_at = Set(Utc::now().naive_utc());
    active.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("correct horse").unwrap();
        assert!(stored.starts_with("$argon2id$v=19$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("password").unwrap();
        let b = hash_password("password").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("password", &a));
        assert!(verify_password("password", &b));
    }

    #[test]
    fn test_malformed_hashes_do_not_verify() {
        let stored = hash_password("password").unwrap();
        let truncated = &stored[..stored.len() - 8];
        for stored in [
            "",
            "plain",
            "$argon2id$v=19$m=19456,t=2,p=1$",
            "blake3$4$00$00",
            truncated,
        ] {
            assert!(!verify_password("password", stored), "{stored}");
        }
    }

    #[test]
    fn test_new_user_validation() {
        let valid = NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            role: UserRole::Staff,
        };
        assert!(valid.validate().is_ok());

        let short_name = NewUser {
            username: "al".to_string(),
            ..valid.clone()
        };
        assert!(matches!(short_name.validate(), Err(UserError::Validation(_))));

        let bad_email = NewUser {
            email: "alice.example.com".to_string(),
            ..valid.clone()
        };
        assert!(matches!(bad_email.validate(), Err(UserError::Validation(_))));

        let short_password = NewUser {
            password: "12345".to_string(),
            ..valid
        };
        assert!(matches!(
            short_password.validate(),
            Err(UserError::Validation(_))
        ));
    }
}
