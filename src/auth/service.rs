//! Auth service layer - registration, login, profile access

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::jwt::{self, JwtError};
use crate::models::{AuthTokenResponse, User, UserRole};

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Auth service for account management and token issuing
#[derive(Clone)]
pub struct AuthService {
    db_pool: PgPool,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
}

impl AuthService {
    /// Create a new auth service instance
    pub fn new(db_pool: PgPool, jwt_secret: String, access_token_ttl_seconds: i64) -> Self {
        Self {
            db_pool,
            jwt_secret,
            access_token_ttl_seconds,
        }
    }

    /// Register a new user account
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<String>,
    ) -> Result<AuthTokenResponse, AuthError> {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;

        if existing.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, password_hash, full_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(&password_hash)
        .bind(full_name)
        .bind(UserRole::User)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(user_id = %user.id, "New user registered");

        self.issue_token(user)
    }

    /// Log in with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokenResponse, AuthError> {
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db_pool)
            .await?;

        // Same error for unknown email and wrong password
        let user = user.ok_or(AuthError::InvalidCredentials)?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AuthError::HashingFailed(e.to_string()))?;

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(user)
    }

    /// Fetch a user by id
    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Update the user's profile fields
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        full_name: Option<String>,
    ) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET full_name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(full_name)
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or(AuthError::UserNotFound)
    }

    /// Get JWT secret (for middleware access)
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    fn issue_token(&self, user: User) -> Result<AuthTokenResponse, AuthError> {
        let access_token =
            jwt::generate_access_token(&user, &self.jwt_secret, self.access_token_ttl_seconds)?;

        Ok(AuthTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_ttl_seconds,
            user: user.into(),
        })
    }
}
