//! Authentication and staff management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::StaffRole,
        staff::{CreateStaff, Staff, StaffClaims},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate staff by login and return a JWT token
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, Staff)> {
        let staff = self
            .repository
            .staff
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !self.verify_password(&staff, password)? {
            return Err(AppError::Authentication(
                "Invalid login or password".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = StaffClaims {
            sub: staff.login.clone(),
            staff_id: staff.id,
            role: staff.role,
            exp,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, staff))
    }

    /// Get the staff record behind a set of claims
    pub async fn current_staff(&self, claims: &StaffClaims) -> AppResult<Staff> {
        self.repository.staff.get_by_id(claims.staff_id).await
    }

    /// Create a staff account
    pub async fn create_staff(&self, data: &CreateStaff) -> AppResult<Staff> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let password_hash = self.hash_password(&data.password)?;
        self.repository
            .staff
            .create(&data.login, &data.full_name, data.role, &password_hash)
            .await
    }

    /// List staff accounts
    pub async fn list_staff(&self) -> AppResult<Vec<Staff>> {
        self.repository.staff.list().await
    }

    /// Get a staff account
    pub async fn get_staff(&self, id: Uuid) -> AppResult<Staff> {
        self.repository.staff.get_by_id(id).await
    }

    /// Create the first admin account on an empty staff table
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        if self.repository.staff.count().await? > 0 {
            return Ok(());
        }

        let password_hash = self.hash_password(&self.config.bootstrap_password)?;
        self.repository
            .staff
            .create(
                &self.config.bootstrap_login,
                "Bootstrap administrator",
                StaffRole::Admin,
                &password_hash,
            )
            .await?;

        tracing::warn!(
            login = %self.config.bootstrap_login,
            "Created bootstrap admin account, change its password"
        );
        Ok(())
    }

    fn verify_password(&self, staff: &Staff, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&staff.password_hash)
            .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }
}
