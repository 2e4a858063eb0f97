//! Staff accounts and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::enums::StaffRole;
use crate::error::AppError;

/// Staff account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Staff {
    pub id: Uuid,
    pub login: String,
    pub full_name: String,
    pub role: StaffRole,
    #[serde(skip_serializing)]
    #[schema(write_only)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Create staff account request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaff {
    #[validate(length(min = 1, message = "login must not be blank"))]
    pub login: String,
    #[validate(length(min = 1, message = "full_name must not be blank"))]
    pub full_name: String,
    pub role: StaffRole,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// JWT Claims for authenticated staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    pub sub: String,
    pub staff_id: Uuid,
    pub role: StaffRole,
    pub exp: i64,
    pub iat: i64,
}

impl StaffClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn is_admin(&self) -> bool {
        self.role == StaffRole::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Administrator privileges required".to_string(),
            ))
        }
    }

    /// Require the technical-custodian role.
    ///
    /// Custody transfers originate from the technical side only; admins do
    /// not bypass this one, they are not custodians of anything.
    pub fn require_technical_custodian(&self) -> Result<(), AppError> {
        if self.role == StaffRole::Technical {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Technical custodian role required".to_string(),
            ))
        }
    }

    /// Require the right to manage holders and assignments
    /// (administrative staff, or admin)
    pub fn require_loan_officer(&self) -> Result<(), AppError> {
        match self.role {
            StaffRole::Administrative | StaffRole::Admin => Ok(()),
            StaffRole::Technical => Err(AppError::PermissionDenied(
                "Administrative role required to manage assignments".to_string(),
            )),
        }
    }

    /// Require the right to manage the equipment inventory
    /// (technical staff, or admin)
    pub fn require_inventory_write(&self) -> Result<(), AppError> {
        match self.role {
            StaffRole::Technical | StaffRole::Admin => Ok(()),
            StaffRole::Administrative => Err(AppError::PermissionDenied(
                "Technical role required to manage inventory".to_string(),
            )),
        }
    }

    /// The custodian scope of this caller: administrative staff may only
    /// loan equipment they hold custody of; admins are unscoped.
    pub fn custodian_scope(&self) -> Option<Uuid> {
        match self.role {
            StaffRole::Admin => None,
            _ => Some(self.staff_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: StaffRole) -> StaffClaims {
        StaffClaims {
            sub: "test".to_string(),
            staff_id: Uuid::new_v4(),
            role,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip() {
        let original = claims(StaffRole::Administrative);
        let token = original.create_token("secret").unwrap();
        let parsed = StaffClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.staff_id, original.staff_id);
        assert_eq!(parsed.role, StaffRole::Administrative);

        assert!(StaffClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn technical_custodian_check_has_no_admin_bypass() {
        assert!(claims(StaffRole::Technical).require_technical_custodian().is_ok());
        assert!(claims(StaffRole::Admin).require_technical_custodian().is_err());
        assert!(claims(StaffRole::Administrative)
            .require_technical_custodian()
            .is_err());
    }

    #[test]
    fn loan_officer_check_admits_admin() {
        assert!(claims(StaffRole::Administrative).require_loan_officer().is_ok());
        assert!(claims(StaffRole::Admin).require_loan_officer().is_ok());
        assert!(claims(StaffRole::Technical).require_loan_officer().is_err());
    }

    #[test]
    fn admin_is_unscoped_custodian() {
        assert!(claims(StaffRole::Admin).custodian_scope().is_none());
        let c = claims(StaffRole::Administrative);
        assert_eq!(c.custodian_scope(), Some(c.staff_id));
    }
}
