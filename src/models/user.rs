//! User (borrower) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// User record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Postal address
    pub address: Option<String>,
    pub phone: String,
    pub email: String,
}

/// User list filters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Update user request. Missing fields are left unchanged; an empty
/// `address` clears it.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 32, message = "Phone cannot be empty"))]
    pub phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// User entry for pickers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserOption {
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_validation() {
        let user = CreateUser {
            name: "Ada Lovelace".into(),
            address: None,
            phone: "+44 20 7946 0000".into(),
            email: "ada@example.org".into(),
        };
        assert!(user.validate().is_ok());

        let bad_email = CreateUser {
            email: "not-an-email".into(),
            ..user
        };
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_update_user_validation() {
        assert!(UpdateUser::default().validate().is_ok());

        let empty_phone = UpdateUser {
            phone: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_phone.validate().is_err());
    }
}
