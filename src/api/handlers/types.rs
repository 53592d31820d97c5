//! Request and response shapes for the auth routes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::provider::types::{EmployeeStatus, Role, SalaryType, UserRecord};
use crate::throttle::ThrottleStatus;

const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 100;
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 255;
const IDENTIFICATION_MIN: usize = 5;
const IDENTIFICATION_MAX: usize = 50;
const POSITION_MAX: usize = 100;
const PHONE_MAX: usize = 20;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct EmployeeCreateRequest {
    pub user_id: Uuid,
    pub name: String,
    pub identification: String,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub salary_type: Option<SalaryType>,
    pub salary_hourly: Option<f64>,
    pub salary_biweekly: Option<f64>,
    pub salary_monthly: Option<f64>,
    pub resume_url: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Session handed back after registration or login.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserRecord,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of a successful role check.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RoleCheckResponse {
    pub message: String,
    pub role: Role,
    pub user_id: Uuid,
}

/// Diagnostic wrapper around the throttle snapshot.
#[derive(ToSchema, Serialize, Debug)]
pub struct ThrottleStatusResponse {
    pub status: String,
    pub rate_limiting: ThrottleStatus,
}

/// Registration passwords stay within the provider's accepted bounds.
#[must_use]
pub fn valid_password(password: &str) -> bool {
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&password.chars().count())
}

impl EmployeeCreateRequest {
    /// Field bounds checked before anything is sent upstream.
    ///
    /// # Errors
    /// Returns a client-facing message for the first failing field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(NAME_MIN..=NAME_MAX).contains(&self.name.chars().count()) {
            return Err("Name must be between 2 and 255 characters");
        }
        if !(IDENTIFICATION_MIN..=IDENTIFICATION_MAX).contains(&self.identification.chars().count())
        {
            return Err("Identification must be between 5 and 50 characters");
        }
        if self
            .position
            .as_deref()
            .is_some_and(|position| position.chars().count() > POSITION_MAX)
        {
            return Err("Position must be at most 100 characters");
        }
        if self
            .phone
            .as_deref()
            .is_some_and(|phone| phone.chars().count() > PHONE_MAX)
        {
            return Err("Phone must be at most 20 characters");
        }
        for salary in [self.salary_hourly, self.salary_biweekly, self.salary_monthly] {
            if salary.is_some_and(|amount| amount < 0.0) {
                return Err("Salary amounts cannot be negative");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_request() -> EmployeeCreateRequest {
        EmployeeCreateRequest {
            user_id: Uuid::nil(),
            name: "Ana Morales".to_string(),
            identification: "11858-0424".to_string(),
            position: Some("Engineer".to_string()),
            phone: Some("+506 2222-2222".to_string()),
            address: None,
            salary_type: Some(SalaryType::Monthly),
            salary_hourly: None,
            salary_biweekly: None,
            salary_monthly: Some(1200.0),
            resume_url: None,
            status: EmployeeStatus::Active,
        }
    }

    #[test]
    fn valid_password_checks_bounds() {
        assert!(valid_password("secret"));
        assert!(valid_password(&"a".repeat(100)));
        assert!(!valid_password("short"));
        assert!(!valid_password(&"a".repeat(101)));
    }

    #[test]
    fn employee_request_accepts_reasonable_fields() {
        assert!(employee_request().validate().is_ok());
    }

    #[test]
    fn employee_request_rejects_out_of_bounds_fields() {
        let mut request = employee_request();
        request.name = "A".to_string();
        assert!(request.validate().is_err());

        let mut request = employee_request();
        request.identification = "1234".to_string();
        assert!(request.validate().is_err());

        let mut request = employee_request();
        request.position = Some("p".repeat(101));
        assert!(request.validate().is_err());

        let mut request = employee_request();
        request.phone = Some("9".repeat(21));
        assert!(request.validate().is_err());

        let mut request = employee_request();
        request.salary_hourly = Some(-1.0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn employee_request_status_defaults_to_active() {
        let request: EmployeeCreateRequest = serde_json::from_value(serde_json::json!({
            "user_id": "b9e6ad6f-9b4e-44d9-9171-6e0056b1a7c4",
            "name": "Ana Morales",
            "identification": "11858-0424"
        }))
        .unwrap();

        assert_eq!(request.status, EmployeeStatus::Active);
    }
}
