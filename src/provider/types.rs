//! Typed records exchanged with the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// Application role stored alongside each user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Employee,
    Sponsor,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Employee => "employee",
            Self::Sponsor => "sponsor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    Hourly,
    Biweekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

/// Row in the `users` table, also served back to clients as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for the `users` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserRecord {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row in the `employees` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeRecord {
    pub id: i64,
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
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for the `employees` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewEmployeeRecord {
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
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the `audit_logs` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewAuditLog {
    pub user_id: Uuid,
    pub action: String,
    pub table_name: String,
    pub record_id: Option<Uuid>,
    pub old_data: Option<Value>,
    pub new_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// Identity resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// Session issued by the provider on a successful credential check.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub expires_in: u64,
    pub user_id: Uuid,
}

/// Outcome of a signup call. The provider opens a session right away only
/// when email confirmation is disabled.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user_id: Uuid,
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_round_trips_as_lowercase() {
        assert_eq!(serde_json::to_value(Role::Manager).unwrap(), json!("manager"));
        assert_eq!(
            serde_json::from_value::<Role>(json!("sponsor")).unwrap(),
            Role::Sponsor
        );
        assert!(serde_json::from_value::<Role>(json!("admin")).is_err());
    }

    #[test]
    fn user_record_parses_a_table_row() {
        let row = json!({
            "id": "b9e6ad6f-9b4e-44d9-9171-6e0056b1a7c4",
            "email": "ana@example.com",
            "role": "employee",
            "created_at": "2025-06-01T12:00:00Z",
            "updated_at": null
        });

        let record: UserRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.email, "ana@example.com");
        assert_eq!(record.role, Role::Employee);
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn employee_record_accepts_sparse_rows() {
        let row = json!({
            "id": 7,
            "user_id": "b9e6ad6f-9b4e-44d9-9171-6e0056b1a7c4",
            "name": "Ana Morales",
            "identification": "11858-0424",
            "position": null,
            "phone": null,
            "address": null,
            "salary_type": "monthly",
            "salary_hourly": null,
            "salary_biweekly": null,
            "salary_monthly": 1200.0,
            "resume_url": null,
            "status": "active",
            "created_at": "2025-06-01T12:00:00Z",
            "updated_at": "2025-06-01T12:00:00Z"
        });

        let record: EmployeeRecord = serde_json::from_value(row).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.salary_type, Some(SalaryType::Monthly));
        assert_eq!(record.status, EmployeeStatus::Active);
    }

    #[test]
    fn employee_status_defaults_to_active() {
        assert_eq!(EmployeeStatus::default(), EmployeeStatus::Active);
    }
}
