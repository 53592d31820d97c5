//! Calls against the provider table REST API.
//!
//! Inserts ask for `return=representation` so the created row comes back in
//! the same round trip, typed. Reads filter with the `column=eq.value`
//! query syntax and always return arrays.

use secrecy::ExposeSecret;
use tracing::instrument;
use uuid::Uuid;

use super::types::{EmployeeRecord, NewAuditLog, NewEmployeeRecord, NewUserRecord, UserRecord};
use super::{api_error, Provider, ProviderError};

impl Provider {
    /// Inserts the profile row backing a new identity.
    ///
    /// # Errors
    /// Returns an error if the request fails, the insert is rejected
    /// (uniqueness conflicts included), or no row comes back.
    #[instrument(skip(self, record))]
    pub async fn insert_user(&self, record: &NewUserRecord) -> Result<UserRecord, ProviderError> {
        let url = self.endpoint("/rest/v1/users");

        let response = self
            .client
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let rows: Vec<UserRecord> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ProviderError::Decode("user insert returned no rows".to_string()))
    }

    /// Looks up a profile row by id. `Ok(None)` when no row exists.
    ///
    /// # Errors
    /// Returns an error if the request fails or the provider rejects it.
    #[instrument(skip(self))]
    pub async fn fetch_user(&self, user_id: Uuid) -> Result<Option<UserRecord>, ProviderError> {
        let url = self.endpoint(&format!("/rest/v1/users?id=eq.{user_id}&select=*"));

        let response = self
            .client
            .get(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let rows: Vec<UserRecord> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    /// Inserts an employee profile row.
    ///
    /// # Errors
    /// Returns an error if the request fails, the insert is rejected
    /// (uniqueness conflicts included), or no row comes back.
    #[instrument(skip(self, record))]
    pub async fn insert_employee(
        &self,
        record: &NewEmployeeRecord,
    ) -> Result<EmployeeRecord, ProviderError> {
        let url = self.endpoint("/rest/v1/employees");

        let response = self
            .client
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let rows: Vec<EmployeeRecord> = response.json().await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| ProviderError::Decode("employee insert returned no rows".to_string()))
    }

    /// Appends an audit row. Callers treat failures as non-fatal.
    ///
    /// # Errors
    /// Returns an error if the request fails or the provider rejects it.
    #[instrument(skip(self, entry))]
    pub async fn insert_audit_log(&self, entry: &NewAuditLog) -> Result<(), ProviderError> {
        let url = self.endpoint("/rest/v1/audit_logs");

        let response = self
            .client
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .json(entry)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::Role;
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn new_user_record_serializes_table_columns() {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap();
        let record = NewUserRecord {
            id: Uuid::nil(),
            email: "ana@example.com".to_string(),
            role: Role::Employee,
            created_at: created,
            updated_at: created,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value["id"],
            json!("00000000-0000-0000-0000-000000000000")
        );
        assert_eq!(value["email"], json!("ana@example.com"));
        assert_eq!(value["role"], json!("employee"));
        assert!(value["created_at"].as_str().is_some());
    }

    #[test]
    fn audit_log_serializes_optional_fields_as_null() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap();
        let entry = NewAuditLog {
            user_id: Uuid::nil(),
            action: "LOGIN".to_string(),
            table_name: "users".to_string(),
            record_id: None,
            old_data: None,
            new_data: Some(json!({"login_time": now.to_rfc3339()})),
            created_at: now,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["action"], json!("LOGIN"));
        assert!(value["record_id"].is_null());
        assert!(value["old_data"].is_null());
        assert!(value["new_data"]["login_time"].as_str().is_some());
    }
}
