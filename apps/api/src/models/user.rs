use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Approval state of an account. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Approved,
    Blocked,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Blocked => "blocked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(UserStatus::Pending),
            "approved" => Some(UserStatus::Approved),
            "blocked" => Some(UserStatus::Blocked),
            _ => None,
        }
    }
}

/// Columns selected into `User`. The token hash is only ever matched in SQL.
pub const USER_COLUMNS: &str = "id, email, status, is_admin, created_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub status: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Unrecognized values are treated as not approved.
    pub fn status(&self) -> Option<UserStatus> {
        UserStatus::parse(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [UserStatus::Pending, UserStatus::Approved, UserStatus::Blocked] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("Approved"), None);
    }

    #[test]
    fn test_token_hash_is_never_loaded_or_serialized() {
        assert!(!USER_COLUMNS.contains("token_hash"));

        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".to_string(),
            status: "pending".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("token_hash").is_none());
        assert_eq!(value["status"], "pending");
    }
}
