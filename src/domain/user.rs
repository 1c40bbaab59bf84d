use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Invited,
    Registered,
    Disabled,
    #[serde(other)]
    Unknown,
}

/// A platform user account.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// Id issued by the identity provider
    pub auth_user_id: String,
    /// Identity provider, e.g. "google_identity_platform"
    pub auth_provider: String,
    pub default_workspace_id: Option<String>,
    pub status: Option<UserStatus>,
    pub company_name: Option<String>,
    pub news: Option<bool>,
    pub intercom_hash: Option<String>,
}

/// Payload for `v1/web_backend/users/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub auth_user_id: String,
    pub auth_provider: String,
    pub email: String,
    pub name: String,
    pub company_name: String,
    pub news: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_workspace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_create_omits_unset_optionals() {
        let create = UserCreate {
            auth_user_id: "auth-1".to_string(),
            auth_provider: "google_identity_platform".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            company_name: "Acme".to_string(),
            news: false,
            invited_workspace_id: None,
            status: None,
        };

        let value = serde_json::to_value(&create).unwrap();
        assert_eq!(value["authUserId"], "auth-1");
        assert_eq!(value["companyName"], "Acme");
        assert!(value.get("invitedWorkspaceId").is_none());
        assert!(value.get("status").is_none());
    }

    #[test]
    fn test_user_create_invited_status() {
        let create = UserCreate {
            auth_user_id: "auth-2".to_string(),
            auth_provider: "google_identity_platform".to_string(),
            email: "joe@example.com".to_string(),
            name: "Joe".to_string(),
            company_name: String::new(),
            news: true,
            invited_workspace_id: Some("ws-1".to_string()),
            status: Some(UserStatus::Invited),
        };

        let value = serde_json::to_value(&create).unwrap();
        assert_eq!(value["invitedWorkspaceId"], "ws-1");
        assert_eq!(value["status"], "invited");
    }

    #[test]
    fn test_unexpected_user_status_is_unknown() {
        let users: Vec<User> = serde_json::from_str(
            r#"[{"userId": "u1", "status": "suspended"}, {"userId": "u2", "status": "registered"}]"#,
        )
        .unwrap();

        assert_eq!(users[0].status, Some(UserStatus::Unknown));
        assert_eq!(users[1].status, Some(UserStatus::Registered));
    }
}
