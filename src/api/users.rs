use futures::future::try_join_all;
use log::info;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{User, UserCreate};
use crate::error::Result;

use super::client::ApiClient;

const USERS_URL: &str = "v1/users";

/// User management endpoints.
pub struct UserService<'a> {
    client: &'a ApiClient,
}

#[derive(Deserialize)]
struct UserList {
    users: Vec<User>,
}

impl<'a> UserService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User> {
        self.client
            .post(&format!("{USERS_URL}/get_by_email"), &json!({ "email": email }))
            .await
    }

    pub async fn get_by_auth_id(&self, auth_user_id: &str, auth_provider: &str) -> Result<User> {
        self.client
            .post(
                &format!("{USERS_URL}/get_by_auth_id"),
                &json!({ "authUserId": auth_user_id, "authProvider": auth_provider }),
            )
            .await
    }

    /// Changes the email of the user owning the API token.
    pub async fn change_email(&self, email: &str) -> Result<()> {
        self.client
            .post_empty(&format!("{USERS_URL}/update"), &json!({ "email": email }))
            .await
    }

    pub async fn create(&self, user: &UserCreate) -> Result<User> {
        self.client.post("v1/web_backend/users/create", user).await
    }

    /// Revokes a user's access to a workspace.
    pub async fn remove(&self, workspace_id: &str, email: &str) -> Result<()> {
        self.client
            .post_empty(
                "v1/web_backend/cloud_workspaces/revoke_user",
                &json!({ "email": email, "workspaceId": workspace_id }),
            )
            .await
    }

    /// Sends a sign-in link to each email. Users come back in the order the
    /// emails were given; the first failed invite fails the whole call.
    pub async fn invite(&self, emails: &[String], workspace_id: &str) -> Result<Vec<User>> {
        info!(
            "Inviting {} users to workspace {workspace_id}",
            emails.len()
        );

        let requests = emails.iter().map(|email| async move {
            let body = json!({ "email": email, "workspaceId": workspace_id });
            self.client
                .post::<User>(
                    "v1/web_backend/cloud_workspaces/invite_with_signin_link",
                    &body,
                )
                .await
        });

        try_join_all(requests).await
    }

    pub async fn list_by_workspace_id(&self, workspace_id: &str) -> Result<Vec<User>> {
        let list: UserList = self
            .client
            .post(
                "v1/web_backend/permissions/list_users_by_workspace",
                &json!({ "workspaceId": workspace_id }),
            )
            .await?;

        Ok(list.users)
    }
}
