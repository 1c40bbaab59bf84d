use log::{debug, info};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{Source, SourceCreate, SourceDefinition, SourceDefinitionSpecification};
use crate::error::{Result, SyncLensError};
use crate::i18n::MessageCatalog;

use super::client::ApiClient;

/// Source connector endpoints.
pub struct SourceService<'a> {
    client: &'a ApiClient,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceDefinitionList {
    source_definitions: Vec<SourceDefinition>,
}

impl<'a> SourceService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_definitions(&self, workspace_id: &str) -> Result<Vec<SourceDefinition>> {
        let list: SourceDefinitionList = self
            .client
            .post(
                "v1/source_definitions/list_for_workspace",
                &json!({ "workspaceId": workspace_id }),
            )
            .await?;

        debug!(
            "Workspace {workspace_id} has {} source definitions",
            list.source_definitions.len()
        );
        Ok(list.source_definitions)
    }

    /// Loads the connector specification a source of this definition is
    /// configured against.
    pub async fn get_specification(
        &self,
        definition_id: &str,
        workspace_id: &str,
    ) -> Result<SourceDefinitionSpecification> {
        debug!("Fetching specification of source definition {definition_id}");
        self.client
            .post(
                "v1/source_definition_specifications/get",
                &json!({ "sourceDefinitionId": definition_id, "workspaceId": workspace_id }),
            )
            .await
    }

    pub async fn create(&self, source: &SourceCreate) -> Result<Source> {
        info!(
            "Creating source \"{}\" from definition {}",
            source.name, source.source_definition_id
        );
        self.client.post("v1/sources/create", source).await
    }
}

/// Finds a definition by id, falling back to a case-insensitive name match.
pub fn find_definition<'d>(
    definitions: &'d [SourceDefinition],
    id_or_name: &str,
) -> Option<&'d SourceDefinition> {
    definitions
        .iter()
        .find(|d| d.source_definition_id == id_or_name)
        .or_else(|| {
            definitions
                .iter()
                .find(|d| d.name.eq_ignore_ascii_case(id_or_name))
        })
}

/// Message shown under the source form after a failed submit.
///
/// No message when no response was received. A 400 carries a validation
/// message worth showing as-is; any other response, including one whose body
/// could not be decoded, gets the generic localized error.
pub fn form_error_message<C>(error: &SyncLensError, catalog: &C) -> Option<String>
where
    C: MessageCatalog + ?Sized,
{
    match (error.status(), error) {
        (None, _) => None,
        (Some(400), SyncLensError::Api { message, .. }) if !message.is_empty() => {
            Some(message.clone())
        }
        _ => Some(catalog.lookup("form.someError")),
    }
}
