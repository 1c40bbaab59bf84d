use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload for `v1/sources/create`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCreate {
    pub name: String,
    pub source_definition_id: String,
    pub workspace_id: String,
    /// Connector-specific settings, validated server-side against the
    /// definition's specification
    pub connection_configuration: Value,
}

/// A configured source connector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Source {
    pub source_id: String,
    pub name: String,
    pub source_name: String,
    pub source_definition_id: String,
    pub workspace_id: String,
    pub connection_configuration: Value,
}

/// A connector type that sources can be created from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceDefinition {
    pub source_definition_id: String,
    pub name: String,
    pub docker_repository: String,
    pub docker_image_tag: String,
    pub documentation_url: Option<String>,
}

/// Connector specification for one definition, as returned by
/// `v1/source_definition_specifications/get`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceDefinitionSpecification {
    pub source_definition_id: String,
    pub documentation_url: Option<String>,
    /// JSON schema the connection configuration must satisfy
    pub connection_specification: Value,
}
