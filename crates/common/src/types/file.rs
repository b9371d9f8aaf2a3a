use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::ProviderMetadata;
use super::storage_class::StorageClass;

/// A stored object.
///
/// The provider-specific fields are only populated when the backing storage
/// network supplies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    pub name: String,
    #[serde(alias = "contentType")]
    pub mime_type: String,
    pub size: u64,
    pub user_id: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub directory_id: String,
    /// Content identifier on the backing network
    pub cid: String,
    #[serde(default)]
    pub storage_classes: Vec<StorageClass>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub piece_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
}

/// Storage status of a file: where it can be fetched from, and what the
/// storage network reports about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLinks {
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProviderMetadata>,
}
