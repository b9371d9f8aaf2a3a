//! Storage-network metadata.
//!
//! Each backing network reports a different shape. The client does not
//! normalize them: the `provider` discriminant selects the variant, the
//! fields the client knows about are typed, and everything else is kept
//! verbatim in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderMetadata {
    Ipfs(IpfsMetadata),
    Sia(SiaMetadata),
    Filecoin(FilecoinMetadata),
    #[serde(rename = "filefilego")]
    FileFileGo(FileFileGoMetadata),
}

impl ProviderMetadata {
    pub fn provider(&self) -> &'static str {
        match self {
            ProviderMetadata::Ipfs(_) => "ipfs",
            ProviderMetadata::Sia(_) => "sia",
            ProviderMetadata::Filecoin(_) => "filecoin",
            ProviderMetadata::FileFileGo(_) => "filefilego",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpfsMetadata {
    pub cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiaMetadata {
    pub object_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilecoinMetadata {
    pub piece_cid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub miner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFileGoMetadata {
    pub file_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
