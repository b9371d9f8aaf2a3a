use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::file::File;
use super::storage_class::StorageClass;

/// A node in the directory tree.
///
/// Root directories have no parent. Soft-deleted directories stay
/// addressable by id; the client treats `is_deleted` as opaque metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_directory_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub storage_class: StorageClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,
}

impl Directory {
    pub fn is_root(&self) -> bool {
        self.parent_directory_id.is_none()
    }
}

/// Contents of one directory, as returned by directory reads and pushed
/// through change notifications.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirectoryListing {
    #[serde(default)]
    pub directories: Vec<Directory>,
    #[serde(default)]
    pub files: Vec<File>,
}

impl DirectoryListing {
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directories.len() + self.files.len()
    }
}
