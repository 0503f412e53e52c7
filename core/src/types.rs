//! Payloads sent to the `/fs` endpoint.

use serde::{Deserialize, Serialize};

/// What a moved file or folder's permissions become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permissions {
    KeepOriginal,
    InheritFromParent,
}

/// Body of a move. `permissions` is sent as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAction {
    pub action: String,
    pub destination: String,
    pub permissions: Option<Permissions>,
}

impl MoveAction {
    pub fn new(destination: &str, permissions: Option<Permissions>) -> Self {
        Self {
            action: "move".to_string(),
            destination: destination.to_string(),
            permissions,
        }
    }
}

/// Body of a folder creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddFolderAction {
    pub action: String,
}

impl Default for AddFolderAction {
    fn default() -> Self {
        Self {
            action: "add_folder".to_string(),
        }
    }
}
