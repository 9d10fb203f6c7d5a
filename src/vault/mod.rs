//! Vault data model - drawings and their organizing folder tree
//! Wire and storage shapes are camelCase JSON, timestamps are epoch millis

pub mod colors;
pub mod store;

pub use store::VaultStore;

use serde::{Deserialize, Serialize};

/// A saved canvas snapshot. The `elements` / `app_state` / version blobs
/// are the drawing engine's own serialized format, passed through verbatim
/// and never parsed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    /// Supplied by the producing context, unique within the collection.
    pub id: String,
    /// `None` means the drawing sits at the vault root.
    #[serde(default)]
    pub folder_id: Option<String>,
    pub name: String,
    pub elements: String,
    pub app_state: String,
    pub version_files: String,
    pub version_data_state: String,
    /// Small encoded preview, when one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_background_color: Option<String>,
    /// Immutable after first write.
    pub created_at: i64,
    /// Strictly increases with every successful write of this record.
    pub updated_at: i64,
}

/// A named node in the grouping tree. Folders never move: `parent_id` is
/// fixed at creation, which keeps the parent graph acyclic by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Generated by the store at creation time.
    pub id: String,
    pub name: String,
    /// `None` means root-level folder.
    #[serde(default)]
    pub parent_id: Option<String>,
    pub color: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Combined snapshot for the initial UI load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workspace {
    pub folders: Vec<Folder>,
    pub drawings: Vec<Drawing>,
}

/// Fields accepted by `SAVE_DRAWING`. Server assigns the timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDrawingPayload {
    pub id: String,
    pub name: String,
    pub elements: String,
    pub app_state: String,
    pub version_files: String,
    pub version_data_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_background_color: Option<String>,
    /// Defaults to the vault root when absent.
    #[serde(default)]
    pub folder_id: Option<String>,
}

/// Transportable fields written to the injection slot by `OPEN_DRAWING`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenDrawingPayload {
    pub id: String,
    pub name: String,
    pub elements: String,
    pub app_state: String,
    pub version_files: String,
    pub version_data_state: String,
}

/// What the extraction routine reads out of a live foreign page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingSnapshot {
    pub id: String,
    /// The page may not have a saved title yet.
    pub title: Option<String>,
    pub elements: String,
    pub app_state: String,
    #[serde(default)]
    pub version_files: String,
    #[serde(default)]
    pub version_data_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
}

/// Current time in epoch milliseconds.
pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
