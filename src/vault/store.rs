//! Persistence store - single writer of the drawing and folder collections
//! Every operation is a full read-modify-write of the affected record(s)

use crate::error::Result;
use crate::storage::{get_collection, set_collection, StorageArea};
use crate::vault::colors::assign_next_color;
use crate::vault::{now_ms, Drawing, Folder, SaveDrawingPayload, Workspace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Result of `move_drawing`: `success` is false when the id is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub success: bool,
    pub drawings: Vec<Drawing>,
}

/// Result of `update_folder`: `success` is false when the id is unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderOutcome {
    pub success: bool,
    pub folders: Vec<Folder>,
}

/// Result of `delete_folder`. Always succeeds; drawings that pointed at the
/// deleted folder come back detached to the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFolderOutcome {
    pub success: bool,
    pub folders: Vec<Folder>,
    pub drawings: Vec<Drawing>,
}

/// Owns CRUD over both collections, folder id generation, and the one-time
/// schema migration. One instance lives in the background context; all
/// other contexts go through the RPC protocol.
///
/// Collections are read whole, mutated in memory, and written back whole.
/// Distinct RPC calls can interleave at the await boundary, so back-to-back
/// writes from different contexts race last-write-wins; accepted at this
/// scale.
pub struct VaultStore {
    storage: Arc<dyn StorageArea>,
    drawings_key: String,
    folders_key: String,
}

impl VaultStore {
    pub fn new(storage: Arc<dyn StorageArea>, drawings_key: &str, folders_key: &str) -> Self {
        Self {
            storage,
            drawings_key: drawings_key.to_string(),
            folders_key: folders_key.to_string(),
        }
    }

    async fn drawings(&self) -> Result<Vec<Drawing>> {
        get_collection(self.storage.as_ref(), &self.drawings_key).await
    }

    async fn folders(&self) -> Result<Vec<Folder>> {
        get_collection(self.storage.as_ref(), &self.folders_key).await
    }

    async fn save_drawings(&self, drawings: &[Drawing]) -> Result<()> {
        set_collection(self.storage.as_ref(), &self.drawings_key, drawings).await
    }

    async fn save_folders(&self, folders: &[Folder]) -> Result<()> {
        set_collection(self.storage.as_ref(), &self.folders_key, folders).await
    }

    pub async fn list_drawings(&self) -> Result<Vec<Drawing>> {
        self.drawings().await
    }

    /// Combined fetch for the initial UI load.
    pub async fn workspace(&self) -> Result<Workspace> {
        Ok(Workspace {
            folders: self.folders().await?,
            drawings: self.drawings().await?,
        })
    }

    /// Insert or replace a drawing. `created_at` survives replacement;
    /// `updated_at` strictly increases even when the clock has not moved.
    pub async fn upsert_drawing(&self, payload: SaveDrawingPayload) -> Result<Vec<Drawing>> {
        let mut drawings = self.drawings().await?;
        let now = now_ms();

        match drawings.iter_mut().find(|d| d.id == payload.id) {
            Some(existing) => {
                existing.name = payload.name;
                existing.elements = payload.elements;
                existing.app_state = payload.app_state;
                existing.version_files = payload.version_files;
                existing.version_data_state = payload.version_data_state;
                existing.image_base64 = payload.image_base64;
                existing.view_background_color = payload.view_background_color;
                existing.folder_id = payload.folder_id;
                existing.updated_at = now.max(existing.updated_at + 1);
            }
            None => {
                drawings.push(Drawing {
                    id: payload.id,
                    folder_id: payload.folder_id,
                    name: payload.name,
                    elements: payload.elements,
                    app_state: payload.app_state,
                    version_files: payload.version_files,
                    version_data_state: payload.version_data_state,
                    image_base64: payload.image_base64,
                    view_background_color: payload.view_background_color,
                    created_at: now,
                    updated_at: now,
                });
            }
        }

        self.save_drawings(&drawings).await?;
        tracing::debug!("Saved drawing, {} in collection", drawings.len());
        Ok(drawings)
    }

    /// Remove a drawing. Missing ids are a no-op, not an error.
    pub async fn delete_drawing(&self, id: &str) -> Result<Vec<Drawing>> {
        let mut drawings = self.drawings().await?;
        drawings.retain(|d| d.id != id);
        self.save_drawings(&drawings).await?;
        Ok(drawings)
    }

    /// Re-home a drawing; `folder_id: None` moves it to the vault root.
    pub async fn move_drawing(&self, id: &str, folder_id: Option<String>) -> Result<MoveOutcome> {
        let mut drawings = self.drawings().await?;
        let Some(drawing) = drawings.iter_mut().find(|d| d.id == id) else {
            return Ok(MoveOutcome {
                success: false,
                drawings,
            });
        };

        drawing.folder_id = folder_id;
        drawing.updated_at = now_ms().max(drawing.updated_at + 1);
        self.save_drawings(&drawings).await?;
        Ok(MoveOutcome {
            success: true,
            drawings,
        })
    }

    /// Create a folder with a generated id. When no color is given, picks
    /// the first unused palette entry. Parent existence is not re-checked:
    /// creation is the only way a parent id enters the tree, so the parent
    /// graph stays acyclic by construction.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<String>,
        color: Option<String>,
    ) -> Result<Vec<Folder>> {
        let mut folders = self.folders().await?;
        let now = now_ms();
        let color = color.unwrap_or_else(|| assign_next_color(&folders));

        folders.push(Folder {
            id: generate_folder_id(now),
            name: name.to_string(),
            parent_id,
            color,
            created_at: now,
            updated_at: now,
        });

        self.save_folders(&folders).await?;
        tracing::debug!("Created folder, {} in collection", folders.len());
        Ok(folders)
    }

    /// Patch a folder's name (and color, when given).
    pub async fn update_folder(
        &self,
        id: &str,
        name: &str,
        color: Option<String>,
    ) -> Result<FolderOutcome> {
        let mut folders = self.folders().await?;
        let Some(folder) = folders.iter_mut().find(|f| f.id == id) else {
            return Ok(FolderOutcome {
                success: false,
                folders,
            });
        };

        folder.name = name.to_string();
        if let Some(color) = color {
            folder.color = color;
        }
        folder.updated_at = now_ms().max(folder.updated_at + 1);
        self.save_folders(&folders).await?;
        Ok(FolderOutcome {
            success: true,
            folders,
        })
    }

    /// Remove a folder and detach its drawings back to the root.
    ///
    /// Child folders are left as they are: a deleted parent orphans its
    /// subtree rather than cascading. Folders are written before drawings,
    /// so a crash in between leaves drawings pointing at a folder that no
    /// longer exists until the next delete; accepted, the gateway offers no
    /// multi-key atomicity.
    pub async fn delete_folder(&self, id: &str) -> Result<DeleteFolderOutcome> {
        let mut folders = self.folders().await?;
        folders.retain(|f| f.id != id);
        self.save_folders(&folders).await?;

        let mut drawings = self.drawings().await?;
        let now = now_ms();
        for drawing in drawings.iter_mut().filter(|d| d.folder_id.as_deref() == Some(id)) {
            drawing.folder_id = None;
            drawing.updated_at = now.max(drawing.updated_at + 1);
        }
        self.save_drawings(&drawings).await?;

        Ok(DeleteFolderOutcome {
            success: true,
            folders,
            drawings,
        })
    }

    /// One-time schema migration, run at background startup. Drawings that
    /// predate folders lack a `folderId` field; when the first stored
    /// record has none, every drawing is rewritten with `folderId: null`
    /// and the folder collection is initialized to empty. Returns whether
    /// the rewrite ran. Idempotent: a migrated collection never matches.
    pub async fn migrate(&self) -> Result<bool> {
        let Some(Value::Array(mut records)) = self.storage.get(&self.drawings_key).await? else {
            return Ok(false);
        };
        let needs_migration = records
            .first()
            .and_then(Value::as_object)
            .map(|obj| !obj.contains_key("folderId"))
            .unwrap_or(false);
        if !needs_migration {
            return Ok(false);
        }

        tracing::info!("Migrating {} drawings to the folder schema", records.len());
        for record in records.iter_mut() {
            if let Some(obj) = record.as_object_mut() {
                obj.insert("folderId".to_string(), Value::Null);
            }
        }
        self.storage
            .set(&self.drawings_key, Value::Array(records))
            .await?;
        self.storage
            .set(&self.folders_key, Value::Array(Vec::new()))
            .await?;
        Ok(true)
    }
}

/// `"folder:" + millis + "-" + 9 base36 chars`. Collisions would need two
/// creations in the same millisecond drawing the same suffix; not re-checked.
fn generate_folder_id(now: i64) -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    format!("folder:{}-{}", now, suffix)
}
