//! Drawing list mirror for one UI context
//! Caches the last server response; search and folder views are computed

use crate::client::RpcTransport;
use crate::host::Telemetry;
use crate::rpc::{Request, Response};
use crate::vault::{now_ms, Drawing, DrawingSnapshot, Folder, SaveDrawingPayload};
use std::sync::Arc;

const LOAD_FAILED: &str = "Failed to load drawings";
const SAVE_FAILED: &str = "Failed to save drawing";
const DELETE_FAILED: &str = "Failed to delete drawing";
const MOVE_FAILED: &str = "Failed to move drawing";
const OPEN_FAILED: &str = "Failed to open drawing";
const EXTRACT_FAILED: &str = "Failed to get drawing data. Are you on the drawing page?";

/// One per UI context, owned by that context and never shared. Each
/// surface re-fetches when it starts; there is no push invalidation from
/// the background.
pub struct DrawingsCache {
    transport: Arc<dyn RpcTransport>,
    telemetry: Arc<dyn Telemetry>,
    list: Vec<Drawing>,
    loading: bool,
    error: Option<String>,
}

impl DrawingsCache {
    pub fn new(transport: Arc<dyn RpcTransport>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self {
            transport,
            telemetry,
            list: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn list(&self) -> &[Drawing] {
        &self.list
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// User-facing message for the last failed operation, cleared at the
    /// start of every new one. Native error text never reaches the UI.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the authoritative drawing list.
    pub async fn load(&mut self) {
        self.begin();
        match self.transport.send(Request::GetAllDrawings).await {
            Ok(Response::Drawings { drawings }) => self.list = drawings,
            other => self.fail(LOAD_FAILED, "load_drawings", other),
        }
        self.loading = false;
    }

    /// Combined initial fetch; caches the drawings and hands the folders
    /// back for the folder cache of the same context.
    pub async fn load_workspace(&mut self) -> Vec<Folder> {
        self.begin();
        let folders = match self.transport.send(Request::GetWorkspace).await {
            Ok(Response::Workspace(workspace)) => {
                self.list = workspace.drawings;
                workspace.folders
            }
            other => {
                self.fail(LOAD_FAILED, "load_workspace", other);
                Vec::new()
            }
        };
        self.loading = false;
        folders
    }

    /// Save (insert or replace) and re-fetch.
    pub async fn save(&mut self, data: SaveDrawingPayload) {
        self.begin();
        match self.transport.send(Request::SaveDrawing(data)).await {
            Ok(Response::DrawingsMutated { .. }) => self.refetch(SAVE_FAILED, "save_drawing").await,
            other => self.fail(SAVE_FAILED, "save_drawing", other),
        }
        self.loading = false;
    }

    /// Re-save an existing drawing, preserving the folder it already sits
    /// in according to this cache.
    pub async fn update(&mut self, mut data: SaveDrawingPayload) {
        data.folder_id = self
            .list
            .iter()
            .find(|d| d.id == data.id)
            .and_then(|d| d.folder_id.clone());
        self.save(data).await;
    }

    /// Save a copy under a fresh id with a " (copy)" name suffix.
    pub async fn duplicate(&mut self, drawing: &Drawing) {
        let copy = SaveDrawingPayload {
            id: format!("copy_{}", now_ms()),
            name: format!("{} (copy)", drawing.name),
            elements: drawing.elements.clone(),
            app_state: drawing.app_state.clone(),
            version_files: drawing.version_files.clone(),
            version_data_state: drawing.version_data_state.clone(),
            image_base64: drawing.image_base64.clone(),
            view_background_color: drawing.view_background_color.clone(),
            folder_id: drawing.folder_id.clone(),
        };
        self.save(copy).await;
    }

    pub async fn delete(&mut self, id: &str) {
        self.begin();
        match self
            .transport
            .send(Request::DeleteDrawing { id: id.to_string() })
            .await
        {
            Ok(Response::Drawings { .. }) => self.refetch(DELETE_FAILED, "delete_drawing").await,
            other => self.fail(DELETE_FAILED, "delete_drawing", other),
        }
        self.loading = false;
    }

    /// Move to a folder, or to the root with `None`.
    pub async fn move_to_folder(&mut self, id: &str, folder_id: Option<String>) {
        self.begin();
        match self
            .transport
            .send(Request::MoveDrawing {
                drawing_id: id.to_string(),
                folder_id,
            })
            .await
        {
            Ok(Response::DrawingsMutated { .. }) => self.refetch(MOVE_FAILED, "move_drawing").await,
            other => self.fail(MOVE_FAILED, "move_drawing", other),
        }
        self.loading = false;
    }

    /// Capture the live drawing from the active foreign page, if any.
    pub async fn current_drawing(&mut self) -> Option<DrawingSnapshot> {
        self.error = None;
        match self.transport.send(Request::GetDrawingData).await {
            Ok(Response::DrawingData(snapshot)) => Some(snapshot),
            other => {
                self.fail(EXTRACT_FAILED, "get_drawing_data", other);
                None
            }
        }
    }

    /// Inject a saved drawing into the foreign page via the handoff slot.
    pub async fn open(&mut self, drawing: &Drawing) {
        self.error = None;
        let payload = crate::vault::OpenDrawingPayload {
            id: drawing.id.clone(),
            name: drawing.name.clone(),
            elements: drawing.elements.clone(),
            app_state: drawing.app_state.clone(),
            version_files: drawing.version_files.clone(),
            version_data_state: drawing.version_data_state.clone(),
        };
        match self.transport.send(Request::OpenDrawing(payload)).await {
            Ok(Response::Opened { .. }) => {}
            other => self.fail(OPEN_FAILED, "open_drawing", other),
        }
    }

    /// Case-insensitive substring filter over `name`. Computed, not cached.
    pub fn filtered(&self, query: &str) -> Vec<&Drawing> {
        let needle = query.to_lowercase();
        self.list
            .iter()
            .filter(|d| d.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Drawings belonging to one folder, by linear scan.
    pub fn in_folder(&self, folder_id: &str) -> Vec<&Drawing> {
        self.list
            .iter()
            .filter(|d| d.folder_id.as_deref() == Some(folder_id))
            .collect()
    }

    /// Drawings at the vault root.
    pub fn root_drawings(&self) -> Vec<&Drawing> {
        self.list.iter().filter(|d| d.folder_id.is_none()).collect()
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Post-mutation re-fetch. A failure here fails the whole operation:
    /// the cache would otherwise keep a stale list behind a clean error
    /// state.
    async fn refetch(&mut self, message: &str, context: &str) {
        match self.transport.send(Request::GetAllDrawings).await {
            Ok(Response::Drawings { drawings }) => self.list = drawings,
            other => self.fail(message, context, other),
        }
    }

    fn fail(&mut self, message: &str, context: &str, outcome: crate::error::Result<Response>) {
        let detail = match outcome {
            Ok(Response::Error { error }) => error,
            Ok(other) => format!("unexpected response: {:?}", other),
            Err(err) => err.to_string(),
        };
        self.telemetry.report(&detail, context);
        self.error = Some(message.to_string());
    }
}
