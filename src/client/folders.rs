//! Folder tree mirror for one UI context
//! Sorting, expansion, and tree queries are local; mutations go via RPC

use crate::client::RpcTransport;
use crate::host::Telemetry;
use crate::rpc::{Request, Response};
use crate::vault::colors::FOLDER_COLORS;
use crate::vault::Folder;
use std::collections::HashSet;
use std::sync::Arc;

const LOAD_FAILED: &str = "Failed to load folders";
const CREATE_FAILED: &str = "Failed to create folder";
const UPDATE_FAILED: &str = "Failed to update folder";
const DELETE_FAILED: &str = "Failed to delete folder";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Name,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// One per UI context. Expansion state is pure UI state, a local id set
/// independent of anything persisted.
pub struct FoldersCache {
    transport: Arc<dyn RpcTransport>,
    telemetry: Arc<dyn Telemetry>,
    folders: Vec<Folder>,
    loading: bool,
    error: Option<String>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    expanded: HashSet<String>,
}

impl FoldersCache {
    pub fn new(transport: Arc<dyn RpcTransport>, telemetry: Arc<dyn Telemetry>) -> Self {
        Self {
            transport,
            telemetry,
            folders: Vec::new(),
            loading: false,
            error: None,
            sort_by: SortBy::Name,
            sort_order: SortOrder::Asc,
            expanded: HashSet::new(),
        }
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch the authoritative folder list (workspace fetch, folders half).
    pub async fn load(&mut self) {
        self.begin();
        match self.transport.send(Request::GetWorkspace).await {
            Ok(Response::Workspace(workspace)) => self.folders = workspace.folders,
            other => self.fail(LOAD_FAILED, "load_folders", other),
        }
        self.loading = false;
    }

    /// Create a folder and re-fetch. When no color is chosen, the palette
    /// entry at the collection-size offset is proposed, mirroring what the
    /// store would assign.
    pub async fn create(&mut self, name: &str, parent_id: Option<String>, color: Option<String>) {
        self.begin();
        let color =
            color.unwrap_or_else(|| FOLDER_COLORS[self.folders.len() % FOLDER_COLORS.len()].to_string());
        match self
            .transport
            .send(Request::CreateFolder {
                name: name.to_string(),
                parent_id,
                color: Some(color),
            })
            .await
        {
            Ok(Response::FoldersMutated { .. }) => {
                self.refetch(CREATE_FAILED, "create_folder").await
            }
            other => self.fail(CREATE_FAILED, "create_folder", other),
        }
        self.loading = false;
    }

    /// Rename (and optionally recolor) a folder, then re-fetch.
    pub async fn update(&mut self, id: &str, name: &str, color: Option<String>) {
        self.begin();
        match self
            .transport
            .send(Request::UpdateFolder {
                id: id.to_string(),
                name: name.to_string(),
                color,
            })
            .await
        {
            Ok(Response::FoldersMutated { .. }) => {
                self.refetch(UPDATE_FAILED, "update_folder").await
            }
            other => self.fail(UPDATE_FAILED, "update_folder", other),
        }
        self.loading = false;
    }

    pub async fn delete(&mut self, id: &str) {
        self.begin();
        match self
            .transport
            .send(Request::DeleteFolder { id: id.to_string() })
            .await
        {
            Ok(Response::FolderDeleted { .. }) => {
                self.refetch(DELETE_FAILED, "delete_folder").await
            }
            other => self.fail(DELETE_FAILED, "delete_folder", other),
        }
        self.loading = false;
    }

    /// Sorted view per the current comparator settings. Computed on demand.
    pub fn sorted(&self) -> Vec<Folder> {
        let mut folders = self.folders.clone();
        folders.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortBy::Name => a.name.cmp(&b.name),
                SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        folders
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.expanded.remove(id) {
            self.expanded.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn folder_by_id(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    /// Direct children of a parent (`None` for root-level folders).
    pub fn children(&self, parent_id: Option<&str>) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect()
    }

    /// Ancestor chain, root first, ending at the folder itself. A dangling
    /// parent link just terminates the walk early.
    pub fn path(&self, id: &str) -> Vec<&Folder> {
        let mut path = Vec::new();
        let mut current = self.folder_by_id(id);
        while let Some(folder) = current {
            path.insert(0, folder);
            current = folder
                .parent_id
                .as_deref()
                .and_then(|pid| self.folder_by_id(pid));
        }
        path
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Post-mutation re-fetch. A failure here fails the whole operation:
    /// the cache would otherwise keep a stale list behind a clean error
    /// state.
    async fn refetch(&mut self, message: &str, context: &str) {
        match self.transport.send(Request::GetWorkspace).await {
            Ok(Response::Workspace(workspace)) => self.folders = workspace.folders,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LocalTransport;
    use crate::config::VaultConfig;
    use crate::error::VaultError;
    use crate::host::{PageHost, TracingTelemetry};
    use crate::rpc::Background;
    use crate::storage::MemoryStorage;
    use crate::vault::DrawingSnapshot;
    use async_trait::async_trait;

    struct NoPages;

    #[async_trait]
    impl PageHost for NoPages {
        async fn open_or_focus(&self, _url: &str) -> crate::error::Result<()> {
            Ok(())
        }
        async fn extract_drawing(&self) -> crate::error::Result<DrawingSnapshot> {
            Err(VaultError::NoActivePage)
        }
    }

    async fn cache() -> FoldersCache {
        let background = Background::init(
            Arc::new(MemoryStorage::new()),
            Arc::new(NoPages),
            Arc::new(TracingTelemetry),
            &VaultConfig::default(),
        )
        .await
        .unwrap();
        FoldersCache::new(
            Arc::new(LocalTransport::new(Arc::new(background))),
            Arc::new(TracingTelemetry),
        )
    }

    #[tokio::test]
    async fn create_refetches_authoritative_list() {
        let mut folders = cache().await;
        folders.create("Work", None, None).await;
        folders.create("Home", None, None).await;
        assert_eq!(folders.folders().len(), 2);
        assert!(folders.error().is_none());
        assert!(!folders.loading());
        // Distinct default colors for the first two folders
        assert_ne!(folders.folders()[0].color, folders.folders()[1].color);
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() {
        let mut folders = cache().await;
        folders.create("Work", None, None).await;
        let id = folders.folders()[0].id.clone();

        folders.update(&id, "Projects", None).await;
        assert_eq!(folders.folders()[0].name, "Projects");

        folders.delete(&id).await;
        assert!(folders.folders().is_empty());
    }

    #[tokio::test]
    async fn sorted_view_honors_comparator_settings() {
        let mut folders = cache().await;
        folders.create("Beta", None, None).await;
        folders.create("Alpha", None, None).await;

        let sorted = folders.sorted();
        assert_eq!(sorted[0].name, "Alpha");

        folders.sort_order = SortOrder::Desc;
        let sorted = folders.sorted();
        assert_eq!(sorted[0].name, "Beta");

        folders.sort_by = SortBy::CreatedAt;
        folders.sort_order = SortOrder::Asc;
        let sorted = folders.sorted();
        assert_eq!(sorted[0].name, "Beta"); // created first
    }

    #[tokio::test]
    async fn expansion_is_local_toggle_state() {
        let mut folders = cache().await;
        assert!(!folders.is_expanded("f1"));
        folders.toggle("f1");
        assert!(folders.is_expanded("f1"));
        folders.toggle("f1");
        assert!(!folders.is_expanded("f1"));
    }

    #[tokio::test]
    async fn tree_queries_walk_parent_links() {
        let mut folders = cache().await;
        folders.create("Root", None, None).await;
        let root_id = folders.folders()[0].id.clone();
        folders.create("Child", Some(root_id.clone()), None).await;
        let child_id = folders
            .folders()
            .iter()
            .find(|f| f.name == "Child")
            .unwrap()
            .id
            .clone();

        assert_eq!(folders.children(None).len(), 1);
        assert_eq!(folders.children(Some(&root_id))[0].name, "Child");

        let path: Vec<&str> = folders.path(&child_id).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(path, ["Root", "Child"]);
    }

    /// Mutations go through but the follow-up workspace fetch is lost.
    struct FlakyTransport;

    #[async_trait]
    impl RpcTransport for FlakyTransport {
        async fn send(&self, request: Request) -> crate::error::Result<Response> {
            match request {
                Request::CreateFolder { .. } => Ok(Response::FoldersMutated {
                    success: true,
                    folders: Vec::new(),
                }),
                _ => Err(VaultError::storage(anyhow::anyhow!("fetch lost"))),
            }
        }
    }

    #[derive(Default)]
    struct CapturingTelemetry {
        reports: std::sync::Mutex<Vec<String>>,
    }

    impl Telemetry for CapturingTelemetry {
        fn report(&self, error: &str, context: &str) {
            self.reports
                .lock()
                .unwrap()
                .push(format!("{}: {}", context, error));
        }
    }

    #[tokio::test]
    async fn failed_refetch_fails_the_mutation() {
        let telemetry = Arc::new(CapturingTelemetry::default());
        let mut folders = FoldersCache::new(Arc::new(FlakyTransport), telemetry.clone());

        folders.create("Work", None, None).await;
        assert_eq!(folders.error(), Some("Failed to create folder"));
        assert!(folders.folders().is_empty());
        assert_eq!(telemetry.reports.lock().unwrap().len(), 1);
        assert!(!folders.loading());
    }

    /// Transport that always fails, standing in for a torn-down host.
    struct DeadTransport;

    #[async_trait]
    impl RpcTransport for DeadTransport {
        async fn send(&self, _request: Request) -> crate::error::Result<Response> {
            Err(VaultError::storage(anyhow::anyhow!("context gone")))
        }
    }

    #[tokio::test]
    async fn transport_failure_sets_fixed_messages_not_native_text() {
        let mut folders = FoldersCache::new(Arc::new(DeadTransport), Arc::new(TracingTelemetry));

        folders.load().await;
        assert_eq!(folders.error(), Some("Failed to load folders"));

        folders.create("Work", None, None).await;
        assert_eq!(folders.error(), Some("Failed to create folder"));

        folders.update("f1", "X", None).await;
        assert_eq!(folders.error(), Some("Failed to update folder"));

        folders.delete("f1").await;
        assert_eq!(folders.error(), Some("Failed to delete folder"));
        assert!(!folders.loading());
    }
}
