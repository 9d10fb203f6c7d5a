//! Request dispatcher resident in the background context
//! Exhaustive match over the message set; domain errors become `{error}`

use crate::config::VaultConfig;
use crate::error::VaultError;
use crate::host::{PageHost, Telemetry};
use crate::inject::InjectionChannel;
use crate::rpc::{Request, Response, REQUEST_KINDS};
use crate::storage::StorageArea;
use crate::vault::VaultStore;
use serde_json::Value;
use std::sync::Arc;

const EXTRACT_FAILED: &str = "Failed to get drawing data. Are you on the drawing page?";
const NO_ACTIVE_PAGE: &str = "No active tab";

/// The single handler every other context reaches the vault through. Owns
/// the persistence store and the injection channel; one per background
/// context, constructed explicitly and passed where needed.
pub struct Background {
    store: VaultStore,
    inject: InjectionChannel,
    pages: Arc<dyn PageHost>,
    telemetry: Arc<dyn Telemetry>,
}

impl Background {
    /// Wire up the background context and run the one-time migration.
    pub async fn init(
        storage: Arc<dyn StorageArea>,
        pages: Arc<dyn PageHost>,
        telemetry: Arc<dyn Telemetry>,
        config: &VaultConfig,
    ) -> crate::error::Result<Self> {
        let store = VaultStore::new(
            Arc::clone(&storage),
            &config.drawings_key,
            &config.folders_key,
        );
        if store.migrate().await? {
            tracing::info!("Drawing collection migrated to the folder schema");
        }
        let inject = InjectionChannel::new(
            storage,
            Arc::clone(&pages),
            &config.inject_key,
            &config.target_url,
        );
        Ok(Self {
            store,
            inject,
            pages,
            telemetry,
        })
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }

    /// Dispatch one request. Never rejects: handler failures are reported
    /// to telemetry and converted into an `Error` response for the caller
    /// to render.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::GetAllDrawings => match self.store.list_drawings().await {
                Ok(drawings) => Response::Drawings { drawings },
                Err(err) => self.fail("GET_ALL_DRAWINGS", err),
            },
            Request::GetWorkspace => match self.store.workspace().await {
                Ok(workspace) => Response::Workspace(workspace),
                Err(err) => self.fail("GET_WORKSPACE", err),
            },
            Request::SaveDrawing(payload) => match self.store.upsert_drawing(payload).await {
                Ok(drawings) => Response::DrawingsMutated {
                    success: true,
                    drawings,
                },
                Err(err) => self.fail("SAVE_DRAWING", err),
            },
            Request::DeleteDrawing { id } => match self.store.delete_drawing(&id).await {
                Ok(drawings) => Response::Drawings { drawings },
                Err(err) => self.fail("DELETE_DRAWING", err),
            },
            Request::MoveDrawing {
                drawing_id,
                folder_id,
            } => match self.store.move_drawing(&drawing_id, folder_id).await {
                Ok(outcome) => Response::DrawingsMutated {
                    success: outcome.success,
                    drawings: outcome.drawings,
                },
                Err(err) => self.fail("MOVE_DRAWING", err),
            },
            Request::CreateFolder {
                name,
                parent_id,
                color,
            } => match self.store.create_folder(&name, parent_id, color).await {
                Ok(folders) => Response::FoldersMutated {
                    success: true,
                    folders,
                },
                Err(err) => self.fail("CREATE_FOLDER", err),
            },
            Request::UpdateFolder { id, name, color } => {
                match self.store.update_folder(&id, &name, color).await {
                    Ok(outcome) => Response::FoldersMutated {
                        success: outcome.success,
                        folders: outcome.folders,
                    },
                    Err(err) => self.fail("UPDATE_FOLDER", err),
                }
            }
            Request::DeleteFolder { id } => match self.store.delete_folder(&id).await {
                Ok(outcome) => Response::FolderDeleted {
                    success: outcome.success,
                    folders: outcome.folders,
                    drawings: outcome.drawings,
                },
                Err(err) => self.fail("DELETE_FOLDER", err),
            },
            Request::GetDrawingData => match self.pages.extract_drawing().await {
                Ok(snapshot) => Response::DrawingData(snapshot),
                Err(VaultError::NoActivePage) => {
                    self.telemetry.report(NO_ACTIVE_PAGE, "GET_DRAWING_DATA");
                    Response::Error {
                        error: NO_ACTIVE_PAGE.to_string(),
                    }
                }
                Err(err) => {
                    self.telemetry.report(&err.to_string(), "GET_DRAWING_DATA");
                    Response::Error {
                        error: EXTRACT_FAILED.to_string(),
                    }
                }
            },
            Request::OpenDrawing(payload) => match self.inject.open_drawing(&payload).await {
                Ok(()) => Response::Opened { success: true },
                Err(err) => self.fail("OPEN_DRAWING", err),
            },
        }
    }

    /// Transport boundary. Envelopes without a recognized `type` tag
    /// resolve to `null`; a recognized tag with a payload that fails shape
    /// validation gets a structured error instead of a silent pass-through.
    pub async fn handle_envelope(&self, message: Value) -> Value {
        let Some(kind) = message.get("type").and_then(Value::as_str) else {
            return Value::Null;
        };
        if !REQUEST_KINDS.contains(&kind) {
            return Value::Null;
        }
        let kind = kind.to_string();

        match serde_json::from_value::<Request>(message) {
            Ok(request) => {
                serde_json::to_value(self.handle(request).await).unwrap_or(Value::Null)
            }
            Err(err) => {
                self.telemetry
                    .report(&format!("Malformed {} payload: {}", kind, err), "rpc");
                serde_json::to_value(Response::Error {
                    error: format!("Invalid payload for {}", kind),
                })
                .unwrap_or(Value::Null)
            }
        }
    }

    fn fail(&self, context: &str, err: VaultError) -> Response {
        self.telemetry.report(&err.to_string(), context);
        Response::Error {
            error: err.to_string(),
        }
    }
}
