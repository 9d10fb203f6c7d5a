//! RPC message set - the sole access path to the background context
//! Tagged requests, shape-matched responses, null for unmatched envelopes

pub mod dispatch;

pub use dispatch::Background;

use crate::vault::{Drawing, DrawingSnapshot, Folder, OpenDrawingPayload, SaveDrawingPayload, Workspace};
use serde::{Deserialize, Serialize};

/// Request messages, wire-tagged as `{"type": KIND, "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    GetAllDrawings,
    GetWorkspace,
    SaveDrawing(SaveDrawingPayload),
    DeleteDrawing {
        id: String,
    },
    #[serde(rename_all = "camelCase")]
    MoveDrawing {
        drawing_id: String,
        folder_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CreateFolder {
        name: String,
        #[serde(default)]
        parent_id: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
    UpdateFolder {
        id: String,
        name: String,
        #[serde(default)]
        color: Option<String>,
    },
    DeleteFolder {
        id: String,
    },
    GetDrawingData,
    OpenDrawing(OpenDrawingPayload),
}

/// Every message kind this dispatcher knows. An envelope with any other
/// `type` resolves to `null` so callers can tell "no handler matched" from
/// a domain error.
pub const REQUEST_KINDS: [&str; 10] = [
    "GET_ALL_DRAWINGS",
    "GET_WORKSPACE",
    "SAVE_DRAWING",
    "DELETE_DRAWING",
    "MOVE_DRAWING",
    "CREATE_FOLDER",
    "UPDATE_FOLDER",
    "DELETE_FOLDER",
    "GET_DRAWING_DATA",
    "OPEN_DRAWING",
];

/// Response messages. Untagged: each serializes as the bare object shape
/// the original protocol used. Variant order matters for deserialization -
/// shapes that are supersets of others come first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    /// GET_DRAWING_DATA success.
    DrawingData(DrawingSnapshot),
    /// DELETE_FOLDER: folders without the deleted id, drawings detached.
    FolderDeleted {
        success: bool,
        folders: Vec<Folder>,
        drawings: Vec<Drawing>,
    },
    /// SAVE_DRAWING and MOVE_DRAWING.
    DrawingsMutated {
        success: bool,
        drawings: Vec<Drawing>,
    },
    /// CREATE_FOLDER and UPDATE_FOLDER.
    FoldersMutated {
        success: bool,
        folders: Vec<Folder>,
    },
    /// GET_WORKSPACE.
    Workspace(Workspace),
    /// GET_ALL_DRAWINGS and DELETE_DRAWING.
    Drawings { drawings: Vec<Drawing> },
    /// OPEN_DRAWING acknowledged: slot written, page opened.
    Opened { success: bool },
    /// Domain failure, rendered by the caller instead of crashing it.
    Error { error: String },
    /// No matching handler; serializes to `null`.
    Unmatched,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_format_matches_protocol() {
        let request = Request::MoveDrawing {
            drawing_id: "d1".to_string(),
            folder_id: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"type": "MOVE_DRAWING", "payload": {"drawingId": "d1", "folderId": null}})
        );
    }

    #[test]
    fn payload_free_request_parses_without_payload_key() {
        let request: Request =
            serde_json::from_value(json!({"type": "GET_ALL_DRAWINGS"})).unwrap();
        assert!(matches!(request, Request::GetAllDrawings));
    }

    #[test]
    fn create_folder_payload_defaults_optional_fields() {
        let request: Request = serde_json::from_value(
            json!({"type": "CREATE_FOLDER", "payload": {"name": "Work"}}),
        )
        .unwrap();
        match request {
            Request::CreateFolder {
                name,
                parent_id,
                color,
            } => {
                assert_eq!(name, "Work");
                assert_eq!(parent_id, None);
                assert_eq!(color, None);
            }
            other => panic!("unexpected request: {:?}", other),
        }
    }

    #[test]
    fn unmatched_response_serializes_to_null() {
        assert_eq!(serde_json::to_value(Response::Unmatched).unwrap(), json!(null));
    }

    #[test]
    fn response_shapes_stay_distinct() {
        let value = json!({"success": true, "folders": [], "drawings": []});
        let response: Response = serde_json::from_value(value).unwrap();
        assert!(matches!(response, Response::FolderDeleted { .. }));

        let value = json!({"error": "boom"});
        let response: Response = serde_json::from_value(value).unwrap();
        assert!(matches!(response, Response::Error { .. }));
    }
}
