//! One-shot injection handoff into the foreign drawing page
//! Write a reserved slot, open the page, consume-and-delete on page load

use crate::error::{Result, VaultError};
use crate::host::{PageHost, PageLocalState, Telemetry};
use crate::storage::StorageArea;
use crate::vault::OpenDrawingPayload;
use std::sync::Arc;

/// Fixed keys the foreign application reads its state from.
pub const ELEMENTS_KEY: &str = "excalidraw";
pub const APP_STATE_KEY: &str = "excalidraw-state";
pub const DRAWING_ID_KEY: &str = "drawing-id";
pub const DRAWING_TITLE_KEY: &str = "drawing-title";
pub const VERSION_FILES_KEY: &str = "version-files";
pub const VERSION_DATA_STATE_KEY: &str = "version-dataState";

/// Writer side of the handoff, owned by the background context.
pub struct InjectionChannel {
    storage: Arc<dyn StorageArea>,
    pages: Arc<dyn PageHost>,
    inject_key: String,
    target_url: String,
}

impl InjectionChannel {
    pub fn new(
        storage: Arc<dyn StorageArea>,
        pages: Arc<dyn PageHost>,
        inject_key: &str,
        target_url: &str,
    ) -> Self {
        Self {
            storage,
            pages,
            inject_key: inject_key.to_string(),
            target_url: target_url.to_string(),
        }
    }

    /// Stage the drawing in the reserved slot and bring up the target page.
    /// The page's cooperating script finishes the handoff on load.
    pub async fn open_drawing(&self, payload: &OpenDrawingPayload) -> Result<()> {
        let value = serde_json::to_value(payload).map_err(VaultError::storage)?;
        self.storage.set(&self.inject_key, value).await?;
        tracing::debug!("Staged drawing {} for injection", payload.id);
        self.pages.open_or_focus(&self.target_url).await
    }
}

/// What the consuming script found on page load.
#[derive(Debug, PartialEq)]
pub enum InjectionOutcome {
    Injected,
    /// Empty slot: the user navigated to the page directly. Normal, not an
    /// error.
    NothingToInject,
}

/// Consumer side, run by the cooperating script inside the foreign page.
/// Copies the staged fields into the page's own local state, deletes the
/// slot so the handoff fires at most once, then triggers a full reload.
pub async fn consume_injection(
    storage: &dyn StorageArea,
    page: &dyn PageLocalState,
    telemetry: &dyn Telemetry,
    inject_key: &str,
) -> Result<InjectionOutcome> {
    let Some(value) = storage.get(inject_key).await? else {
        telemetry.message("No drawing data to inject", "consume_injection");
        return Ok(InjectionOutcome::NothingToInject);
    };
    let payload: OpenDrawingPayload =
        serde_json::from_value(value).map_err(|_| VaultError::MalformedRecord {
            key: inject_key.to_string(),
        })?;

    telemetry.message(
        &format!("Injecting drawing data: {}", payload.name),
        "consume_injection",
    );

    page.set_item(ELEMENTS_KEY, &payload.elements).await?;
    page.set_item(APP_STATE_KEY, &payload.app_state).await?;
    page.set_item(DRAWING_ID_KEY, &payload.id).await?;
    page.set_item(DRAWING_TITLE_KEY, &payload.name).await?;
    if !payload.version_files.is_empty() {
        page.set_item(VERSION_FILES_KEY, &payload.version_files).await?;
    }
    if !payload.version_data_state.is_empty() {
        page.set_item(VERSION_DATA_STATE_KEY, &payload.version_data_state)
            .await?;
    }

    storage.remove(inject_key).await?;
    page.reload().await?;
    Ok(InjectionOutcome::Injected)
}
