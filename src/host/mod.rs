//! Host runtime capabilities consumed by the core
//! Pages, foreign-page local state, and the telemetry sink, all as traits

use crate::error::Result;
use crate::vault::DrawingSnapshot;
use async_trait::async_trait;

/// Page/tab control for the target drawing site.
#[async_trait]
pub trait PageHost: Send + Sync {
    /// Open a new page for the URL, or focus an existing matching one.
    async fn open_or_focus(&self, url: &str) -> Result<()>;

    /// Run the capture routine inside the active matching page and return
    /// the drawing's live blobs plus an optional freshly rendered preview.
    /// Fails with `NoActivePage` when no matching page is in front, or
    /// `PageScript` when the routine itself blows up.
    async fn extract_drawing(&self) -> Result<DrawingSnapshot>;
}

/// The foreign page's own per-origin local state. Only the injection
/// consumer touches this; it is not the vault's storage.
#[async_trait]
pub trait PageLocalState: Send + Sync {
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Full page reload so the foreign application re-reads its state.
    async fn reload(&self) -> Result<()>;
}

/// Error-telemetry sink. Consumed, never implemented with retries or
/// batching here; the default just forwards to tracing.
pub trait Telemetry: Send + Sync {
    fn report(&self, error: &str, context: &str);

    fn message(&self, text: &str, context: &str) {
        tracing::info!(context, "{}", text);
    }
}

/// Telemetry sink that logs through tracing.
#[derive(Default, Clone)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn report(&self, error: &str, context: &str) {
        tracing::error!(context, "{}", error);
    }
}
