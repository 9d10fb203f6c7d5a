//! Error taxonomy for the vault core
//! Storage failures are errors; missing records are results, not errors

use thiserror::Error;

/// Failures surfaced by the persistence core and the injection channel.
///
/// Operating on a missing id is deliberately *not* represented here:
/// `update_folder` and `move_drawing` report it as `success: false` and
/// `delete_drawing` treats it as a no-op, matching the RPC contract.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Host key-value I/O failed. Propagated unchanged; no partial write
    /// has occurred for the failing operation.
    #[error("storage failure: {0}")]
    Storage(anyhow::Error),

    /// A persisted collection could not be decoded.
    #[error("malformed record under key {key}")]
    MalformedRecord { key: String },

    /// Extraction was requested but no matching page is active.
    #[error("no active drawing page")]
    NoActivePage,

    /// The in-page routine (extraction or injection) failed.
    #[error("page script failed: {0}")]
    PageScript(String),
}

impl VaultError {
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
