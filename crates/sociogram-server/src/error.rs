//! Error taxonomy for the server.
//!
//! Each failure class has its own type because each one is handled
//! differently: configuration problems are fatal before serving,
//! provisioning problems leave the server degraded, sync problems are
//! surfaced to the HTTP caller, and per-account problems are logged and
//! skipped inside the sync loop.

use sociogram_remote::RemoteError;
use thiserror::Error;

/// A required environment value is missing or unusable. Fatal; the
/// process exits before serving.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// A remote call failed during schema setup. Partial progress is
/// retained; the server keeps serving in a degraded state until an
/// operator reruns provisioning.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),

    /// Attribute creation did not settle within the allotted poll attempts.
    #[error("Attributes on \"{collection}\" not available after {attempts} poll attempts")]
    AttributesNotReady { collection: String, attempts: u32 },

    /// The platform reported an attribute as failed.
    #[error("Attribute \"{key}\" on \"{collection}\" failed to provision")]
    AttributeFailed { collection: String, key: String },
}

/// An account sync run could not complete. Surfaced to the HTTP caller
/// as a 500.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("The \"users\" collection does not exist; rerun provisioning")]
    SchemaNotReady,

    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),
}

/// Failure handling one account during sync. Logged and skipped; never
/// aborts the batch and never reaches the HTTP caller.
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Remote call failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Stored profile is malformed: {0}")]
    MalformedProfile(#[from] serde_json::Error),
}
