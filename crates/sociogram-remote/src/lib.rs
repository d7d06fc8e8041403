//! # sociogram-remote
//!
//! Typed binding to the hosting platform's administrative REST API.
//!
//! The platform owns document storage, indexing and relationship
//! semantics; this crate only wraps its HTTP surface in typed Rust
//! operations. Two pieces matter to callers:
//!
//! - [`RemoteApi`] -- the operation set (collections, attributes,
//!   indexes, relationships, documents, account listing). Provisioning
//!   and sync logic is written against this trait so tests can swap in
//!   an in-memory implementation.
//! - [`RemoteClient`] -- the reqwest-backed implementation, built from
//!   an explicit [`RemoteConfig`] (endpoint, project, credential,
//!   database). There is no process-global client state.

mod api;
mod client;
mod error;
mod types;

pub use api::RemoteApi;
pub use client::RemoteClient;
pub use error::{RemoteError, Result};
pub use types::{
    Account, AccountPage, AccountPrefs, Attribute, AttributeKind, AttributeSpec, AttributeStatus,
    Collection, Document, IndexKind, IndexSpec, OnDelete, RelationshipSpec, RemoteConfig,
};
