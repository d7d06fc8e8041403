//! The operation set consumed by provisioning and sync logic.

use serde_json::{Map, Value};

use crate::error::Result;
use crate::types::{
    AccountPage, Attribute, AttributeSpec, Collection, Document, IndexSpec, RelationshipSpec,
};

/// Administrative operations against the platform.
///
/// [`crate::RemoteClient`] implements this over HTTP; tests implement it
/// in memory. Static dispatch only, so the async methods need no boxing.
#[allow(async_fn_in_trait)]
pub trait RemoteApi {
    /// List every collection in the configured database.
    async fn list_collections(&self) -> Result<Vec<Collection>>;

    /// Create a collection with an explicit id.
    async fn create_collection(&self, id: &str, name: &str) -> Result<Collection>;

    /// Start asynchronous creation of an attribute. The attribute is not
    /// usable until it reports [`crate::AttributeStatus::Available`] via
    /// [`Self::list_attributes`].
    async fn create_attribute(&self, collection_id: &str, spec: &AttributeSpec) -> Result<()>;

    /// List a collection's attributes with their current status.
    async fn list_attributes(&self, collection_id: &str) -> Result<Vec<Attribute>>;

    /// Create a secondary index over already-available attributes.
    async fn create_index(&self, collection_id: &str, spec: &IndexSpec) -> Result<()>;

    /// Create a two-way many-to-one relationship link owned by
    /// `collection_id`. Fails if a field of the same name already exists,
    /// so callers check [`Self::list_attributes`] first.
    async fn create_relationship(
        &self,
        collection_id: &str,
        spec: &RelationshipSpec,
    ) -> Result<()>;

    /// List documents whose `field` equals `value`, capped at `limit`.
    async fn list_documents(
        &self,
        collection_id: &str,
        field: &str,
        value: &str,
        limit: u32,
    ) -> Result<Vec<Document>>;

    /// Create a document with a client-generated id.
    async fn create_document(
        &self,
        collection_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document>;

    /// Fetch one page of the platform's account listing. The platform
    /// guarantees a stable total order, so offset pagination is safe.
    async fn list_accounts(&self, offset: u64, limit: u64) -> Result<AccountPage>;
}
