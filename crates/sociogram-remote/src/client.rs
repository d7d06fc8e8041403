//! reqwest-backed implementation of [`RemoteApi`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::api::RemoteApi;
use crate::error::{RemoteError, Result};
use crate::types::{
    AccountPage, Attribute, AttributeKind, AttributeSpec, Collection, Document, IndexSpec,
    RelationshipSpec, RemoteConfig,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the platform's administrative API.
///
/// Cheap to clone; holds only the connection pool and the configuration
/// it was constructed with.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    config: RemoteConfig,
}

/// Error body the platform returns on non-success statuses.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct CollectionList {
    collections: Vec<Collection>,
}

#[derive(Deserialize)]
struct AttributeList {
    attributes: Vec<Attribute>,
}

#[derive(Deserialize)]
struct DocumentList {
    documents: Vec<Document>,
}

impl RemoteClient {
    /// Build a client from explicit configuration. Fails if the project id
    /// or API key cannot be encoded as header values.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-project-id",
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| RemoteError::InvalidConfig(format!("project id: {e}")))?,
        );
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&config.api_key)
                .map_err(|e| RemoteError::InvalidConfig(format!("api key: {e}")))?,
        );

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    fn collections_url(&self) -> String {
        format!(
            "{}/databases/{}/collections",
            self.config.endpoint.trim_end_matches('/'),
            self.config.database_id
        )
    }

    fn collection_url(&self, collection_id: &str) -> String {
        format!("{}/{}", self.collections_url(), collection_id)
    }

    fn accounts_url(&self) -> String {
        format!("{}/accounts", self.config.endpoint.trim_end_matches('/'))
    }

    /// Decode a response body, surfacing non-success statuses as
    /// [`RemoteError::Api`] with the platform's message when one is
    /// present.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
                .map(|body| body.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Like [`Self::decode`] for calls where the response body is not
    /// needed.
    async fn expect_success(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let bytes = response.bytes().await?;
        let message = serde_json::from_slice::<ApiErrorBody>(&bytes)
            .map(|body| body.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Map an attribute spec to its creation endpoint segment and JSON body.
fn attribute_request(spec: &AttributeSpec) -> (&'static str, Value) {
    match spec.kind {
        AttributeKind::Text { size } | AttributeKind::LongText { size } => (
            "string",
            json!({
                "key": spec.key,
                "size": size,
                "required": spec.required,
                "default": spec.default,
                "array": false,
            }),
        ),
        AttributeKind::TextArray { size } => (
            "string",
            json!({
                "key": spec.key,
                "size": size,
                "required": spec.required,
                "default": spec.default,
                "array": true,
            }),
        ),
        AttributeKind::Email => (
            "email",
            json!({
                "key": spec.key,
                "required": spec.required,
                "default": spec.default,
            }),
        ),
    }
}

impl RemoteApi for RemoteClient {
    async fn list_collections(&self) -> Result<Vec<Collection>> {
        let response = self.client.get(self.collections_url()).send().await?;
        let list: CollectionList = Self::decode(response).await?;
        Ok(list.collections)
    }

    async fn create_collection(&self, id: &str, name: &str) -> Result<Collection> {
        debug!(id, name, "creating collection");
        let response = self
            .client
            .post(self.collections_url())
            .json(&json!({ "collectionId": id, "name": name }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_attribute(&self, collection_id: &str, spec: &AttributeSpec) -> Result<()> {
        let (segment, body) = attribute_request(spec);
        debug!(collection = collection_id, key = %spec.key, "creating attribute");
        let response = self
            .client
            .post(format!(
                "{}/attributes/{segment}",
                self.collection_url(collection_id)
            ))
            .json(&body)
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn list_attributes(&self, collection_id: &str) -> Result<Vec<Attribute>> {
        let response = self
            .client
            .get(format!("{}/attributes", self.collection_url(collection_id)))
            .send()
            .await?;
        let list: AttributeList = Self::decode(response).await?;
        Ok(list.attributes)
    }

    async fn create_index(&self, collection_id: &str, spec: &IndexSpec) -> Result<()> {
        debug!(collection = collection_id, key = %spec.key, "creating index");
        let response = self
            .client
            .post(format!("{}/indexes", self.collection_url(collection_id)))
            .json(&json!({
                "key": spec.key,
                "type": spec.kind,
                "attributes": spec.fields,
            }))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn create_relationship(
        &self,
        collection_id: &str,
        spec: &RelationshipSpec,
    ) -> Result<()> {
        debug!(
            collection = collection_id,
            related = %spec.related_collection_id,
            field = %spec.field,
            "creating relationship"
        );
        let response = self
            .client
            .post(format!(
                "{}/attributes/relationship",
                self.collection_url(collection_id)
            ))
            .json(&json!({
                "relatedCollectionId": spec.related_collection_id,
                "type": "manyToOne",
                "twoWay": true,
                "key": spec.field,
                "twoWayKey": spec.inverse_field,
                "onDelete": spec.on_delete,
            }))
            .send()
            .await?;
        Self::expect_success(response).await
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        field: &str,
        value: &str,
        limit: u32,
    ) -> Result<Vec<Document>> {
        let response = self
            .client
            .get(format!("{}/documents", self.collection_url(collection_id)))
            .query(&[
                ("queries[]", format!("equal(\"{field}\", \"{value}\")")),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;
        let list: DocumentList = Self::decode(response).await?;
        Ok(list.documents)
    }

    async fn create_document(
        &self,
        collection_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document> {
        let response = self
            .client
            .post(format!("{}/documents", self.collection_url(collection_id)))
            .json(&json!({
                "documentId": Uuid::new_v4().to_string(),
                "data": data,
            }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn list_accounts(&self, offset: u64, limit: u64) -> Result<AccountPage> {
        let response = self
            .client
            .get(self.accounts_url())
            .query(&[("offset", offset.to_string()), ("limit", limit.to_string())])
            .send()
            .await?;
        Self::decode(response).await
    }
}
