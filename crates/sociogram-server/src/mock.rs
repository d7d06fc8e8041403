//! In-memory [`RemoteApi`] implementation backing the schema and sync
//! tests. Tracks call counts so tests can assert idempotence and
//! pagination behavior.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::{Map, Value};

use sociogram_remote::{
    Account, AccountPage, AccountPrefs, Attribute, AttributeKind, AttributeSpec, AttributeStatus,
    Collection, Document, IndexSpec, RelationshipSpec, RemoteApi, RemoteError, Result,
};

#[derive(Default)]
pub struct MockRemote {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    collections: Vec<Collection>,
    attributes: HashMap<String, Vec<MockAttribute>>,
    indexes: HashMap<String, Vec<String>>,
    documents: HashMap<String, Vec<Document>>,
    accounts: Vec<Account>,

    /// Account ids whose document creation fails.
    failing_accounts: Vec<String>,
    /// (owner, field) pairs whose relationship creation fails.
    failing_relationships: Vec<(String, String)>,
    /// list_attributes calls before a freshly-created attribute reports
    /// Available.
    polls_until_available: u32,
    /// When set, every created attribute reports Failed.
    fail_attributes: bool,

    created_collections: u32,
    created_relationships: u32,
    account_pages_served: u32,
    next_document_id: u32,
}

struct MockAttribute {
    key: String,
    required: bool,
    array: bool,
    polls_left: u32,
    failed: bool,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock pre-loaded with `count` accounts named `Account {i}` with
    /// ids `acct-{i}`, starting at 1.
    pub fn with_accounts(count: usize) -> Self {
        let mock = Self::new();
        {
            let mut state = mock.state.lock().unwrap();
            for i in 1..=count {
                state.accounts.push(Account {
                    id: format!("acct-{i}"),
                    name: Some(format!("Account {i}")),
                    email: format!("acct{i}@example.com"),
                    prefs: AccountPrefs::default(),
                });
            }
        }
        mock
    }

    pub fn add_account(&self, id: &str, name: Option<&str>, email: &str) {
        self.state.lock().unwrap().accounts.push(Account {
            id: id.to_string(),
            name: name.map(str::to_string),
            email: email.to_string(),
            prefs: AccountPrefs::default(),
        });
    }

    /// Pre-create a collection, as if an earlier provisioning run made it.
    pub fn seed_collection(&self, name: &str) {
        self.state.lock().unwrap().collections.push(Collection {
            id: name.to_string(),
            name: name.to_string(),
        });
    }

    /// Pre-create an attribute that is immediately Available.
    pub fn seed_attribute(&self, collection: &str, key: &str) {
        self.state
            .lock()
            .unwrap()
            .attributes
            .entry(collection.to_string())
            .or_default()
            .push(MockAttribute {
                key: key.to_string(),
                required: false,
                array: false,
                polls_left: 0,
                failed: false,
            });
    }

    /// Pre-create a document from a JSON object.
    pub fn seed_document(&self, collection: &str, data: Value) {
        let Value::Object(data) = data else {
            panic!("seed_document expects a JSON object");
        };
        let mut state = self.state.lock().unwrap();
        state.next_document_id += 1;
        let id = format!("doc-{}", state.next_document_id);
        state
            .documents
            .entry(collection.to_string())
            .or_default()
            .push(Document { id, data });
    }

    pub fn fail_document_for(&self, account_id: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_accounts
            .push(account_id.to_string());
    }

    pub fn fail_relationship(&self, owner: &str, field: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_relationships
            .push((owner.to_string(), field.to_string()));
    }

    pub fn set_polls_until_available(&self, polls: u32) {
        self.state.lock().unwrap().polls_until_available = polls;
    }

    pub fn set_fail_attributes(&self) {
        self.state.lock().unwrap().fail_attributes = true;
    }

    pub fn created_collections(&self) -> u32 {
        self.state.lock().unwrap().created_collections
    }

    pub fn created_relationships(&self) -> u32 {
        self.state.lock().unwrap().created_relationships
    }

    pub fn account_pages_served(&self) -> u32 {
        self.state.lock().unwrap().account_pages_served
    }

    pub fn documents_in(&self, collection: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .documents
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn api_error(status: u16, message: &str) -> RemoteError {
    RemoteError::Api {
        status,
        message: message.to_string(),
    }
}

impl RemoteApi for MockRemote {
    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.state.lock().unwrap().collections.clone())
    }

    async fn create_collection(&self, id: &str, name: &str) -> Result<Collection> {
        let mut state = self.state.lock().unwrap();
        if state.collections.iter().any(|c| c.name == name) {
            return Err(api_error(409, "collection already exists"));
        }
        let collection = Collection {
            id: id.to_string(),
            name: name.to_string(),
        };
        state.collections.push(collection.clone());
        state.created_collections += 1;
        Ok(collection)
    }

    async fn create_attribute(&self, collection_id: &str, spec: &AttributeSpec) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let polls_left = state.polls_until_available;
        let failed = state.fail_attributes;
        state
            .attributes
            .entry(collection_id.to_string())
            .or_default()
            .push(MockAttribute {
                key: spec.key.clone(),
                required: spec.required,
                array: matches!(spec.kind, AttributeKind::TextArray { .. }),
                polls_left,
                failed,
            });
        Ok(())
    }

    async fn list_attributes(&self, collection_id: &str) -> Result<Vec<Attribute>> {
        let mut state = self.state.lock().unwrap();
        let attributes = state
            .attributes
            .entry(collection_id.to_string())
            .or_default();

        let mut out = Vec::with_capacity(attributes.len());
        for attribute in attributes.iter_mut() {
            if attribute.polls_left > 0 {
                attribute.polls_left -= 1;
            }
            let status = if attribute.failed {
                AttributeStatus::Failed
            } else if attribute.polls_left == 0 {
                AttributeStatus::Available
            } else {
                AttributeStatus::Processing
            };
            out.push(Attribute {
                key: attribute.key.clone(),
                status,
                required: attribute.required,
                array: attribute.array,
            });
        }
        Ok(out)
    }

    async fn create_index(&self, collection_id: &str, spec: &IndexSpec) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .indexes
            .entry(collection_id.to_string())
            .or_default()
            .push(spec.key.clone());
        Ok(())
    }

    async fn create_relationship(
        &self,
        collection_id: &str,
        spec: &RelationshipSpec,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();

        let failing = state
            .failing_relationships
            .iter()
            .any(|(owner, field)| owner == collection_id && *field == spec.field);
        if failing {
            return Err(api_error(500, "relationship creation failed"));
        }

        let owner_attributes = state
            .attributes
            .entry(collection_id.to_string())
            .or_default();
        if owner_attributes.iter().any(|a| a.key == spec.field) {
            return Err(api_error(409, "attribute already exists"));
        }
        owner_attributes.push(MockAttribute {
            key: spec.field.clone(),
            required: false,
            array: true,
            polls_left: 0,
            failed: false,
        });

        state
            .attributes
            .entry(spec.related_collection_id.clone())
            .or_default()
            .push(MockAttribute {
                key: spec.inverse_field.clone(),
                required: false,
                array: false,
                polls_left: 0,
                failed: false,
            });

        state.created_relationships += 1;
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_id: &str,
        field: &str,
        value: &str,
        limit: u32,
    ) -> Result<Vec<Document>> {
        let state = self.state.lock().unwrap();
        let documents = state
            .documents
            .get(collection_id)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        doc.data.get(field).and_then(Value::as_str) == Some(value)
                    })
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn create_document(
        &self,
        collection_id: &str,
        data: Map<String, Value>,
    ) -> Result<Document> {
        let mut state = self.state.lock().unwrap();

        let account_id = data.get("accountId").and_then(Value::as_str);
        if let Some(account_id) = account_id {
            if state.failing_accounts.iter().any(|id| id == account_id) {
                return Err(api_error(500, "document creation failed"));
            }
        }

        state.next_document_id += 1;
        let document = Document {
            id: format!("doc-{}", state.next_document_id),
            data,
        };
        state
            .documents
            .entry(collection_id.to_string())
            .or_default()
            .push(document.clone());
        Ok(document)
    }

    async fn list_accounts(&self, offset: u64, limit: u64) -> Result<AccountPage> {
        let mut state = self.state.lock().unwrap();
        state.account_pages_served += 1;

        let start = (offset as usize).min(state.accounts.len());
        let end = (start + limit as usize).min(state.accounts.len());
        Ok(AccountPage {
            total: state.accounts.len() as u64,
            accounts: state.accounts[start..end].to_vec(),
        })
    }
}
