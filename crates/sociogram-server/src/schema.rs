//! The fixed collection schema and the idempotent provisioner.
//!
//! Provisioning runs in two passes. The first pass creates each missing
//! collection with its attributes and indexes, in fixed order. Attribute
//! creation is asynchronous on the platform side, so indexes (and later,
//! relationships) are only created after a bounded readiness poll sees
//! every attribute report `Available`. The second pass links the
//! collections; each link is checked against the owning collection's
//! current attribute set first, so an existing field is never recreated.
//!
//! Idempotence is by name: a collection that already exists is skipped
//! entirely, and partial progress from a failed run is retained.

use std::collections::HashSet;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{info, warn};

use sociogram_remote::{
    AttributeSpec, AttributeStatus, IndexKind, IndexSpec, OnDelete, RelationshipSpec, RemoteApi,
};

use crate::error::ProvisionError;

/// Collection names, in creation order.
pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const SAVES: &str = "saves";
pub const LIKES: &str = "likes";

const MAX_POLL_DELAY: Duration = Duration::from_secs(5);

/// Backoff settings for the attribute readiness poll.
#[derive(Debug, Clone)]
pub struct ReadinessPoll {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for ReadinessPoll {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl ReadinessPoll {
    /// Delay before the next attempt: exponential from `base_delay`,
    /// capped at [`MAX_POLL_DELAY`].
    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.min(6))
            .min(MAX_POLL_DELAY)
    }
}

struct CollectionPlan {
    name: &'static str,
    attributes: Vec<AttributeSpec>,
    indexes: Vec<IndexSpec>,
}

struct RelationshipPlan {
    owner: &'static str,
    spec: RelationshipSpec,
}

fn collections() -> Vec<CollectionPlan> {
    vec![
        CollectionPlan {
            name: USERS,
            attributes: vec![
                AttributeSpec::text("accountId", 255).required(),
                AttributeSpec::text("name", 255).with_default("User"),
                AttributeSpec::text("username", 255),
                AttributeSpec::email("email").required(),
                AttributeSpec::long_text("bio", 2048),
                AttributeSpec::text("imageId", 255),
                AttributeSpec::long_text("imageUrl", 2048).required(),
            ],
            indexes: vec![
                IndexSpec::new("accountId_idx", IndexKind::Key, &["accountId"]),
                IndexSpec::new("username_idx", IndexKind::Key, &["username"]),
            ],
        },
        CollectionPlan {
            name: POSTS,
            attributes: vec![
                AttributeSpec::long_text("caption", 2200),
                AttributeSpec::text_array("tags", 255),
                AttributeSpec::long_text("imageUrl", 2048).required(),
                AttributeSpec::text("imageId", 255).required(),
                AttributeSpec::text("location", 255),
            ],
            indexes: vec![IndexSpec::new(
                "caption_search",
                IndexKind::Fulltext,
                &["caption"],
            )],
        },
        // saves and likes carry only relationship fields.
        CollectionPlan {
            name: SAVES,
            attributes: vec![],
            indexes: vec![],
        },
        CollectionPlan {
            name: LIKES,
            attributes: vec![],
            indexes: vec![],
        },
    ]
}

fn relationships() -> Vec<RelationshipPlan> {
    fn link(
        owner: &'static str,
        related: &str,
        field: &str,
        inverse: &str,
        on_delete: OnDelete,
    ) -> RelationshipPlan {
        RelationshipPlan {
            owner,
            spec: RelationshipSpec {
                related_collection_id: related.to_string(),
                field: field.to_string(),
                inverse_field: inverse.to_string(),
                on_delete,
            },
        }
    }

    vec![
        link(USERS, POSTS, "posts", "creator", OnDelete::Cascade),
        link(USERS, SAVES, "saves", "user", OnDelete::Cascade),
        link(POSTS, SAVES, "saves", "post", OnDelete::Cascade),
        link(USERS, LIKES, "likes", "user", OnDelete::Cascade),
        // A like survives post deletion with a nulled reference.
        link(POSTS, LIKES, "likes", "post", OnDelete::SetNull),
    ]
}

/// Idempotently create the full schema. Already-created collections are
/// skipped and never rolled back; per-relationship failures are logged
/// and do not abort the remaining links.
pub async fn ensure_schema(
    api: &impl RemoteApi,
    poll: &ReadinessPoll,
) -> Result<(), ProvisionError> {
    let existing: HashSet<String> = api
        .list_collections()
        .await?
        .into_iter()
        .map(|collection| collection.name)
        .collect();

    for plan in collections() {
        if existing.contains(plan.name) {
            info!(collection = plan.name, "collection already exists, skipping");
            continue;
        }

        api.create_collection(plan.name, plan.name).await?;
        info!(collection = plan.name, "collection created");

        if plan.attributes.is_empty() {
            continue;
        }

        // Attribute creations within one collection are independent:
        // issue them together, then await the lot.
        try_join_all(
            plan.attributes
                .iter()
                .map(|spec| api.create_attribute(plan.name, spec)),
        )
        .await?;

        let keys: Vec<&str> = plan.attributes.iter().map(|a| a.key.as_str()).collect();
        wait_for_attributes(api, plan.name, &keys, poll).await?;

        for index in &plan.indexes {
            api.create_index(plan.name, index).await?;
        }
    }

    link_relationships(api).await
}

/// Poll until every listed attribute reports `Available`, with
/// exponential backoff between attempts.
async fn wait_for_attributes(
    api: &impl RemoteApi,
    collection: &str,
    keys: &[&str],
    poll: &ReadinessPoll,
) -> Result<(), ProvisionError> {
    for attempt in 1..=poll.max_attempts {
        let attributes = api.list_attributes(collection).await?;

        if let Some(failed) = attributes
            .iter()
            .find(|a| a.status == AttributeStatus::Failed)
        {
            return Err(ProvisionError::AttributeFailed {
                collection: collection.to_string(),
                key: failed.key.clone(),
            });
        }

        let ready = keys.iter().all(|key| {
            attributes
                .iter()
                .any(|a| a.key == *key && a.status == AttributeStatus::Available)
        });
        if ready {
            return Ok(());
        }

        if attempt < poll.max_attempts {
            tokio::time::sleep(poll.delay(attempt - 1)).await;
        }
    }

    Err(ProvisionError::AttributesNotReady {
        collection: collection.to_string(),
        attempts: poll.max_attempts,
    })
}

/// Second pass: create the relationship links between collections.
///
/// A link whose owning-side field already exists is skipped. A failure
/// on one link is logged and does not abort the others; a missing
/// prerequisite collection skips that pair.
async fn link_relationships(api: &impl RemoteApi) -> Result<(), ProvisionError> {
    let present: HashSet<String> = api
        .list_collections()
        .await?
        .into_iter()
        .map(|collection| collection.name)
        .collect();

    for link in relationships() {
        let related = link.spec.related_collection_id.as_str();
        if !present.contains(link.owner) || !present.contains(related) {
            warn!(
                owner = link.owner,
                related,
                "prerequisite collection missing, skipping relationship"
            );
            continue;
        }

        let attributes = match api.list_attributes(link.owner).await {
            Ok(attributes) => attributes,
            Err(e) => {
                warn!(
                    owner = link.owner,
                    error = %e,
                    "could not inspect attributes, skipping relationship"
                );
                continue;
            }
        };

        if attributes.iter().any(|a| a.key == link.spec.field) {
            info!(
                owner = link.owner,
                field = %link.spec.field,
                "relationship field already exists, skipping"
            );
            continue;
        }

        match api.create_relationship(link.owner, &link.spec).await {
            Ok(()) => info!(
                owner = link.owner,
                field = %link.spec.field,
                "relationship created"
            ),
            Err(e) => warn!(
                owner = link.owner,
                field = %link.spec.field,
                error = %e,
                "relationship creation failed"
            ),
        }
    }

    Ok(())
}
