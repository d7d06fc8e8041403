//! Account-to-profile reconciliation.
//!
//! The platform's account records are the source of truth; the "users"
//! collection carries one profile document per account. Sync is
//! create-once: an existing profile is left untouched even if the source
//! account changed since it was created.

use tracing::{info, warn};

use sociogram_remote::{Account, RemoteApi};

use crate::error::{AccountError, SyncError};
use crate::profile::Profile;
use crate::schema;

/// Accounts fetched per page; the loop stops at the first short page.
pub const PAGE_SIZE: u64 = 100;

/// Reconcile every platform account against the users collection and
/// return the profiles now on record for the batch.
///
/// Per-account failures are logged and skipped, so the result can hold
/// fewer profiles than there are accounts; callers who need to detect
/// partial success compare the counts.
pub async fn sync_accounts(api: &impl RemoteApi) -> Result<Vec<Profile>, SyncError> {
    let users = api
        .list_collections()
        .await?
        .into_iter()
        .find(|collection| collection.name == schema::USERS)
        .ok_or(SyncError::SchemaNotReady)?;

    let accounts = fetch_all_accounts(api).await?;
    info!(count = accounts.len(), "fetched platform accounts");

    let mut profiles = Vec::with_capacity(accounts.len());
    for account in &accounts {
        match reconcile(api, &users.id, account).await {
            Ok(profile) => profiles.push(profile),
            Err(e) => warn!(account = %account.id, error = %e, "skipping account"),
        }
    }

    info!(
        synced = profiles.len(),
        skipped = accounts.len() - profiles.len(),
        "account sync finished"
    );
    Ok(profiles)
}

/// Page through the account listing until a short (or empty) page.
///
/// The platform guarantees a stable total order for this listing, so no
/// cross-page deduplication is needed.
async fn fetch_all_accounts(api: &impl RemoteApi) -> Result<Vec<Account>, SyncError> {
    let mut accounts: Vec<Account> = Vec::new();
    loop {
        let page = api.list_accounts(accounts.len() as u64, PAGE_SIZE).await?;
        let fetched = page.accounts.len() as u64;
        accounts.extend(page.accounts);
        if fetched < PAGE_SIZE {
            break;
        }
    }
    Ok(accounts)
}

/// Return the existing profile for one account, creating it when absent.
async fn reconcile(
    api: &impl RemoteApi,
    users_id: &str,
    account: &Account,
) -> Result<Profile, AccountError> {
    let existing = api
        .list_documents(users_id, "accountId", &account.id, 1)
        .await?;
    if let Some(document) = existing.first() {
        return Ok(Profile::from_document(document)?);
    }

    let profile = Profile::from_account(account);
    api.create_document(users_id, profile.to_document_data())
        .await?;
    info!(account = %account.id, username = %profile.username, "profile created");
    Ok(profile)
}
