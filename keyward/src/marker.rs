//! Transaction success markers.
//!
//! Work deferred from inside a transaction (queued tasks and the like) needs
//! proof that the transaction actually committed. The marker is a sentinel
//! entity written inside the transaction; it exists afterwards exactly when
//! the transaction committed.

use crate::error::{HelperError, HelperResult};
use crate::resolver::KeyResolver;
use chrono::Utc;
use keyward_model::Entity;
use keyward_storage::{DatastoreClient, RequestContext};
use keyward_types::Key;
use tracing::debug;

/// Kind of the sentinel entities.
pub const MARKER_KIND: &str = "transaction-marker";

/// Property holding the marker's creation time.
pub const MARKER_CREATED: &str = "creationdate";

fn marker_key(resolver: &KeyResolver, marker: &str) -> Key {
    resolver.normalize_key(&Key::new(MARKER_KIND, marker))
}

/// Returns the success marker of the active transaction, writing its sentinel
/// on the first call within that transaction.
///
/// # Errors
///
/// [`HelperError::NotInTransaction`] outside a transaction.
pub fn acquire_success_marker(
    client: &DatastoreClient,
    ctx: &mut RequestContext,
    resolver: &KeyResolver,
) -> HelperResult<String> {
    let (marker, written) = {
        let txn = ctx.transaction().ok_or(HelperError::NotInTransaction)?;
        (txn.id().to_hex(), txn.marker_written())
    };
    if written {
        return Ok(marker);
    }

    let sentinel = Entity::new(marker_key(resolver, &marker)).with(MARKER_CREATED, Utc::now());
    client.put(ctx, &sentinel)?;
    if let Some(txn) = ctx.transaction_mut() {
        txn.set_marker_written();
    }
    debug!(marker = %marker, "Wrote transaction success marker");
    Ok(marker)
}

/// Returns true if the transaction that acquired `marker` committed.
pub fn marker_committed(
    client: &DatastoreClient,
    ctx: &mut RequestContext,
    resolver: &KeyResolver,
    marker: &str,
) -> HelperResult<bool> {
    Ok(client.get(ctx, &marker_key(resolver, marker))?.is_some())
}
