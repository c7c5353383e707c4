//! Transaction gating and idempotent creation.

use crate::error::HelperResult;
use crate::sanitize::sanitize;
use keyward_model::{Entity, Value};
use keyward_storage::{DatastoreClient, RequestContext};
use keyward_types::Key;
use tracing::debug;

/// Returns true while `ctx` has an active transaction.
pub fn in_transaction(ctx: &RequestContext) -> bool {
    ctx.in_transaction()
}

/// Returns the entity at `key`, creating it from `fields` if it is absent.
///
/// Runs in the caller's transaction when there is one, otherwise in a new
/// transaction. An existing entity is never overwritten and `fields` are then
/// ignored. Concurrent callers racing on the same key create it exactly once;
/// the losers' commits conflict, retry, and observe the winner's entity.
///
/// # Errors
///
/// [`HelperError::TransactionAborted`](crate::HelperError::TransactionAborted)
/// if conflicts outlast the client's retry budget.
pub fn get_or_insert<I, K, V>(
    client: &DatastoreClient,
    ctx: &mut RequestContext,
    key: &Key,
    fields: I,
) -> HelperResult<Entity>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let fields: Vec<(String, Value)> = fields
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect();

    if in_transaction(ctx) {
        return fetch_or_create(client, ctx, key, &fields);
    }
    client.run_in_transaction(ctx, |ctx| fetch_or_create(client, ctx, key, &fields))
}

fn fetch_or_create(
    client: &DatastoreClient,
    ctx: &mut RequestContext,
    key: &Key,
    fields: &[(String, Value)],
) -> HelperResult<Entity> {
    if let Some(existing) = client.get(ctx, key)? {
        debug!(key = %key, "Entity already exists");
        return Ok(existing);
    }

    let mut entity = Entity::new(key.clone());
    for (name, value) in fields {
        entity.set(name.clone(), value.clone());
    }
    sanitize(&mut entity);
    client.put(ctx, &entity)?;
    debug!(key = %key, fields = fields.len(), "Created entity");
    Ok(entity)
}
