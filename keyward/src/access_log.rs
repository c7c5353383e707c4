//! Scoping of the request's read access log.
//!
//! A cache layer wraps a unit of work in [`start_log`]/[`end_log`] to learn
//! which keys it read. Scopes nest: `start_log` hands back the outer scope's
//! entries and `end_log(ctx, Some(outer))` resumes the outer scope with the
//! inner reads merged in. Every `start_log` must be paired with exactly one
//! `end_log`; [`with_access_log`] does the pairing for a closure.

use keyward_storage::{AccessLog, RequestContext};

/// Installs a fresh, empty access log and returns the entries collected so
/// far (empty if logging was disabled).
pub fn start_log(ctx: &mut RequestContext) -> AccessLog {
    ctx.replace_access_log(Some(AccessLog::new()))
        .unwrap_or_default()
}

/// Returns the entries collected since the matching [`start_log`].
///
/// With `Some(outer)`, `outer` plus those entries becomes the current log.
/// With `None`, logging is disabled.
pub fn end_log(ctx: &mut RequestContext, outer: Option<AccessLog>) -> AccessLog {
    let current = ctx.replace_access_log(None).unwrap_or_default();
    if let Some(mut outer) = outer {
        outer.extend(current.iter().cloned());
        ctx.replace_access_log(Some(outer));
    }
    current
}

/// Runs `f` in its own access-log scope, returning its result and the keys it
/// read. The surrounding scope is restored afterwards, including a disabled
/// one.
pub fn with_access_log<T>(
    ctx: &mut RequestContext,
    f: impl FnOnce(&mut RequestContext) -> T,
) -> (T, AccessLog) {
    let was_logging = ctx.is_logging();
    let outer = start_log(ctx);
    let value = f(ctx);
    let accessed = end_log(ctx, was_logging.then_some(outer));
    (value, accessed)
}
