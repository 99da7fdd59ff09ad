//! Optimistic local updates

use crate::error::Result;

/// Apply `update` to `value` right away, then `commit` it.
///
/// If the commit fails, `value` goes back to what it was and the error is
/// returned.
pub fn apply_with_rollback<T, R>(
    value: &mut T,
    update: impl FnOnce(&mut T),
    commit: impl FnOnce(&T) -> Result<R>,
) -> Result<R>
where
    T: Clone,
{
    let previous = value.clone();
    update(value);
    match commit(value) {
        Ok(committed) => Ok(committed),
        Err(e) => {
            tracing::warn!(error = %e, "rolling back local update");
            *value = previous;
            Err(e)
        }
    }
}
