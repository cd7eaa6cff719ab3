//! Named user-level locks backing GET_LOCK() and friends
//!
//! Locks are owned by a connection id and are re-entrant: a session that
//! already holds a lock may acquire it again, and must release it as many
//! times before another session can take it.

use crate::common::error::{PrismDBError, PrismDBResult};
use crate::execution::context::ExecutionContext;
use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Longest lock name accepted, in characters
pub const MAX_LOCK_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone)]
struct LockEntry {
    owner: u32,
    count: usize,
}

/// Outcome of releasing a named lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The caller held the lock and one hold was released
    Released,
    /// The lock exists but another connection holds it
    NotOwned,
    /// No lock with that name exists
    NotFound,
}

/// Process-wide table of named locks
#[derive(Debug, Default)]
pub struct LockSubsystem {
    locks: Mutex<HashMap<String, LockEntry>>,
    released: Condvar,
    max_wait: Option<Duration>,
}

impl LockSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits that would otherwise be unbounded give up after `max_wait`
    pub fn with_max_wait(max_wait: Duration) -> Self {
        Self {
            max_wait: Some(max_wait),
            ..Self::default()
        }
    }

    fn normalize(name: &str) -> PrismDBResult<String> {
        if name.is_empty() {
            return Err(PrismDBError::Lock("lock name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_LOCK_NAME_LENGTH {
            return Err(PrismDBError::Lock(format!(
                "lock name '{}' is longer than {} characters",
                name, MAX_LOCK_NAME_LENGTH
            )));
        }
        Ok(name.to_lowercase())
    }

    /// Acquire `name` for the context's connection, waiting at most `timeout`.
    ///
    /// `None` waits forever, or up to the configured maximum wait. Returns
    /// `false` when the wait timed out.
    pub fn lock(
        &self,
        ctx: &ExecutionContext,
        name: &str,
        timeout: Option<Duration>,
    ) -> PrismDBResult<bool> {
        let key = Self::normalize(name)?;
        let owner = ctx.connection_id;
        let deadline = timeout.or(self.max_wait).map(|t| Instant::now() + t);

        let mut locks = self.locks.lock();
        loop {
            match locks.get_mut(&key) {
                None => {
                    locks.insert(key.clone(), LockEntry { owner, count: 1 });
                    debug!(lock = %key, owner, "acquired user lock");
                    return Ok(true);
                }
                Some(entry) if entry.owner == owner => {
                    entry.count += 1;
                    trace!(lock = %key, owner, count = entry.count, "re-entered user lock");
                    return Ok(true);
                }
                Some(entry) => {
                    trace!(lock = %key, owner, holder = entry.owner, "waiting for user lock");
                    match deadline {
                        Some(deadline) => {
                            if self.released.wait_until(&mut locks, deadline).timed_out()
                                && locks.get(&key).is_some_and(|e| e.owner != owner)
                            {
                                debug!(lock = %key, owner, "timed out waiting for user lock");
                                return Ok(false);
                            }
                        }
                        None => self.released.wait(&mut locks),
                    }
                }
            }
        }
    }

    /// Whether no connection holds `name`
    pub fn is_free(&self, name: &str) -> PrismDBResult<bool> {
        let key = Self::normalize(name)?;
        Ok(!self.locks.lock().contains_key(&key))
    }

    /// Connection id currently holding `name`, if any
    pub fn owner(&self, name: &str) -> PrismDBResult<Option<u32>> {
        let key = Self::normalize(name)?;
        Ok(self.locks.lock().get(&key).map(|entry| entry.owner))
    }

    /// Release one hold of `name` by the context's connection
    pub fn unlock(&self, ctx: &ExecutionContext, name: &str) -> PrismDBResult<ReleaseOutcome> {
        let key = Self::normalize(name)?;
        let mut locks = self.locks.lock();
        let outcome = match locks.get_mut(&key) {
            None => ReleaseOutcome::NotFound,
            Some(entry) if entry.owner != ctx.connection_id => ReleaseOutcome::NotOwned,
            Some(entry) => {
                entry.count -= 1;
                if entry.count == 0 {
                    locks.remove(&key);
                    self.released.notify_all();
                    debug!(lock = %key, owner = ctx.connection_id, "released user lock");
                }
                ReleaseOutcome::Released
            }
        };
        Ok(outcome)
    }

    /// Release every lock the context's connection holds; returns the number of holds dropped
    pub fn release_all(&self, ctx: &ExecutionContext) -> usize {
        let owner = ctx.connection_id;
        let mut locks = self.locks.lock();
        let mut released = 0;
        locks.retain(|_, entry| {
            if entry.owner == owner {
                released += entry.count;
                false
            } else {
                true
            }
        });
        if released > 0 {
            self.released.notify_all();
            debug!(owner, released, "released all user locks");
        }
        released
    }

    /// Number of distinct locks currently held
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_is_reentrant() -> PrismDBResult<()> {
        let locks = LockSubsystem::new();
        let ctx = ExecutionContext::new(1, "root");

        assert!(locks.lock(&ctx, "job", Some(Duration::ZERO))?);
        assert!(locks.lock(&ctx, "JOB", Some(Duration::ZERO))?);
        assert_eq!(locks.owner("job")?, Some(1));

        assert_eq!(locks.unlock(&ctx, "job")?, ReleaseOutcome::Released);
        assert!(!locks.is_free("job")?);
        assert_eq!(locks.unlock(&ctx, "job")?, ReleaseOutcome::Released);
        assert!(locks.is_free("job")?);
        assert_eq!(locks.unlock(&ctx, "job")?, ReleaseOutcome::NotFound);
        Ok(())
    }

    #[test]
    fn test_lock_times_out_for_other_connection() -> PrismDBResult<()> {
        let locks = LockSubsystem::new();
        let first = ExecutionContext::new(1, "a");
        let second = ExecutionContext::new(2, "b");

        assert!(locks.lock(&first, "job", None)?);
        assert!(!locks.lock(&second, "job", Some(Duration::from_millis(20)))?);
        assert_eq!(locks.unlock(&second, "job")?, ReleaseOutcome::NotOwned);
        Ok(())
    }

    #[test]
    fn test_waiter_acquires_after_release() -> PrismDBResult<()> {
        let locks = Arc::new(LockSubsystem::new());
        let first = ExecutionContext::new(1, "a");
        assert!(locks.lock(&first, "job", None)?);

        let waiter = {
            let locks = Arc::clone(&locks);
            thread::spawn(move || {
                let second = ExecutionContext::new(2, "b");
                locks.lock(&second, "job", Some(Duration::from_secs(5)))
            })
        };

        thread::sleep(Duration::from_millis(20));
        assert_eq!(locks.release_all(&first), 1);
        assert!(waiter.join().map_err(|_| PrismDBError::Lock("waiter panicked".into()))??);
        assert_eq!(locks.owner("job")?, Some(2));
        Ok(())
    }

    #[test]
    fn test_max_wait_bounds_unbounded_waits() -> PrismDBResult<()> {
        let locks = LockSubsystem::with_max_wait(Duration::from_millis(20));
        let first = ExecutionContext::new(1, "a");
        let second = ExecutionContext::new(2, "b");

        assert!(locks.lock(&first, "job", None)?);
        assert!(!locks.lock(&second, "job", None)?);
        Ok(())
    }

    #[test]
    fn test_invalid_lock_names() {
        let locks = LockSubsystem::new();
        assert!(locks.is_free("").is_err());
        assert!(locks.is_free(&"x".repeat(65)).is_err());
    }
}
