//! Request-scoped context values.
//!
//! An adapter attaches a value to a request with [`set`]; anything further
//! down the chain reads it back with [`get`]. The value lives in a shared
//! slot keyed by its type, so it is only reachable through this module's
//! typed accessors.
//!
//! ```text
//! adapter:  let scope = context::set(request.extensions_mut(), value);
//!           next.run(request).await;
//!           drop(scope);                      // slot cleared here
//!
//! handler:  let slot = context::get::<T>(request.extensions())?;
//!           let mut value = slot.lease().await?;
//! ```
//!
//! Clearing happens when the [`ScopeGuard`] is dropped, which also covers
//! panics and cancelled futures. A handle that outlives the request sees
//! [`ContextError::Expired`] instead of a stale value.

use std::any::type_name;
use std::sync::Arc;

use axum::http::Extensions;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMappedMutexGuard, OwnedMutexGuard};

/// Exclusive access to a context value for as long as it is held.
pub type Lease<T> = OwnedMappedMutexGuard<Option<T>, T>;

/// Errors from reading the request context.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("no {0} in request context")]
    Missing(&'static str),

    #[error("{0} used after its request scope ended")]
    Expired(&'static str),
}

/// Handle to one typed slot in a request's context.
pub struct Scoped<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Scoped<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: Send + 'static> Scoped<T> {
    /// Waits for exclusive access to the value.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Expired`] once the owning scope has ended.
    pub async fn lease(&self) -> Result<Lease<T>, ContextError> {
        let guard = Arc::clone(&self.slot).lock_owned().await;
        OwnedMutexGuard::try_map(guard, Option::as_mut)
            .map_err(|_| ContextError::Expired(type_name::<T>()))
    }

    /// True while the owning scope is still open.
    pub fn is_live(&self) -> bool {
        match self.slot.try_lock() {
            Ok(value) => value.is_some(),
            // Someone holds a lease, so the value is still there.
            Err(_) => true,
        }
    }
}

/// Clears its slot when dropped.
#[must_use = "the value is removed from the context as soon as the guard is dropped"]
pub struct ScopeGuard<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Drop for ScopeGuard<T> {
    fn drop(&mut self) {
        match self.slot.try_lock() {
            Ok(mut value) => {
                drop(value.take());
            }
            Err(_) => {
                // Only reachable if a lease escaped the request, e.g. into a
                // detached task. The value goes when that lease is released
                // and the last handle is dropped.
                tracing::warn!(
                    value = type_name::<T>(),
                    "request context still leased at end of scope"
                );
            }
        }
    }
}

/// Attaches `value` to the request until the returned guard is dropped.
///
/// Setting the same type twice replaces the earlier slot for readers that
/// look it up afterwards.
pub fn set<T: Send + 'static>(extensions: &mut Extensions, value: T) -> ScopeGuard<T> {
    let slot = Arc::new(Mutex::new(Some(value)));
    extensions.insert(Scoped {
        slot: Arc::clone(&slot),
    });
    ScopeGuard { slot }
}

/// Looks up the value of type `T` attached to the request.
///
/// # Errors
///
/// Returns [`ContextError::Missing`] if nothing of that type was attached.
pub fn get<T: Send + 'static>(extensions: &Extensions) -> Result<Scoped<T>, ContextError> {
    extensions
        .get::<Scoped<T>>()
        .cloned()
        .ok_or(ContextError::Missing(type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn set_then_get_returns_the_value() {
        let mut extensions = Extensions::new();
        let _scope = set(&mut extensions, String::from("hello"));

        let slot = get::<String>(&extensions).unwrap();
        let value = slot.lease().await.unwrap();
        assert_eq!(&*value, "hello");
    }

    #[tokio::test]
    async fn lease_allows_mutation() {
        let mut extensions = Extensions::new();
        let _scope = set(&mut extensions, vec![1u32]);

        let slot = get::<Vec<u32>>(&extensions).unwrap();
        slot.lease().await.unwrap().push(2);

        assert_eq!(*slot.lease().await.unwrap(), vec![1, 2]);
    }

    #[test]
    fn get_without_set_is_missing() {
        let extensions = Extensions::new();
        let result = get::<String>(&extensions);
        assert!(matches!(result, Err(ContextError::Missing(_))));
    }

    #[test]
    fn keys_are_per_type() {
        let mut extensions = Extensions::new();
        let _scope = set(&mut extensions, 7u64);

        assert!(get::<u64>(&extensions).is_ok());
        assert!(matches!(
            get::<u32>(&extensions),
            Err(ContextError::Missing(_))
        ));
    }

    #[tokio::test]
    async fn dropping_the_guard_clears_the_value() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut extensions = Extensions::new();
        let scope = set(&mut extensions, Tracked(Arc::clone(&drops)));
        let slot = get::<Tracked>(&extensions).unwrap();
        assert!(slot.is_live());

        drop(scope);

        assert_eq!(drops.load(Ordering::SeqCst), 1);
        assert!(!slot.is_live());
        assert!(matches!(slot.lease().await, Err(ContextError::Expired(_))));
    }

    #[tokio::test]
    async fn value_outlives_guard_while_leased() {
        let drops = Arc::new(AtomicUsize::new(0));
        let mut extensions = Extensions::new();
        let scope = set(&mut extensions, Tracked(Arc::clone(&drops)));
        let slot = get::<Tracked>(&extensions).unwrap();

        let lease = slot.lease().await.unwrap();
        drop(scope);
        assert_eq!(drops.load(Ordering::SeqCst), 0);

        drop(lease);
        drop(slot);
        drop(extensions);
        assert_eq!(drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_messages_name_the_type() {
        let err = ContextError::Missing(type_name::<String>());
        assert!(err.to_string().contains("String"));
    }
}
