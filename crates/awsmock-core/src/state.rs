//! Per-account, per-region state scoping.
//!
//! Provides [`AccountRegionStore`], a thread-safe store that hands out one
//! isolated state instance per (account, region) pair. Resetting a single
//! scope drops only that client's data; resetting the store drops all of it.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::types::{AccountId, AwsRegion};

type Factory<T> = Box<dyn Fn(&AccountId, &AwsRegion) -> T + Send + Sync>;

/// Thread-safe, multi-account, multi-region state store.
///
/// Each (account, region) pair gets its own isolated state instance of type
/// `T`, built lazily by the store's factory on first access.
///
/// # Examples
///
/// ```
/// use awsmock_core::{AccountRegionStore, AccountId, AwsRegion};
///
/// #[derive(Debug, Default)]
/// struct MyServiceState {
///     counter: std::sync::atomic::AtomicU64,
/// }
///
/// let store = AccountRegionStore::<MyServiceState>::new();
/// let state = store.get_or_create(&AccountId::default(), &AwsRegion::default());
/// state.counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
/// ```
pub struct AccountRegionStore<T: Send + Sync> {
    inner: DashMap<(AccountId, AwsRegion), Arc<T>>,
    factory: Factory<T>,
}

impl<T: Send + Sync> fmt::Debug for AccountRegionStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRegionStore")
            .field("scopes", &self.inner.len())
            .finish_non_exhaustive()
    }
}

impl<T: Default + Send + Sync> AccountRegionStore<T> {
    /// Create a new empty store whose scopes start from `T::default()`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(|_, _| T::default())
    }
}

impl<T: Send + Sync> AccountRegionStore<T> {
    /// Create a new empty store that builds each scope with `factory`.
    #[must_use]
    pub fn with_factory(
        factory: impl Fn(&AccountId, &AwsRegion) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: DashMap::new(),
            factory: Box::new(factory),
        }
    }

    /// Get or create the state for the given account and region.
    #[must_use]
    pub fn get_or_create(&self, account: &AccountId, region: &AwsRegion) -> Arc<T> {
        self.inner
            .entry((account.clone(), region.clone()))
            .or_insert_with(|| {
                debug!(account = %account, region = %region, "creating scoped state");
                Arc::new((self.factory)(account, region))
            })
            .clone()
    }

    /// Get the state for the given account and region, if it exists.
    #[must_use]
    pub fn get(&self, account: &AccountId, region: &AwsRegion) -> Option<Arc<T>> {
        self.inner
            .get(&(account.clone(), region.clone()))
            .map(|v| v.clone())
    }

    /// Remove the state for the given account and region.
    pub fn remove(&self, account: &AccountId, region: &AwsRegion) -> Option<Arc<T>> {
        self.inner
            .remove(&(account.clone(), region.clone()))
            .map(|(_, v)| v)
    }

    /// All (account, region) scopes that currently hold state.
    #[must_use]
    pub fn scopes(&self) -> Vec<(AccountId, AwsRegion)> {
        let mut scopes: Vec<_> = self.inner.iter().map(|e| e.key().clone()).collect();
        scopes.sort_by(|a, b| (a.0.as_str(), a.1.as_str()).cmp(&(b.0.as_str(), b.1.as_str())));
        scopes
    }

    /// Reset all state in the store.
    pub fn reset(&self) {
        self.inner.clear();
    }

    /// Number of (account, region) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<T: Default + Send + Sync> Default for AccountRegionStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct TestState {
        value: AtomicU64,
    }

    #[test]
    fn test_should_create_state_on_first_access() {
        let store = AccountRegionStore::<TestState>::new();
        assert!(store.is_empty());
        let state = store.get_or_create(&AccountId::default(), &AwsRegion::default());
        assert_eq!(store.len(), 1);
        assert_eq!(state.value.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_should_return_same_state_on_subsequent_access() {
        let store = AccountRegionStore::<TestState>::new();
        let account = AccountId::default();
        let region = AwsRegion::default();

        store
            .get_or_create(&account, &region)
            .value
            .store(42, Ordering::Relaxed);
        let again = store.get_or_create(&account, &region);
        assert_eq!(again.value.load(Ordering::Relaxed), 42);
    }

    #[test]
    fn test_should_isolate_accounts_and_regions() {
        let store = AccountRegionStore::<TestState>::new();
        let other = AccountId::new("123456789012").unwrap_or_else(|e| panic!("{e}"));

        store
            .get_or_create(&AccountId::default(), &AwsRegion::default())
            .value
            .store(1, Ordering::Relaxed);

        let eu = store.get_or_create(&AccountId::default(), &AwsRegion::new("eu-west-1"));
        let other_account = store.get_or_create(&other, &AwsRegion::default());
        assert_eq!(eu.value.load(Ordering::Relaxed), 0);
        assert_eq!(other_account.value.load(Ordering::Relaxed), 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_should_build_scopes_with_factory() {
        let store = AccountRegionStore::with_factory(|account: &AccountId, region: &AwsRegion| {
            format!("{account}/{region}")
        });
        let state = store.get_or_create(&AccountId::default(), &AwsRegion::global());
        assert_eq!(state.as_str(), "000000000000/aws-global");
    }

    #[test]
    fn test_should_remove_single_scope() {
        let store = AccountRegionStore::<TestState>::new();
        let _ = store.get_or_create(&AccountId::default(), &AwsRegion::default());
        let _ = store.get_or_create(&AccountId::default(), &AwsRegion::new("eu-west-1"));

        assert!(
            store
                .remove(&AccountId::default(), &AwsRegion::default())
                .is_some()
        );
        assert!(store.get(&AccountId::default(), &AwsRegion::default()).is_none());
        assert_eq!(store.scopes().len(), 1);
    }

    #[test]
    fn test_should_reset_all_state() {
        let store = AccountRegionStore::<TestState>::new();
        let _ = store.get_or_create(&AccountId::default(), &AwsRegion::default());
        let _ = store.get_or_create(&AccountId::default(), &AwsRegion::new("eu-west-1"));

        assert_eq!(store.len(), 2);
        store.reset();
        assert!(store.is_empty());
    }
}
