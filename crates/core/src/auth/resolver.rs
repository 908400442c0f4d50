//! Role resolution with caching, coalescing and retry
//!
//! `RoleResolver` answers "what may this user do" from an in-memory cache,
//! only reaching the remote profile store on a cold or expired entry.
//! Concurrent lookups for the same identifier share a single in-flight
//! operation, and transient store failures are retried with a linearly
//! increasing delay before the resolver degrades to "role unknown".

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use paydesk_common::cache::{CacheStats, TtlCache};
use paydesk_common::resilience::policies::AlwaysRetry;
use paydesk_common::resilience::{
    BackoffStrategy, Clock, RetryConfig, RetryError, RetryExecutor, SystemClock,
};
use paydesk_domain::constants::{
    ROLE_CACHE_TTL, ROLE_LOOKUP_MAX_ATTEMPTS, ROLE_LOOKUP_RETRY_BASE,
};
use paydesk_domain::{PaydeskError, UserRole};
use tracing::{debug, instrument, warn};

use super::ports::ProfileStore;

/// Outcome of a role resolution
///
/// `Unknown` means the store answered and has no role for the user;
/// `Failed` means the lookup itself failed after the retry budget. The two
/// collapse to the same `None` under [`RoleLookup::role`], which is the
/// fail-closed posture the UI relies on, but callers that need to tell the
/// cases apart can match on the variant.
#[derive(Debug, Clone)]
pub enum RoleLookup {
    Resolved(UserRole),
    Unknown,
    Failed(PaydeskError),
}

impl RoleLookup {
    /// Collapse to an optional role, treating a failed lookup as no role
    pub fn role(&self) -> Option<UserRole> {
        match self {
            Self::Resolved(role) => Some(*role),
            Self::Unknown | Self::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    fn from_cached(cached: Option<UserRole>) -> Self {
        cached.map_or(Self::Unknown, Self::Resolved)
    }
}

type SharedLookup = Shared<BoxFuture<'static, RoleLookup>>;

/// Cached, coalescing role resolver
///
/// One instance is constructed at application start with the store
/// implementation injected, and shared by reference; there is no global
/// singleton. The clock parameter exists so TTL behavior can be driven by
/// a mock clock in tests.
pub struct RoleResolver<C = SystemClock>
where
    C: Clock + Clone,
{
    store: Arc<dyn ProfileStore>,
    cache: TtlCache<String, Option<UserRole>, C>,
    pending: Arc<DashMap<String, SharedLookup>>,
    retry: RetryConfig,
}

impl RoleResolver<SystemClock> {
    /// Create a resolver with the production TTL and retry budget
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C> RoleResolver<C>
where
    C: Clock + Clone,
{
    /// Create a resolver with a custom clock (useful for testing)
    pub fn with_clock(store: Arc<dyn ProfileStore>, clock: C) -> Self {
        Self {
            store,
            cache: TtlCache::with_clock(ROLE_CACHE_TTL, clock),
            pending: Arc::new(DashMap::new()),
            retry: RetryConfig {
                max_attempts: ROLE_LOOKUP_MAX_ATTEMPTS,
                backoff: BackoffStrategy::Linear {
                    initial_delay: ROLE_LOOKUP_RETRY_BASE,
                    increment: ROLE_LOOKUP_RETRY_BASE,
                },
            },
        }
    }

    /// Override the retry budget (tests use millisecond backoffs)
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve the role attached to a user identifier
    ///
    /// Served from cache within the TTL window; otherwise joins the
    /// in-flight lookup for the same identifier or starts one. Successful
    /// answers (including "no role") are cached; failures are not, so a
    /// recovered store is retried on the next call.
    #[instrument(skip(self))]
    pub async fn resolve(&self, user_id: &str) -> RoleLookup {
        if user_id.is_empty() {
            debug!("empty user identifier, resolving to unknown");
            return RoleLookup::Unknown;
        }

        if let Some(cached) = self.cache.get(&user_id.to_string()) {
            debug!("role cache hit");
            return RoleLookup::from_cached(cached);
        }

        self.join_or_start(user_id).await
    }

    /// Fail-closed convenience: a failed lookup reads as "no role"
    pub async fn resolve_role(&self, user_id: &str) -> Option<UserRole> {
        self.resolve(user_id).await.role()
    }

    /// Logout hook: drop every cached role and in-flight entry
    pub fn clear(&self) {
        self.cache.clear();
        self.pending.clear();
        debug!("role cache cleared");
    }

    /// Snapshot of cache hit/miss/expiration counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Join the pending lookup for `user_id`, starting one if absent
    ///
    /// The entry is inserted under the map shard lock, so racing callers
    /// observe either the occupied entry or insert exactly one future.
    fn join_or_start(&self, user_id: &str) -> SharedLookup {
        match self.pending.entry(user_id.to_string()) {
            Entry::Occupied(entry) => {
                debug!("joining in-flight role lookup");
                entry.get().clone()
            }
            Entry::Vacant(slot) => {
                let fut = Self::drive_lookup(
                    Arc::clone(&self.store),
                    self.cache.clone(),
                    Arc::clone(&self.pending),
                    self.retry.clone(),
                    user_id.to_string(),
                )
                .boxed()
                .shared();
                slot.insert(fut.clone());
                fut
            }
        }
    }

    /// The single driver future behind all coalesced callers
    ///
    /// Runs the store lookup under the retry budget, publishes the answer
    /// to the cache, and removes the pending entry exactly once (here, at
    /// settle time) before handing the outcome to every waiter.
    async fn drive_lookup(
        store: Arc<dyn ProfileStore>,
        cache: TtlCache<String, Option<UserRole>, C>,
        pending: Arc<DashMap<String, SharedLookup>>,
        retry: RetryConfig,
        user_id: String,
    ) -> RoleLookup {
        let executor = RetryExecutor::new(retry, AlwaysRetry);
        let outcome = executor
            .execute(|| {
                let store = Arc::clone(&store);
                let id = user_id.clone();
                async move { store.role_for_user(&id).await }
            })
            .await;

        let lookup = match outcome {
            Ok(role) => {
                cache.insert(user_id.clone(), role);
                RoleLookup::from_cached(role)
            }
            Err(err) => {
                let source = match err {
                    RetryError::AttemptsExhausted { source, .. }
                    | RetryError::NonRetryable { source } => source,
                    RetryError::InvalidConfiguration { message } => {
                        PaydeskError::Internal(message)
                    }
                };
                warn!(error = %source, "role lookup failed, degrading to unknown role");
                RoleLookup::Failed(source)
            }
        };

        pending.remove(&user_id);
        lookup
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use paydesk_common::resilience::MockClock;
    use paydesk_domain::Result;

    use super::*;

    type Script = Box<dyn Fn(usize) -> Result<Option<UserRole>> + Send + Sync>;

    /// Profile store driven by a call-indexed script
    struct ScriptedStore {
        calls: AtomicUsize,
        script: Script,
        delay: Option<Duration>,
    }

    impl ScriptedStore {
        fn new(script: impl Fn(usize) -> Result<Option<UserRole>> + Send + Sync + 'static) -> Self {
            Self { calls: AtomicUsize::new(0), script: Box::new(script), delay: None }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProfileStore for ScriptedStore {
        async fn role_for_user(&self, _user_id: &str) -> Result<Option<UserRole>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.script)(call)
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::builder()
            .max_attempts(3)
            .fixed_backoff(Duration::from_millis(1))
            .build()
            .unwrap()
    }

    fn resolver_with_clock(
        store: Arc<ScriptedStore>,
    ) -> (RoleResolver<MockClock>, MockClock) {
        let clock = MockClock::new();
        let resolver = RoleResolver::with_clock(store, clock.clone()).with_retry_config(fast_retry());
        (resolver, clock)
    }

    #[tokio::test]
    async fn test_cache_hit_within_ttl_issues_one_request() {
        let store = Arc::new(ScriptedStore::new(|_| Ok(Some(UserRole::Admin))));
        let (resolver, clock) = resolver_with_clock(Arc::clone(&store));

        assert_eq!(resolver.resolve("user-1").await.role(), Some(UserRole::Admin));
        clock.advance_secs(59);
        assert_eq!(resolver.resolve("user-1").await.role(), Some(UserRole::Admin));

        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let store = Arc::new(ScriptedStore::new(|_| Ok(Some(UserRole::Client))));
        let (resolver, clock) = resolver_with_clock(Arc::clone(&store));

        let _ = resolver.resolve("user-1").await;
        clock.advance_secs(61);
        let _ = resolver.resolve("user-1").await;

        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_request() {
        let store = Arc::new(
            ScriptedStore::new(|_| Ok(Some(UserRole::Partner)))
                .with_delay(Duration::from_millis(50)),
        );
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));
        let resolver = Arc::new(resolver);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let resolver = Arc::clone(&resolver);
            handles.push(tokio::spawn(async move { resolver.resolve("user-1").await }));
        }

        for handle in handles {
            let lookup = handle.await.unwrap();
            assert_eq!(lookup.role(), Some(UserRole::Partner));
        }
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_retry_then_degrade_after_three_failures() {
        let store = Arc::new(ScriptedStore::new(|_| {
            Err(PaydeskError::Network("connection refused".to_string()))
        }));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        let lookup = resolver.resolve("user-1").await;

        assert!(lookup.is_failed());
        assert_eq!(lookup.role(), None);
        // Exactly the retry budget, never a 4th attempt
        assert_eq!(store.calls(), 3);
    }

    #[tokio::test]
    async fn test_transient_failure_recovers_within_budget() {
        let store = Arc::new(ScriptedStore::new(|call| {
            if call == 0 {
                Err(PaydeskError::Network("timeout".to_string()))
            } else {
                Ok(Some(UserRole::Financial))
            }
        }));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        let lookup = resolver.resolve("user-1").await;

        assert_eq!(lookup.role(), Some(UserRole::Financial));
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_profile_resolves_unknown_and_is_cached() {
        let store = Arc::new(ScriptedStore::new(|_| Ok(None)));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        assert!(matches!(resolver.resolve("user-1").await, RoleLookup::Unknown));
        assert!(matches!(resolver.resolve("user-1").await, RoleLookup::Unknown));

        // "No role" is a successful resolution and cached like one
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let store = Arc::new(ScriptedStore::new(|call| {
            if call < 3 {
                Err(PaydeskError::Network("down".to_string()))
            } else {
                Ok(Some(UserRole::Logistics))
            }
        }));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        assert!(resolver.resolve("user-1").await.is_failed());

        // The store recovered; the next resolve must reach it again
        let lookup = resolver.resolve("user-1").await;
        assert_eq!(lookup.role(), Some(UserRole::Logistics));
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn test_clear_forces_fresh_lookup() {
        let store = Arc::new(ScriptedStore::new(|_| Ok(Some(UserRole::Admin))));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        let _ = resolver.resolve("user-1").await;
        resolver.clear();
        let _ = resolver.resolve("user-1").await;

        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_identifier_never_reaches_store() {
        let store = Arc::new(ScriptedStore::new(|_| Ok(Some(UserRole::Admin))));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        assert!(matches!(resolver.resolve("").await, RoleLookup::Unknown));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_resolve_role_is_fail_closed() {
        let store = Arc::new(ScriptedStore::new(|_| {
            Err(PaydeskError::Store("500".to_string()))
        }));
        let (resolver, _clock) = resolver_with_clock(Arc::clone(&store));

        assert_eq!(resolver.resolve_role("user-1").await, None);
    }
}
