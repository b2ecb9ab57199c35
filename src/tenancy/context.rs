//! Request-scoped tenant slot.
//!
//! Each request runs inside its own task-local slot entered with [`scope`]
//! (or [`sync_scope`] for synchronous callers). The slot lives exactly as long
//! as the future or closure it wraps, so concurrent requests never observe
//! each other's tenant and nothing survives into the next request handled by
//! the same worker thread.
//!
//! Data-access code reads the slot with [`get_current`] instead of having the
//! tenant threaded through every call.

use std::cell::RefCell;
use std::future::Future;

use tokio::task::futures::TaskLocalFuture;

use super::TenantId;

tokio::task_local! {
    static CURRENT_TENANT: RefCell<TenantId>;
}

// ---

/// Run `fut` with a fresh tenant slot initialised to `tenant`.
pub fn scope<F>(tenant: TenantId, fut: F) -> TaskLocalFuture<RefCell<TenantId>, F>
where
    F: Future,
{
    // ---
    CURRENT_TENANT.scope(RefCell::new(tenant), fut)
}

/// Run `f` synchronously with a fresh tenant slot initialised to `tenant`.
pub fn sync_scope<R>(tenant: TenantId, f: impl FnOnce() -> R) -> R {
    // ---
    CURRENT_TENANT.sync_scope(RefCell::new(tenant), f)
}

/// Store `tenant` in the enclosing request slot.
///
/// Returns `false` (and stores nothing) when called outside any scope.
pub fn set_current(tenant: TenantId) -> bool {
    // ---
    CURRENT_TENANT
        .try_with(|slot| *slot.borrow_mut() = tenant)
        .is_ok()
}

/// The tenant of the calling request, or [`TenantId::Unresolved`] when called
/// outside any request scope.
pub fn get_current() -> TenantId {
    // ---
    CURRENT_TENANT
        .try_with(|slot| slot.borrow().clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_outside_scope_is_unresolved() {
        // ---
        assert_eq!(get_current(), TenantId::Unresolved);
        assert!(!set_current(TenantId::Default));
        assert_eq!(get_current(), TenantId::Unresolved);
    }

    #[test]
    fn test_sync_scope_and_set_current() {
        // ---
        sync_scope(TenantId::Unresolved, || {
            assert_eq!(get_current(), TenantId::Unresolved);
            assert!(set_current(TenantId::Named("acme".into())));
            assert_eq!(get_current(), TenantId::Named("acme".into()));
        });

        // Nothing leaks out of the finished scope
        assert_eq!(get_current(), TenantId::Unresolved);
    }

    #[test]
    fn test_nested_scope_restores_outer() {
        // ---
        sync_scope(TenantId::Default, || {
            sync_scope(TenantId::Named("inner".into()), || {
                assert_eq!(get_current(), TenantId::Named("inner".into()));
            });
            assert_eq!(get_current(), TenantId::Default);
        });
    }

    #[test]
    fn test_async_scope_with_block_on() {
        // ---
        let seen = tokio_test::block_on(scope(TenantId::Named("acme".into()), async {
            tokio::task::yield_now().await;
            get_current()
        }));
        assert_eq!(seen, TenantId::Named("acme".into()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests_are_isolated() {
        // ---
        let request = |name: &'static str, delay_ms: u64| {
            tokio::spawn(scope(TenantId::Unresolved, async move {
                set_current(TenantId::Named(name.into()));
                let mut seen = Vec::new();
                for _ in 0..5 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    seen.push(get_current());
                }
                seen
            }))
        };

        let (a, b) = tokio::join!(request("A", 3), request("B", 2));

        assert!(a.unwrap().iter().all(|t| *t == TenantId::Named("A".into())));
        assert!(b.unwrap().iter().all(|t| *t == TenantId::Named("B".into())));
    }
}
