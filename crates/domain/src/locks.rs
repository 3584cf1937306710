//! Ordered domain locks.
//!
//! Every service-level write holds the exclusive lock of each domain it
//! touches. Locks are always taken through [`LockManager::acquire`], which
//! sorts the requested domains into the single global order declared by
//! [`LockDomain`] and releases them in reverse. As long as no caller requests
//! further locks while holding a [`LockSet`], no cycle of waiters can form.
//!
//! Domain locks are independent of the entity stores' internal reader/writer
//! locks, which are only ever taken inside them.

use std::time::Instant;

use tokio::sync::{Mutex, MutexGuard};

/// A lockable domain. Declaration order is the global acquisition order:
///
/// ```text
/// User < Criminal < Case < Fir < Officer
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockDomain {
    User,
    Criminal,
    Case,
    Fir,
    Officer,
}

impl LockDomain {
    pub const COUNT: usize = 5;

    /// All domains in acquisition order.
    pub const ALL: [LockDomain; Self::COUNT] = [
        LockDomain::User,
        LockDomain::Criminal,
        LockDomain::Case,
        LockDomain::Fir,
        LockDomain::Officer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LockDomain::User => "user",
            LockDomain::Criminal => "criminal",
            LockDomain::Case => "case",
            LockDomain::Fir => "fir",
            LockDomain::Officer => "officer",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for LockDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Holds one fair exclusive lock per [`LockDomain`].
///
/// Tokio's [`Mutex`] hands the lock to waiters in the order they asked for
/// it, so no task waits forever behind later arrivals.
#[derive(Debug)]
pub struct LockManager {
    locks: [Mutex<()>; LockDomain::COUNT],
}

impl Default for LockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager {
    pub fn new() -> Self {
        Self {
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Acquires the locks of `domains` in global order.
    ///
    /// Duplicates are ignored. The returned set releases the locks in reverse
    /// order when dropped, on every exit path.
    pub async fn acquire(&self, domains: &[LockDomain]) -> LockSet<'_> {
        let mut ordered = domains.to_vec();
        ordered.sort();
        ordered.dedup();

        let started = Instant::now();
        let mut guards = Vec::with_capacity(ordered.len());
        for domain in ordered {
            let guard = self.locks[domain.index()].lock().await;
            tracing::trace!(%domain, "domain lock acquired");
            guards.push((domain, guard));
        }
        metrics::histogram!("domain_lock_wait_seconds").record(started.elapsed().as_secs_f64());

        LockSet { guards }
    }
}

/// Domain locks held by one operation.
#[must_use = "domain locks are released as soon as the set is dropped"]
pub struct LockSet<'a> {
    guards: Vec<(LockDomain, MutexGuard<'a, ()>)>,
}

impl LockSet<'_> {
    /// Returns the held domains in acquisition order.
    pub fn domains(&self) -> Vec<LockDomain> {
        self.guards.iter().map(|(domain, _)| *domain).collect()
    }

    pub fn holds(&self, domain: LockDomain) -> bool {
        self.guards.iter().any(|(held, _)| *held == domain)
    }
}

impl Drop for LockSet<'_> {
    fn drop(&mut self) {
        while let Some((domain, guard)) = self.guards.pop() {
            drop(guard);
            tracing::trace!(%domain, "domain lock released");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn acquire_sorts_and_dedups() {
        let locks = LockManager::new();

        let held = locks
            .acquire(&[LockDomain::Officer, LockDomain::Case, LockDomain::Officer])
            .await;

        assert_eq!(held.domains(), vec![LockDomain::Case, LockDomain::Officer]);
        assert!(held.holds(LockDomain::Officer));
        assert!(!held.holds(LockDomain::Fir));
    }

    #[tokio::test]
    async fn global_order_puts_officer_last() {
        let mut all = LockDomain::ALL.to_vec();
        all.reverse();
        all.sort();
        assert_eq!(all, LockDomain::ALL.to_vec());
        assert!(LockDomain::Case < LockDomain::Officer);
        assert!(LockDomain::Fir < LockDomain::Officer);
        assert!(LockDomain::Case < LockDomain::Fir);
    }

    #[tokio::test]
    async fn held_domain_blocks_other_callers_until_dropped() {
        let locks = Arc::new(LockManager::new());
        let held = locks.acquire(&[LockDomain::Case]).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _held = locks.acquire(&[LockDomain::Case, LockDomain::Officer]).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire once the lock is released")
            .unwrap();
    }

    #[tokio::test]
    async fn unrelated_domains_do_not_block() {
        let locks = LockManager::new();
        let _criminal = locks.acquire(&[LockDomain::Criminal]).await;

        let user = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(&[LockDomain::User]),
        )
        .await;

        assert!(user.is_ok());
    }

    #[tokio::test]
    async fn waiters_are_served_in_request_order() {
        let locks = Arc::new(LockManager::new());
        let served = Arc::new(std::sync::Mutex::new(Vec::new()));
        let held = locks.acquire(&[LockDomain::Fir]).await;

        let mut waiters = Vec::new();
        for turn in 0..6 {
            let locks = Arc::clone(&locks);
            let served = Arc::clone(&served);
            waiters.push(tokio::spawn(async move {
                let _held = locks.acquire(&[LockDomain::Fir]).await;
                served.lock().unwrap().push(turn);
            }));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(served.lock().unwrap().is_empty());

        drop(held);
        for waiter in waiters {
            waiter.await.unwrap();
        }

        assert_eq!(*served.lock().unwrap(), (0..6).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn mixed_request_orders_never_deadlock() {
        let locks = Arc::new(LockManager::new());
        let requests = [
            vec![LockDomain::Officer, LockDomain::Case],
            vec![LockDomain::Case, LockDomain::Officer],
            vec![LockDomain::Officer, LockDomain::Fir],
            vec![LockDomain::Fir, LockDomain::Case, LockDomain::Officer],
        ];

        let handles: Vec<_> = (0..200)
            .map(|i| {
                let locks = Arc::clone(&locks);
                let request = requests[i % requests.len()].clone();
                tokio::spawn(async move {
                    let _held = locks.acquire(&request).await;
                    tokio::task::yield_now().await;
                })
            })
            .collect();

        let all = async {
            for handle in handles {
                handle.await.unwrap();
            }
        };
        tokio::time::timeout(Duration::from_secs(10), all)
            .await
            .expect("ordered acquisition must not deadlock");
    }
}
