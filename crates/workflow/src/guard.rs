//! Scoped ownership of a transaction handle.

use std::ops::{Deref, DerefMut};

use store::{StoreError, TxHandle};

/// Owns a transaction for the duration of one workflow call.
///
/// Dropping the guard before [`commit`](TxGuard::commit) succeeded or
/// [`rollback`](TxGuard::rollback) ran aborts the transaction. This covers
/// panics unwinding through the call and futures dropped mid-await.
pub struct TxGuard<T: TxHandle> {
    tx: T,
    finished: bool,
}

impl<T: TxHandle> TxGuard<T> {
    pub fn new(tx: T) -> Self {
        Self {
            tx,
            finished: false,
        }
    }

    /// Commits the transaction. On failure the guard stays armed so the
    /// caller can still roll back.
    pub async fn commit(&mut self) -> Result<(), StoreError> {
        self.tx.commit().await?;
        self.finished = true;
        Ok(())
    }

    /// Rolls the transaction back. The guard is disarmed whatever the outcome,
    /// so a rollback is attempted at most once.
    pub async fn rollback(&mut self) -> Result<(), StoreError> {
        let result = self.tx.rollback().await;
        self.finished = true;
        result
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<T: TxHandle> Deref for TxGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.tx
    }
}

impl<T: TxHandle> DerefMut for TxGuard<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.tx
    }
}

impl<T: TxHandle> Drop for TxGuard<T> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if std::thread::panicking() {
            tracing::error!("panic during supplier creation, aborting transaction");
        } else {
            tracing::warn!("transaction guard dropped before finishing, aborting transaction");
        }
        self.tx.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::{InMemoryStore, Operation, TransactionProvider};

    #[tokio::test]
    async fn dropping_an_armed_guard_aborts() {
        let store = InMemoryStore::new();
        let guard = TxGuard::new(store.begin_tx().await.unwrap());
        assert!(!guard.is_finished());
        drop(guard);
        assert_eq!(store.call_count(Operation::Rollback), 1);
    }

    #[tokio::test]
    async fn committed_guard_does_not_abort() {
        let store = InMemoryStore::new();
        let mut guard = TxGuard::new(store.begin_tx().await.unwrap());
        guard.commit().await.unwrap();
        drop(guard);
        assert_eq!(store.call_count(Operation::Commit), 1);
        assert_eq!(store.call_count(Operation::Rollback), 0);
    }

    #[tokio::test]
    async fn failed_commit_keeps_guard_armed() {
        let store = InMemoryStore::new();
        store.fail_on(Operation::Commit, "refused");
        let mut guard = TxGuard::new(store.begin_tx().await.unwrap());
        assert!(guard.commit().await.is_err());
        assert!(!guard.is_finished());
        assert!(guard.is_open());
        drop(guard);
        assert_eq!(store.call_count(Operation::Rollback), 1);
    }

    #[tokio::test]
    async fn failed_rollback_still_disarms() {
        let store = InMemoryStore::new();
        store.fail_on(Operation::Rollback, "connection lost");
        let mut guard = TxGuard::new(store.begin_tx().await.unwrap());
        assert!(guard.rollback().await.is_err());
        assert!(guard.is_finished());
        drop(guard);
        assert_eq!(store.call_count(Operation::Rollback), 1);
    }
}
