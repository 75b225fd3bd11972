//! Transaction handle and provider contracts.

use async_trait::async_trait;

use crate::Result;

/// A handle scoping a set of writes to one all-or-nothing unit.
///
/// Every transactional creator accepts the same handle type, so writes from
/// independent collaborators land in the same underlying transaction. A
/// handle is finished by exactly one of [`commit`](TxHandle::commit),
/// [`rollback`](TxHandle::rollback) or [`abort`](TxHandle::abort); once
/// finished, further use fails with `StoreError::TransactionClosed`.
#[async_trait]
pub trait TxHandle: Send + 'static {
    /// Returns true while the transaction accepts writes.
    fn is_open(&self) -> bool;

    /// Makes every write issued through this handle durable.
    async fn commit(&mut self) -> Result<()>;

    /// Discards every write issued through this handle.
    async fn rollback(&mut self) -> Result<()>;

    /// Discards the transaction without awaiting.
    ///
    /// Used from `Drop` when the owner unwinds or is cancelled, so it must
    /// not block. Implementations may finish the rollback in the background.
    fn abort(&mut self);
}

/// Begins transactions.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    /// Handle type produced by this provider.
    type Tx: TxHandle;

    /// Starts a new transaction.
    async fn begin_tx(&self) -> Result<Self::Tx>;
}
