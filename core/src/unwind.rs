//! Flattening of nested batch calls into the calls that actually run.
//!
//! A transaction may itself be a `selfExecute` call on the wallet or an
//! `execute` call on some wallet or module, carrying another batch. Unwinding
//! replaces each such transaction with its inner transactions, recursively,
//! keeping left to right, depth first order.

use alloy::{primitives::Address, sol_types::SolCall};
use metatx_types::{
    BundleError, Transaction, from_canonical,
    wallet::{SELF_EXECUTE_SELECTOR, executeCall, selfExecuteCall},
};

use crate::constants::DEFAULT_MAX_UNWIND_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unwinder {
    max_depth: usize,
}

impl Default for Unwinder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UNWIND_DEPTH)
    }
}

impl Unwinder {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flattens `transactions` sent by `wallet` into atomic leaves.
    ///
    /// Fails only when nesting goes deeper than `max_depth`.
    pub fn unwind(
        &self,
        wallet: Address,
        transactions: &[Transaction],
    ) -> Result<Vec<Transaction>, BundleError> {
        let mut leaves = Vec::with_capacity(transactions.len());

        // Work list, top of the stack is the next transaction in execution order.
        let mut pending: Vec<(Transaction, usize)> =
            transactions.iter().rev().map(|tx| (tx.clone(), 0)).collect();

        while let Some((tx, depth)) = pending.pop() {
            let Some(inner) = nested_batch(wallet, &tx) else {
                leaves.push(tx);
                continue;
            };

            if depth >= self.max_depth {
                tracing::warn!(
                    wallet = %wallet,
                    max_depth = self.max_depth,
                    "Nested batch exceeds maximum unwind depth"
                );
                return Err(BundleError::encoding(format!(
                    "nested batch exceeds maximum unwind depth of {}",
                    self.max_depth
                )));
            }

            tracing::trace!(
                to = %tx.to,
                depth,
                inner = inner.len(),
                "Expanding nested batch"
            );

            pending.extend(inner.into_iter().rev().map(|inner| (inner, depth + 1)));
        }

        tracing::debug!(
            wallet = %wallet,
            input = transactions.len(),
            leaves = leaves.len(),
            "Unwound transactions"
        );

        Ok(leaves)
    }
}

/// [`Unwinder::unwind`] with the default depth limit.
pub fn unwind(wallet: Address, transactions: &[Transaction]) -> Result<Vec<Transaction>, BundleError> {
    Unwinder::default().unwind(wallet, transactions)
}

/// The inner batch carried by `tx`, if it is a batch call.
///
/// Decoding is speculative: most payloads are not batches, and a payload that
/// fails to decode is simply a leaf.
fn nested_batch(wallet: Address, tx: &Transaction) -> Option<Vec<Transaction>> {
    if tx.to == wallet && tx.data.starts_with(&SELF_EXECUTE_SELECTOR) {
        if let Ok(call) = selfExecuteCall::abi_decode(&tx.data) {
            return Some(from_canonical(call._txs));
        }
    }

    executeCall::abi_decode(&tx.data)
        .ok()
        .map(|call| from_canonical(call._txs))
}
