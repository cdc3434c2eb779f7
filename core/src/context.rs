use std::collections::HashMap;

use alloy::primitives::{Address, B256, Bytes, ChainId};
use metatx_types::{Bundle, BundleError, RelayReadyBundle, Transaction};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{DEFAULT_FACTORY_ADDRESS, DEFAULT_GUEST_MODULE_ADDRESS, DEFAULT_MAIN_MODULE_ADDRESS},
    digest::guest_digest,
    intent::build_execution_call,
};

/// Wallet contracts deployed on one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletContext {
    pub guest_module: Address,
    pub main_module: Address,
    pub factory: Address,
}

impl Default for WalletContext {
    fn default() -> Self {
        Self {
            guest_module: DEFAULT_GUEST_MODULE_ADDRESS,
            main_module: DEFAULT_MAIN_MODULE_ADDRESS,
            factory: DEFAULT_FACTORY_ADDRESS,
        }
    }
}

pub trait ContextProvider: Send + Sync {
    fn context(&self, chain_id: ChainId) -> Option<WalletContext>;

    fn require_context(&self, chain_id: ChainId) -> Result<WalletContext, BundleError> {
        self.context(chain_id)
            .ok_or(BundleError::UnknownChain { chain_id })
    }
}

/// Fixed per-chain contexts, usually built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticContextProvider {
    contexts: HashMap<ChainId, WalletContext>,
    fallback: Option<WalletContext>,
}

impl StaticContextProvider {
    pub fn new(contexts: HashMap<ChainId, WalletContext>) -> Self {
        Self {
            contexts,
            fallback: None,
        }
    }

    /// Context returned for chains without an explicit entry.
    pub fn with_fallback(mut self, fallback: WalletContext) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl ContextProvider for StaticContextProvider {
    fn context(&self, chain_id: ChainId) -> Option<WalletContext> {
        self.contexts.get(&chain_id).copied().or(self.fallback)
    }
}

/// Guest subdigest of `transactions` on `chain_id`.
pub fn guest_digest_for_chain<P: ContextProvider>(
    provider: &P,
    chain_id: ChainId,
    transactions: &[Transaction],
) -> Result<B256, BundleError> {
    let context = provider.require_context(chain_id)?;
    Ok(guest_digest(context.guest_module, chain_id, transactions))
}

/// Unsigned execution of `transactions` through the chain's guest module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestExecution {
    pub to: Address,
    pub data: Bytes,
    pub subdigest: B256,
}

pub fn guest_execution<P: ContextProvider>(
    provider: &P,
    chain_id: ChainId,
    transactions: Vec<Transaction>,
) -> Result<GuestExecution, BundleError> {
    let context = provider.require_context(chain_id)?;
    let subdigest = guest_digest(context.guest_module, chain_id, &transactions);
    let bundle = RelayReadyBundle::from(Bundle::new(context.guest_module, transactions));

    Ok(GuestExecution {
        to: context.guest_module,
        data: build_execution_call(&bundle),
        subdigest,
    })
}
