use alloy::primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};

use crate::defs::AddressDef;

/// Errors produced while encoding, hashing, binding or unwinding bundles.
///
/// Every variant surfaces synchronously to the immediate caller. The unwinder
/// is the only component that swallows an `EncodingError`, treating it as
/// "not a batch call".
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    thiserror::Error,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    utoipa::ToSchema,
)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleError {
    #[schema(title = "Encoding Error")]
    #[error("Encoding error: {message}")]
    EncodingError { message: String },

    #[schema(title = "Range Error")]
    #[error("Range error: {message}")]
    RangeError { message: String },

    #[schema(title = "State Mismatch")]
    #[error("State mismatch: expected wallet {expected}, recovered {recovered}")]
    StateMismatch {
        #[schemars(with = "AddressDef")]
        #[schema(value_type = AddressDef)]
        expected: Address,
        #[schemars(with = "AddressDef")]
        #[schema(value_type = AddressDef)]
        recovered: Address,
    },

    #[schema(title = "Signer Error")]
    #[error("Signer error: {message}")]
    SignerError { message: String },

    #[schema(title = "Unknown Chain")]
    #[error("No wallet context configured for chain {chain_id}")]
    #[serde(rename_all = "camelCase")]
    UnknownChain { chain_id: ChainId },
}

impl BundleError {
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::EncodingError {
            message: message.into(),
        }
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::RangeError {
            message: message.into(),
        }
    }
}

impl From<alloy::sol_types::Error> for BundleError {
    fn from(err: alloy::sol_types::Error) -> Self {
        Self::encoding(err.to_string())
    }
}

impl From<serde_json::Error> for BundleError {
    fn from(err: serde_json::Error) -> Self {
        Self::encoding(err.to_string())
    }
}
