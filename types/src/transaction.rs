use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    defs::{AddressDef, BytesDef, U256Def},
    error::BundleError,
    wallet::EncodedTransaction,
};

/// ### Transaction
/// A single call executed by the wallet, as callers build it.
///
/// Optional fields are filled with their defaults when the transaction is
/// converted into its [`EncodedTransaction`] wire form.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[schema(value_type = AddressDef)]
    pub to: Address,

    #[schema(value_type = U256Def)]
    #[serde(default)]
    pub value: U256,

    #[schema(value_type = BytesDef)]
    #[serde(default)]
    pub data: Bytes,

    /// Gas forwarded to the call. Absent means "all remaining gas", which the
    /// wallet encodes as zero.
    #[schema(value_type = Option<U256Def>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<U256>,

    #[serde(default)]
    pub delegate_call: bool,

    #[serde(default)]
    pub revert_on_error: bool,
}

impl Transaction {
    /// A plain call with every optional field defaulted.
    pub fn call(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: U256) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    pub fn with_delegate_call(mut self, delegate_call: bool) -> Self {
        self.delegate_call = delegate_call;
        self
    }

    pub fn with_revert_on_error(mut self, revert_on_error: bool) -> Self {
        self.revert_on_error = revert_on_error;
        self
    }

    /// Wire form with every default applied. Never fails.
    pub fn to_canonical(&self) -> EncodedTransaction {
        EncodedTransaction {
            delegateCall: self.delegate_call,
            revertOnError: self.revert_on_error,
            gasLimit: self.gas_limit.unwrap_or_default(),
            target: self.to,
            value: self.value,
            data: self.data.clone(),
        }
    }
}

impl From<EncodedTransaction> for Transaction {
    fn from(encoded: EncodedTransaction) -> Self {
        Self {
            to: encoded.target,
            value: encoded.value,
            data: encoded.data,
            // zero is the encoded form of "no limit"
            gas_limit: (!encoded.gasLimit.is_zero()).then_some(encoded.gasLimit),
            delegate_call: encoded.delegateCall,
            revert_on_error: encoded.revertOnError,
        }
    }
}

impl From<&Transaction> for EncodedTransaction {
    fn from(tx: &Transaction) -> Self {
        tx.to_canonical()
    }
}

/// Encodes every transaction in order.
pub fn to_canonical(transactions: &[Transaction]) -> Vec<EncodedTransaction> {
    transactions.iter().map(Transaction::to_canonical).collect()
}

/// Inverse of [`to_canonical`].
pub fn from_canonical(encoded: Vec<EncodedTransaction>) -> Vec<Transaction> {
    encoded.into_iter().map(Transaction::from).collect()
}

/// ### GenericCall
/// An arbitrary call request, as produced by dapps and generic tooling.
///
/// A missing or zero `to` follows the contract-creation convention: `data`
/// is then deployment bytecode.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenericCall {
    #[schema(value_type = Option<AddressDef>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,

    #[schema(value_type = Option<U256Def>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,

    #[schema(value_type = BytesDef)]
    #[serde(default)]
    pub data: Bytes,

    #[schema(value_type = Option<U256Def>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<U256>,

    #[schema(value_type = Option<U256Def>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
}

impl GenericCall {
    /// True when the request deploys a contract rather than calling one.
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none_or(|to| to == Address::ZERO)
    }
}

/// A generic call after normalization, with the nonce it asked for (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCall {
    pub nonce: Option<U256>,
    pub transaction: Transaction,
}

/// A call request that is either already canonical or still generic.
///
/// The variant is fixed when the request is constructed. Deserializing goes
/// through [`CallRequest::classify`], so a generic call with a `to` never
/// passes for a canonical transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum CallRequest {
    Transaction(Transaction),
    Generic(GenericCall),
}

impl CallRequest {
    /// Classifies an untyped candidate. Presence of either `delegateCall` or
    /// `revertOnError` marks an already-canonical transaction.
    pub fn classify(candidate: serde_json::Value) -> Result<Self, BundleError> {
        let object = candidate
            .as_object()
            .ok_or_else(|| BundleError::encoding("call request must be a JSON object"))?;

        if object.contains_key("delegateCall") || object.contains_key("revertOnError") {
            Ok(Self::Transaction(serde_json::from_value(candidate)?))
        } else {
            Ok(Self::Generic(serde_json::from_value(candidate)?))
        }
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Self::Transaction(_))
    }
}

impl<'de> Deserialize<'de> for CallRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let candidate = serde_json::Value::deserialize(deserializer)?;
        Self::classify(candidate).map_err(serde::de::Error::custom)
    }
}

impl From<Transaction> for CallRequest {
    fn from(tx: Transaction) -> Self {
        Self::Transaction(tx)
    }
}

impl From<GenericCall> for CallRequest {
    fn from(call: GenericCall) -> Self {
        Self::Generic(call)
    }
}
