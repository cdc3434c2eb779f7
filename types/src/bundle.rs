use alloy::primitives::{Address, B256, Bytes, ChainId, U256};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    defs::{AddressDef, B256Def, BytesDef, U256Def},
    error::BundleError,
    transaction::Transaction,
};

/// ### Bundle
/// An ordered batch of transactions executed atomically under one nonce.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Contract the relayer calls to execute the batch: the wallet itself, or
    /// a guest module.
    #[schema(value_type = AddressDef)]
    pub entrypoint: Address,

    pub transactions: Vec<Transaction>,

    #[schema(value_type = Option<U256Def>)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<U256>,
}

impl Bundle {
    pub fn new(entrypoint: Address, transactions: Vec<Transaction>) -> Self {
        Self {
            entrypoint,
            transactions,
            nonce: None,
        }
    }

    pub fn with_nonce(mut self, nonce: U256) -> Self {
        self.nonce = Some(nonce);
        self
    }
}

/// Who a bundle is meant for, and the caller's correlation token for it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, utoipa::ToSchema)]
pub struct Intent {
    /// Caller supplied correlation token. Not a content digest.
    #[schema(value_type = B256Def)]
    pub id: B256,

    #[schema(value_type = AddressDef)]
    pub wallet: Address,
}

/// ### IntendedBundle
/// A bundle bound to a wallet and chain, ready to be signed.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntendedBundle {
    #[serde(flatten)]
    pub bundle: Bundle,

    pub chain_id: ChainId,

    pub intent: Intent,
}

impl IntendedBundle {
    pub fn wallet(&self) -> Address {
        self.intent.wallet
    }

    /// Attaches a signature produced over this bundle's subdigest at `nonce`.
    ///
    /// `nonce` replaces any provisional nonce carried by the bundle.
    pub fn into_signed(self, nonce: U256, signature: Bytes) -> SignedBundle {
        SignedBundle {
            entrypoint: self.bundle.entrypoint,
            transactions: self.bundle.transactions,
            nonce,
            chain_id: self.chain_id,
            intent: self.intent,
            signature,
        }
    }
}

/// ### SignedBundle
/// An intended bundle together with the wallet signature over its subdigest.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedBundle {
    #[schema(value_type = AddressDef)]
    pub entrypoint: Address,

    pub transactions: Vec<Transaction>,

    #[schema(value_type = U256Def)]
    pub nonce: U256,

    pub chain_id: ChainId,

    pub intent: Intent,

    #[schema(value_type = BytesDef)]
    pub signature: Bytes,
}

impl SignedBundle {
    pub fn wallet(&self) -> Address {
        self.intent.wallet
    }

    /// The intended bundle this signature was attached to, with its nonce fixed.
    pub fn intended(&self) -> IntendedBundle {
        IntendedBundle {
            bundle: Bundle {
                entrypoint: self.entrypoint,
                transactions: self.transactions.clone(),
                nonce: Some(self.nonce),
            },
            chain_id: self.chain_id,
            intent: self.intent,
        }
    }
}

/// A bundle in whichever lifecycle state it reached before being handed to a
/// relayer.
///
/// Only `Signed` bundles carry authentication; the other variants are for
/// guest execution. Deserializing goes through [`RelayReadyBundle::from_json`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum RelayReadyBundle {
    Signed(SignedBundle),
    Intended(IntendedBundle),
    Unsigned(Bundle),
}

impl RelayReadyBundle {
    /// Classifies an untyped candidate. Signed bundles also satisfy the
    /// intended-bundle shape, so the signed check runs first.
    pub fn from_json(candidate: Value) -> Result<Self, BundleError> {
        if is_signed_bundle(&candidate) {
            Ok(Self::Signed(serde_json::from_value(candidate)?))
        } else if is_bundle(&candidate) {
            Ok(Self::Intended(serde_json::from_value(candidate)?))
        } else {
            if has_signature(&candidate) {
                tracing::warn!(
                    entrypoint = ?candidate.get("entrypoint"),
                    "Signature discarded: candidate is not a complete bundle, treating it as unsigned"
                );
            }
            Ok(Self::Unsigned(serde_json::from_value(candidate)?))
        }
    }

    pub fn entrypoint(&self) -> Address {
        match self {
            Self::Signed(b) => b.entrypoint,
            Self::Intended(b) => b.bundle.entrypoint,
            Self::Unsigned(b) => b.entrypoint,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        match self {
            Self::Signed(b) => &b.transactions,
            Self::Intended(b) => &b.bundle.transactions,
            Self::Unsigned(b) => &b.transactions,
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Self::Signed(_))
    }
}

impl<'de> Deserialize<'de> for RelayReadyBundle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let candidate = Value::deserialize(deserializer)?;
        Self::from_json(candidate).map_err(serde::de::Error::custom)
    }
}

impl From<Bundle> for RelayReadyBundle {
    fn from(bundle: Bundle) -> Self {
        Self::Unsigned(bundle)
    }
}

impl From<IntendedBundle> for RelayReadyBundle {
    fn from(bundle: IntendedBundle) -> Self {
        Self::Intended(bundle)
    }
}

impl From<SignedBundle> for RelayReadyBundle {
    fn from(bundle: SignedBundle) -> Self {
        Self::Signed(bundle)
    }
}

/// Structural check for an intended bundle carrying a nonce.
///
/// Every transaction must be in canonical form, i.e. carry `delegateCall`
/// or `revertOnError`. A signed bundle satisfies this too, so check
/// [`is_signed_bundle`] first when the distinction matters.
pub fn is_bundle(candidate: &Value) -> bool {
    let Some(object) = candidate.as_object() else {
        return false;
    };

    let has = |key: &str| object.get(key).is_some_and(|v| !v.is_null());

    let intent_complete = object
        .get("intent")
        .and_then(Value::as_object)
        .is_some_and(|intent| intent.contains_key("id") && intent.contains_key("wallet"));

    let transactions_canonical = object
        .get("transactions")
        .and_then(Value::as_array)
        .is_some_and(|txs| {
            txs.iter().all(|tx| {
                tx.as_object().is_some_and(|tx| {
                    tx.contains_key("delegateCall") || tx.contains_key("revertOnError")
                })
            })
        });

    has("entrypoint") && has("chainId") && has("nonce") && intent_complete && transactions_canonical
}

/// Structural check for a signed bundle: a complete bundle with a non-empty
/// signature.
pub fn is_signed_bundle(candidate: &Value) -> bool {
    has_signature(candidate) && is_bundle(candidate)
}

fn has_signature(candidate: &Value) -> bool {
    candidate
        .get("signature")
        .and_then(Value::as_str)
        .is_some_and(|sig| !sig.is_empty() && sig != "0x")
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256, bytes};
    use serde_json::json;

    use super::*;

    const WALLET: Address = address!("0x1111111111111111111111111111111111111111");

    fn intended() -> IntendedBundle {
        IntendedBundle {
            bundle: Bundle::new(
                WALLET,
                vec![Transaction::call(
                    address!("0x2222222222222222222222222222222222222222"),
                    bytes!("0x1234"),
                )],
            )
            .with_nonce(U256::from(3)),
            chain_id: 1,
            intent: Intent {
                id: b256!("0x00000000000000000000000000000000000000000000000000000000000000aa"),
                wallet: WALLET,
            },
        }
    }

    #[test]
    fn intended_bundle_serializes_flat() {
        let value = serde_json::to_value(intended()).unwrap();

        assert!(value.get("entrypoint").is_some());
        assert!(value.get("chainId").is_some());
        assert!(value["intent"].get("wallet").is_some());
        assert!(is_bundle(&value));
        assert!(!is_signed_bundle(&value));
    }

    #[test]
    fn signed_bundle_is_also_a_bundle() {
        let signed = intended().into_signed(U256::from(3), bytes!("0xaabb"));
        let value = serde_json::to_value(&signed).unwrap();

        assert!(is_signed_bundle(&value));
        assert!(is_bundle(&value));
        assert_eq!(
            RelayReadyBundle::from_json(value).unwrap(),
            RelayReadyBundle::Signed(signed)
        );
    }

    #[test]
    fn empty_signature_is_not_signed() {
        let signed = intended().into_signed(U256::from(3), Bytes::new());
        let value = serde_json::to_value(&signed).unwrap();

        assert!(!is_signed_bundle(&value));
        assert!(matches!(
            RelayReadyBundle::from_json(value).unwrap(),
            RelayReadyBundle::Intended(_)
        ));
    }

    #[test]
    fn missing_intent_or_nonce_is_not_a_bundle() {
        let mut value = serde_json::to_value(intended()).unwrap();
        value.as_object_mut().unwrap().remove("nonce");
        assert!(!is_bundle(&value));

        let mut value = serde_json::to_value(intended()).unwrap();
        value["intent"].as_object_mut().unwrap().remove("id");
        assert!(!is_bundle(&value));
    }

    #[test]
    fn generic_calls_inside_are_not_a_bundle() {
        let mut value = serde_json::to_value(intended()).unwrap();
        value["transactions"] = json!([{ "to": WALLET, "data": "0x" }]);
        assert!(!is_bundle(&value));
    }

    #[test]
    fn deserializing_agrees_with_from_json() {
        let mut value = serde_json::to_value(intended()).unwrap();
        value["signature"] = json!("0x");

        let via_serde: RelayReadyBundle = serde_json::from_value(value.clone()).unwrap();
        let via_json = RelayReadyBundle::from_json(value).unwrap();

        assert!(matches!(via_serde, RelayReadyBundle::Intended(_)));
        assert_eq!(via_serde, via_json);

        let signed = intended().into_signed(U256::from(3), bytes!("0xaabb"));
        let value = serde_json::to_value(&signed).unwrap();
        let via_serde: RelayReadyBundle = serde_json::from_value(value).unwrap();
        assert_eq!(via_serde, RelayReadyBundle::Signed(signed));
    }

    #[test]
    fn incomplete_signed_candidate_falls_back_to_unsigned() {
        let signed = intended().into_signed(U256::from(3), bytes!("0xaabb"));
        let mut value = serde_json::to_value(&signed).unwrap();
        value["transactions"] = json!([{ "to": WALLET, "data": "0x" }]);

        assert!(has_signature(&value));
        assert!(!is_signed_bundle(&value));

        let relay = RelayReadyBundle::from_json(value).unwrap();
        assert!(matches!(relay, RelayReadyBundle::Unsigned(_)));
        assert!(!relay.is_signed());
    }

    #[test]
    fn signed_round_trip_restores_intended_nonce() {
        let signed = intended().into_signed(U256::from(9), bytes!("0x01"));
        assert_eq!(signed.intended().bundle.nonce, Some(U256::from(9)));
        assert_eq!(signed.wallet(), WALLET);
    }
}
