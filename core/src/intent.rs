//! Bundle lifecycle: `Bundle -> IntendedBundle -> SignedBundle`, and the
//! calldata relayers submit.

use alloy::{
    primitives::{Address, B256, Bytes, ChainId, U256, keccak256},
    sol_types::{SolCall, SolValue},
};
use metatx_types::{
    Bundle, IntendedBundle, Intent, RelayReadyBundle, SignedBundle, to_canonical,
    wallet::executeCall,
};

use crate::digest;

/// Binds `bundle` to a wallet on a chain under the caller's correlation `id`.
pub fn intend(bundle: Bundle, wallet: Address, chain_id: ChainId, id: B256) -> IntendedBundle {
    IntendedBundle {
        bundle,
        chain_id,
        intent: Intent { id, wallet },
    }
}

/// Correlation id of an intended bundle: `keccak256(abi.encode(wallet, chainId, intent.id))`.
///
/// Used to track a bundle through asynchronous relay flows. It is not what
/// gets signed.
pub fn intent_id(bundle: &IntendedBundle) -> B256 {
    keccak256(
        (
            bundle.intent.wallet,
            U256::from(bundle.chain_id),
            bundle.intent.id,
        )
            .abi_encode(),
    )
}

/// Subdigest the wallet's signers must sign for `bundle` at `nonce`.
pub fn signing_subdigest(bundle: &IntendedBundle, nonce: U256) -> B256 {
    digest::subdigest_of_transactions(
        bundle.intent.wallet,
        bundle.chain_id,
        nonce,
        &bundle.bundle.transactions,
    )
}

/// Calldata for the entrypoint's `execute(txs, nonce, signature)`.
///
/// Signed bundles pass their nonce and signature. Anything else is encoded
/// with a zero nonce and an empty signature, which only a guest module
/// accepts.
pub fn build_execution_call(bundle: &RelayReadyBundle) -> Bytes {
    let call = match bundle {
        RelayReadyBundle::Signed(signed) => signed_execute_call(signed),
        unsigned => {
            tracing::debug!(
                entrypoint = %unsigned.entrypoint(),
                "Encoding unsigned bundle for guest execution"
            );
            executeCall {
                _txs: to_canonical(unsigned.transactions()),
                _nonce: U256::ZERO,
                _signature: Bytes::new(),
            }
        }
    };

    call.abi_encode().into()
}

fn signed_execute_call(signed: &SignedBundle) -> executeCall {
    executeCall {
        _txs: to_canonical(&signed.transactions),
        _nonce: signed.nonce,
        _signature: signed.signature.clone(),
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, b256, bytes};
    use metatx_types::Transaction;

    use super::*;

    const WALLET: Address = address!("0x1111111111111111111111111111111111111111");
    const ID: B256 = b256!("0x00000000000000000000000000000000000000000000000000000000000000aa");

    fn bundle() -> Bundle {
        Bundle::new(
            WALLET,
            vec![Transaction::call(
                address!("0x2222222222222222222222222222222222222222"),
                bytes!("0x1234"),
            )],
        )
    }

    #[test]
    fn intend_only_augments() {
        let original = bundle();
        let intended = intend(original.clone(), WALLET, 10, ID);

        assert_eq!(intended.bundle, original);
        assert_eq!(intended.chain_id, 10);
        assert_eq!(intended.intent, Intent { id: ID, wallet: WALLET });
    }

    #[test]
    fn intent_id_matches_abi_encoding() {
        let intended = intend(bundle(), WALLET, 10, ID);

        let mut preimage = Vec::new();
        preimage.extend_from_slice(&[0u8; 12]);
        preimage.extend_from_slice(WALLET.as_slice());
        preimage.extend_from_slice(&U256::from(10).to_be_bytes::<32>());
        preimage.extend_from_slice(ID.as_slice());

        assert_eq!(intent_id(&intended), keccak256(preimage));
    }

    #[test]
    fn intent_id_is_not_the_signing_subdigest() {
        let intended = intend(bundle(), WALLET, 10, ID);
        assert_ne!(intent_id(&intended), signing_subdigest(&intended, U256::ZERO));
    }

    #[test]
    fn intent_id_depends_on_chain() {
        assert_ne!(
            intent_id(&intend(bundle(), WALLET, 1, ID)),
            intent_id(&intend(bundle(), WALLET, 2, ID))
        );
    }

    #[test]
    fn signed_execution_call_carries_nonce_and_signature() {
        let signed = intend(bundle(), WALLET, 1, ID).into_signed(U256::from(4), bytes!("0xbeef"));
        let data = build_execution_call(&signed.clone().into());

        let call = executeCall::abi_decode(&data).unwrap();
        assert_eq!(call._nonce, U256::from(4));
        assert_eq!(call._signature, bytes!("0xbeef"));
        assert_eq!(call._txs, to_canonical(&signed.transactions));
    }

    #[test]
    fn unsigned_execution_call_is_guest_shaped() {
        for bundle in [
            RelayReadyBundle::from(bundle()),
            RelayReadyBundle::from(intend(bundle(), WALLET, 1, ID)),
        ] {
            let call = executeCall::abi_decode(&build_execution_call(&bundle)).unwrap();
            assert_eq!(call._nonce, U256::ZERO);
            assert!(call._signature.is_empty());
            assert_eq!(call._txs, to_canonical(bundle.transactions()));
        }
    }
}
