//! Canonical bundle encoding and the digests signers sign.

use alloy::{
    primitives::{Address, B256, Bytes, ChainId, U256, keccak256},
    sol_types::SolValue,
};
use metatx_types::{BundleError, EncodedTransaction, Transaction, to_canonical};

use crate::constants::{GUEST_DIGEST_LABEL, SUBDIGEST_PREFIX};

/// `abi.encode(uint256 nonce, EncodedTransaction[] txs)` with every default applied.
///
/// Must match the wallet decoder byte for byte.
pub fn encode_transactions(nonce: U256, transactions: &[Transaction]) -> Bytes {
    (nonce, to_canonical(transactions)).abi_encode_params().into()
}

/// Inverse of [`encode_transactions`].
pub fn decode_transactions(data: &[u8]) -> Result<(U256, Vec<EncodedTransaction>), BundleError> {
    <(U256, Vec<EncodedTransaction>)>::abi_decode_params(data)
        .map_err(|e| BundleError::encoding(format!("invalid meta transaction data: {e}")))
}

/// Content digest of a bundle: `keccak256(encode_transactions(nonce, txs))`.
pub fn digest(nonce: U256, transactions: &[Transaction]) -> B256 {
    keccak256(encode_transactions(nonce, transactions))
}

/// Binds `digest` to one wallet on one chain.
///
/// `keccak256("\x19\x01" ++ uint256(chain_id) ++ wallet ++ digest)`, tightly packed.
/// This is the value the wallet's signers actually sign.
pub fn subdigest(wallet: Address, chain_id: ChainId, digest: B256) -> B256 {
    let preimage = [
        &SUBDIGEST_PREFIX[..],
        &U256::from(chain_id).to_be_bytes::<32>()[..],
        wallet.as_slice(),
        digest.as_slice(),
    ]
    .concat();

    keccak256(preimage)
}

/// [`subdigest`] of the [`digest`] of `(nonce, transactions)`.
pub fn subdigest_of_transactions(
    wallet: Address,
    chain_id: ChainId,
    nonce: U256,
    transactions: &[Transaction],
) -> B256 {
    subdigest(wallet, chain_id, digest(nonce, transactions))
}

/// Subdigest for execution through a guest module, which has no nonce and no
/// signature. The content hash is taken over
/// `abi.encode(string "guest:", EncodedTransaction[] txs)`.
pub fn guest_digest(guest_module: Address, chain_id: ChainId, transactions: &[Transaction]) -> B256 {
    let content = (GUEST_DIGEST_LABEL.to_string(), to_canonical(transactions)).abi_encode_params();
    subdigest(guest_module, chain_id, keccak256(content))
}
