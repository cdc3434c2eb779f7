//! Seams to the signing primitive.
//!
//! This crate only produces subdigests. Signing, verification and wallet
//! recovery are supplied by the caller through [`SubdigestSigner`] and
//! [`SubdigestVerifier`].

use alloy::primitives::{Address, B256, Bytes, U256};
use metatx_types::{BundleError, IntendedBundle, SignedBundle};

use crate::intent::signing_subdigest;

/// Produces wallet signatures over subdigests.
pub trait SubdigestSigner: Send + Sync {
    fn sign(&self, subdigest: B256) -> impl Future<Output = Result<Bytes, BundleError>> + Send;
}

/// Checks wallet signatures over subdigests.
pub trait SubdigestVerifier: Send + Sync {
    fn verify(
        &self,
        wallet: Address,
        subdigest: B256,
        signature: &Bytes,
    ) -> impl Future<Output = Result<bool, BundleError>> + Send;

    /// Wallet address implied by a signature, derived from the signing
    /// configuration it recovers to.
    fn recover_wallet(
        &self,
        subdigest: B256,
        signature: &Bytes,
    ) -> impl Future<Output = Result<Address, BundleError>> + Send;
}

/// Signs `bundle` at `nonce` and attaches the signature.
pub async fn sign<S: SubdigestSigner>(
    bundle: IntendedBundle,
    nonce: U256,
    signer: &S,
) -> Result<SignedBundle, BundleError> {
    let subdigest = signing_subdigest(&bundle, nonce);
    let signature = signer.sign(subdigest).await?;

    tracing::debug!(
        wallet = %bundle.intent.wallet,
        chain_id = bundle.chain_id,
        %subdigest,
        "Bundle signed"
    );

    Ok(bundle.into_signed(nonce, signature))
}

/// Verifies a signed bundle against the wallet it was intended for.
///
/// Fails with [`BundleError::StateMismatch`] when the signature recovers to a
/// different wallet than `intent.wallet`.
pub async fn verify_signed_bundle<V: SubdigestVerifier>(
    bundle: &SignedBundle,
    verifier: &V,
) -> Result<bool, BundleError> {
    let subdigest = signing_subdigest(&bundle.intended(), bundle.nonce);

    let recovered = verifier.recover_wallet(subdigest, &bundle.signature).await?;
    if recovered != bundle.intent.wallet {
        tracing::warn!(
            expected = %bundle.intent.wallet,
            %recovered,
            "Signature recovers to a different wallet"
        );
        return Err(BundleError::StateMismatch {
            expected: bundle.intent.wallet,
            recovered,
        });
    }

    verifier
        .verify(bundle.intent.wallet, subdigest, &bundle.signature)
        .await
}
