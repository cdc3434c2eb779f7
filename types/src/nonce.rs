//! Nonce spaces.
//!
//! A wallet nonce is a single 256-bit word holding a 160-bit space in its
//! upper bits and a 96-bit counter in its lower bits. Independent signers pick
//! different spaces so their counters never collide; the wallet only enforces
//! monotonicity within a space.

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{defs::U256Def, error::BundleError};

/// Bit width of the counter half of a nonce.
pub const NONCE_COUNTER_BITS: usize = 96;

/// Bit width of the space half of a nonce.
pub const NONCE_SPACE_BITS: usize = 160;

/// A decoded `(space, counter)` pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SpacedNonce {
    #[schema(value_type = U256Def)]
    pub space: U256,
    #[schema(value_type = U256Def)]
    pub counter: U256,
}

impl SpacedNonce {
    pub fn new(space: U256, counter: U256) -> Self {
        Self { space, counter }
    }

    pub fn encode(&self) -> Result<U256, BundleError> {
        encode_nonce(self.space, self.counter)
    }

    pub fn decode(nonce: U256) -> Self {
        let (space, counter) = decode_nonce(nonce);
        Self { space, counter }
    }
}

/// Packs `counter + space * 2^96`.
///
/// Fails with a range error if `counter` already has bits at or above bit 96,
/// which is what a value that was encoded once before looks like.
pub fn encode_nonce(space: U256, counter: U256) -> Result<U256, BundleError> {
    if counter >> NONCE_COUNTER_BITS != U256::ZERO {
        return Err(BundleError::range("space already encoded"));
    }

    if space >> NONCE_SPACE_BITS != U256::ZERO {
        return Err(BundleError::range(format!(
            "nonce space {space} does not fit in {NONCE_SPACE_BITS} bits"
        )));
    }

    Ok((space << NONCE_COUNTER_BITS) | counter)
}

/// Splits a nonce into `(space, counter)`. Total.
pub fn decode_nonce(nonce: U256) -> (U256, U256) {
    let counter_mask = (U256::from(1) << NONCE_COUNTER_BITS) - U256::from(1);
    (nonce >> NONCE_COUNTER_BITS, nonce & counter_mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn max_of(bits: usize) -> U256 {
        (U256::from(1) << bits) - U256::from(1)
    }

    #[test]
    fn encode_places_space_above_counter() {
        let nonce = encode_nonce(U256::from(1), U256::from(5)).unwrap();
        assert_eq!(nonce, (U256::from(1) << 96) + U256::from(5));
    }

    #[test]
    fn decode_inverts_encode_at_the_edges() {
        let cases = [
            (U256::ZERO, U256::ZERO),
            (U256::ZERO, max_of(NONCE_COUNTER_BITS)),
            (max_of(NONCE_SPACE_BITS), U256::ZERO),
            (max_of(NONCE_SPACE_BITS), max_of(NONCE_COUNTER_BITS)),
            (U256::from(0xdead_beef_u64), U256::from(42)),
        ];

        for (space, counter) in cases {
            let nonce = encode_nonce(space, counter).unwrap();
            assert_eq!(decode_nonce(nonce), (space, counter));
            assert_eq!(SpacedNonce::decode(nonce), SpacedNonce::new(space, counter));
        }
    }

    #[test]
    fn double_encoding_is_rejected() {
        let once = encode_nonce(U256::from(3), U256::from(1)).unwrap();
        let err = encode_nonce(U256::from(3), once).unwrap_err();

        assert_eq!(err, BundleError::range("space already encoded"));
    }

    #[test]
    fn counter_of_exactly_two_pow_96_is_rejected() {
        let err = encode_nonce(U256::ZERO, U256::from(1) << 96).unwrap_err();
        assert!(matches!(err, BundleError::RangeError { .. }));
    }

    #[test]
    fn oversized_space_is_rejected() {
        let err = encode_nonce(U256::from(1) << 160, U256::ZERO).unwrap_err();
        assert!(matches!(err, BundleError::RangeError { .. }));
    }

    #[test]
    fn decode_is_total() {
        let (space, counter) = decode_nonce(U256::MAX);
        assert_eq!(space, max_of(NONCE_SPACE_BITS));
        assert_eq!(counter, max_of(NONCE_COUNTER_BITS));
    }
}
