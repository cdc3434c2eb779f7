pub mod bundle;
pub mod defs;
pub mod error;
pub mod nonce;
pub mod transaction;
pub mod wallet;

pub use bundle::{
    Bundle, IntendedBundle, Intent, RelayReadyBundle, SignedBundle, is_bundle, is_signed_bundle,
};
pub use error::BundleError;
pub use nonce::{SpacedNonce, decode_nonce, encode_nonce};
pub use transaction::{
    CallRequest, GenericCall, NormalizedCall, Transaction, from_canonical, to_canonical,
};
pub use wallet::EncodedTransaction;
