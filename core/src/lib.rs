pub mod config;
pub mod constants;
pub mod context;
pub mod digest;
pub mod intent;
pub mod normalize;
pub mod signer;
pub mod unwind;

pub use metatx_types as types;

pub use digest::{
    decode_transactions, digest, encode_transactions, guest_digest, subdigest,
    subdigest_of_transactions,
};
pub use intent::{build_execution_call, intend, intent_id, signing_subdigest};
pub use normalize::{batch_from_generic_calls, from_generic_call, from_requests};
pub use unwind::{Unwinder, unwind};
