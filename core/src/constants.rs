use alloy::primitives::{Address, address};

/// Wallet v1 guest module, deployed at the same address on every supported chain.
pub const DEFAULT_GUEST_MODULE_ADDRESS: Address =
    address!("0x02390F3E6E5FD1C6786CB78FD3027C117a9955A7");

/// Wallet v1 main module.
pub const DEFAULT_MAIN_MODULE_ADDRESS: Address =
    address!("0xd01F11855bCcb95f88D7A48492F66410d4637313");

/// Wallet v1 factory.
pub const DEFAULT_FACTORY_ADDRESS: Address =
    address!("0xf9D09D634Fb818b05149329C1dcCFAeA53639d96");

/// Label mixed into guest-module digests so they never collide with wallet digests.
pub const GUEST_DIGEST_LABEL: &str = "guest:";

/// Prefix of the subdigest preimage, as EIP-191 version 0x01.
pub const SUBDIGEST_PREFIX: [u8; 2] = [0x19, 0x01];

/// Deepest nesting of self-batching calls the unwinder accepts by default.
pub const DEFAULT_MAX_UNWIND_DEPTH: usize = 32;
