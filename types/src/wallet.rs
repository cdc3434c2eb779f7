//! ABI of the wallet main module: the canonical transaction tuple and the
//! entry points relayers and signers have to stay bit-compatible with.

use alloy::sol;

sol! {
    /// Wire form of a wallet transaction.
    ///
    /// Field order is the contract with the on-chain decoder and must not change.
    #[derive(Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
    struct EncodedTransaction {
        bool delegateCall;
        bool revertOnError;
        uint256 gasLimit;
        address target;
        uint256 value;
        bytes data;
    }

    function execute(EncodedTransaction[] _txs, uint256 _nonce, bytes _signature) external;
    function selfExecute(EncodedTransaction[] _txs) external;
    function createContract(bytes _code) external payable returns (address);
}

/// Selector of `selfExecute((bool,bool,uint256,address,uint256,bytes)[])`.
pub const SELF_EXECUTE_SELECTOR: [u8; 4] = <selfExecuteCall as alloy::sol_types::SolCall>::SELECTOR;

/// Selector of `execute((bool,bool,uint256,address,uint256,bytes)[],uint256,bytes)`.
pub const EXECUTE_SELECTOR: [u8; 4] = <executeCall as alloy::sol_types::SolCall>::SELECTOR;
