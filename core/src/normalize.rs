//! Turning arbitrary call requests into wallet transactions.

use alloy::{primitives::Address, sol_types::SolCall};
use metatx_types::{
    CallRequest, GenericCall, NormalizedCall, Transaction, wallet::createContractCall,
};

/// Normalizes a generic call for execution by `wallet`.
///
/// Contract creations (no `to`, or the zero address) are routed through the
/// wallet's `createContract` entry point so the wallet, not the relayer, ends
/// up as the deployer.
pub fn from_generic_call(wallet: Address, call: &GenericCall) -> NormalizedCall {
    let transaction = match call.to {
        Some(to) if to != Address::ZERO => Transaction {
            to,
            value: call.value.unwrap_or_default(),
            data: call.data.clone(),
            gas_limit: call.gas_limit,
            delegate_call: false,
            revert_on_error: false,
        },
        _ => {
            tracing::debug!(
                wallet = %wallet,
                code_len = call.data.len(),
                "Routing contract creation through wallet"
            );

            let data = createContractCall {
                _code: call.data.clone(),
            }
            .abi_encode();

            Transaction {
                to: wallet,
                value: call.value.unwrap_or_default(),
                data: data.into(),
                gas_limit: call.gas_limit,
                delegate_call: false,
                revert_on_error: false,
            }
        }
    };

    NormalizedCall {
        nonce: call.nonce,
        transaction,
    }
}

/// Element-wise [`from_generic_call`].
pub fn batch_from_generic_calls(wallet: Address, calls: &[GenericCall]) -> Vec<NormalizedCall> {
    calls
        .iter()
        .map(|call| from_generic_call(wallet, call))
        .collect()
}

/// Canonical transactions for a mixed list of requests. Requests that are
/// already transactions pass through untouched.
pub fn from_requests(wallet: Address, requests: &[CallRequest]) -> Vec<Transaction> {
    requests
        .iter()
        .map(|request| match request {
            CallRequest::Transaction(tx) => tx.clone(),
            CallRequest::Generic(call) => from_generic_call(wallet, call).transaction,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{Bytes, U256, address, bytes};

    use super::*;

    const WALLET: Address = address!("0x1111111111111111111111111111111111111111");
    const TARGET: Address = address!("0x2222222222222222222222222222222222222222");

    #[test]
    fn direct_call_keeps_target_and_payload() {
        let call = GenericCall {
            to: Some(TARGET),
            value: Some(U256::from(5)),
            data: bytes!("0xabcd"),
            gas_limit: Some(U256::from(50_000)),
            nonce: Some(U256::from(8)),
        };

        let normalized = from_generic_call(WALLET, &call);

        assert_eq!(normalized.nonce, Some(U256::from(8)));
        assert_eq!(
            normalized.transaction,
            Transaction::call(TARGET, bytes!("0xabcd"))
                .with_value(U256::from(5))
                .with_gas_limit(U256::from(50_000))
        );
    }

    #[test]
    fn zero_target_becomes_wallet_create_contract() {
        let bytecode = bytes!("0x6080604052");
        let call = GenericCall {
            to: Some(Address::ZERO),
            data: bytecode.clone(),
            ..Default::default()
        };

        let tx = from_generic_call(WALLET, &call).transaction;

        assert_eq!(tx.to, WALLET);
        assert!(!tx.delegate_call);
        assert!(!tx.revert_on_error);
        assert_eq!(
            tx.data,
            Bytes::from(createContractCall { _code: bytecode.clone() }.abi_encode())
        );

        let decoded = createContractCall::abi_decode(&tx.data).unwrap();
        assert_eq!(decoded._code, bytecode);
    }

    #[test]
    fn missing_target_is_also_contract_creation() {
        let call = GenericCall {
            data: bytes!("0x00"),
            ..Default::default()
        };
        assert_eq!(from_generic_call(WALLET, &call).transaction.to, WALLET);
    }

    #[test]
    fn mixed_requests_only_normalize_generic_ones() {
        let canonical = Transaction::call(TARGET, Bytes::new()).with_delegate_call(true);
        let requests = vec![
            CallRequest::from(canonical.clone()),
            CallRequest::from(GenericCall {
                to: Some(TARGET),
                ..Default::default()
            }),
        ];

        let txs = from_requests(WALLET, &requests);
        assert_eq!(txs, vec![canonical, Transaction::call(TARGET, Bytes::new())]);
    }

    #[test]
    fn batch_preserves_order() {
        let calls = vec![
            GenericCall {
                to: Some(TARGET),
                ..Default::default()
            },
            GenericCall::default(),
        ];

        let normalized = batch_from_generic_calls(WALLET, &calls);
        assert_eq!(normalized[0].transaction.to, TARGET);
        assert_eq!(normalized[1].transaction.to, WALLET);
    }
}
