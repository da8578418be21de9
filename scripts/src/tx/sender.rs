use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash, U256},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
};
use tracing::info;

use crate::{
    errors::ScriptError,
    tx::{abi::IDocumentState::addUserCall, client::RpcProvider},
};

/// Register a user with the given role on the document registry
pub async fn send_add_user(
    contract: Address,
    user_name: String,
    role: String,
    client: &RpcProvider,
) -> Result<TxHash, ScriptError> {
    // Build the tx
    let tx_request = TransactionRequest::default()
        .to(contract)
        .with_call(&addUserCall {
            userName: user_name,
            role,
        })
        .with_value(U256::from(0));

    // Send it
    let pending_tx = client
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    info!("Pending add user transaction... {}", pending_tx.tx_hash());

    // Wait for the transaction to be included.
    let receipt = pending_tx
        .get_receipt()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if !receipt.status() {
        return Err(ScriptError::ContractInteraction(format!(
            "add user transaction {} reverted",
            receipt.transaction_hash
        )));
    }
    info!(
        "Add user tx done on block: {}",
        receipt.block_number.unwrap_or_default()
    );

    Ok(receipt.transaction_hash)
}
