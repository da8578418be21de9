use alloy::{primitives::Address, providers::Provider};

use crate::{errors::ScriptError, tx::client::RpcProvider};

/// Chain id and head of the connected network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Chain id reported by the node
    pub chain_id: u64,
    /// Latest block number
    pub block_number: u64,
}

/// Fetch the chain id and latest block of the connected network
pub async fn get_network_info(client: &RpcProvider) -> Result<NetworkInfo, ScriptError> {
    let chain_id = client
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::Transport(e.to_string()))?;
    let block_number = client
        .get_block_number()
        .await
        .map_err(|e| ScriptError::Transport(e.to_string()))?;

    Ok(NetworkInfo {
        chain_id,
        block_number,
    })
}

/// Whether some contract code lives at `address`
pub async fn has_code(address: Address, client: &RpcProvider) -> Result<bool, ScriptError> {
    let code = client
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(!code.is_empty())
}
