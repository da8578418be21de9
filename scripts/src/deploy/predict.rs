use alloy::{
    primitives::{keccak256, Address},
    providers::Provider,
};
use ethers::{prelude::U256, utils::rlp};

use crate::{errors::ScriptError, tx::client::RpcProvider};

/// Predict the address of the next contract created by `deployer`
pub async fn predict_contract_address(
    client: &RpcProvider,
    deployer: Address,
) -> Result<Address, ScriptError> {
    // Get the signer nonce
    let nonce = client
        .get_transaction_count(deployer)
        .await
        .map_err(|e| ScriptError::NonceFetching(e.to_string()))?;

    Ok(contract_address_from(deployer, nonce))
}

/// Address of the contract created by `deployer` with the given `nonce`,
/// i.e. the last 20 bytes of `keccak256(rlp([deployer, nonce]))`
pub fn contract_address_from(deployer: Address, nonce: u64) -> Address {
    // Ethers RLP
    let mut stream = rlp::RlpStream::new();
    stream.begin_list(2);
    stream.append(&deployer.to_vec());
    stream.append(&U256::from(nonce));
    let hash = keccak256(stream.out());

    Address::from_slice(&hash[12..])
}
