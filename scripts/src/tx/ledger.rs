//! The ledger seen by the deployment coordinator

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes, TxHash},
    providers::{PendingTransactionBuilder, Provider, WalletProvider},
    rpc::types::eth::TransactionRequest,
};
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::{
    config::NetworkConfig,
    deploy::predict::predict_contract_address,
    errors::ScriptError,
    tx::client::{create_rpc_provider, RpcProvider},
};

/// What the ledger reports once a deployment transaction is included
#[derive(Clone, Debug, PartialEq)]
pub struct DeploymentReceipt {
    /// Hash of the deployment transaction
    pub tx_hash: TxHash,
    /// Block including the transaction
    pub block_number: Option<u64>,
    /// Address of the created contract
    pub contract_address: Option<Address>,
    /// Whether the constructor executed successfully
    pub success: bool,
}

/// Transport used to publish contracts
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Chain id reported by the ledger
    async fn chain_id(&self) -> Result<u64, ScriptError>;

    /// Submit a contract creation transaction carrying `code`
    async fn submit_deployment(&self, unit: &str, code: Bytes) -> Result<TxHash, ScriptError>;

    /// Wait until the transaction is included and return its receipt
    async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt, ScriptError>;
}

/// A [`Ledger`] reached over JSON-RPC
pub struct RpcLedger {
    /// Signing provider
    client: RpcProvider,
}

impl RpcLedger {
    /// Wrap an existing provider
    pub fn new(client: RpcProvider) -> Self {
        RpcLedger { client }
    }

    /// Build the provider described by `config`
    pub fn connect(config: &NetworkConfig) -> Result<Self, ScriptError> {
        info!("Connecting to {} at {}", config.network, config.rpc_url);
        Ok(RpcLedger::new(create_rpc_provider(config)?))
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn chain_id(&self) -> Result<u64, ScriptError> {
        self.client
            .get_chain_id()
            .await
            .map_err(|e| ScriptError::Transport(e.to_string()))
    }

    async fn submit_deployment(&self, unit: &str, code: Bytes) -> Result<TxHash, ScriptError> {
        let deployer = self.client.default_signer_address();
        match predict_contract_address(&self.client, deployer).await {
            Ok(expected) => debug!("{} should land at {:#x}", unit, expected),
            Err(e) => warn!("Could not predict the address of {}: {}", unit, e),
        }

        // Build the tx
        let tx_request = TransactionRequest::default()
            .with_from(deployer)
            .with_deploy_code(code);

        // Send it
        let pending_tx = self
            .client
            .send_transaction(tx_request)
            .await
            .map_err(|e| ScriptError::Transport(e.to_string()))?;
        Ok(*pending_tx.tx_hash())
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt, ScriptError> {
        // Wait for the transaction to be included.
        let receipt = PendingTransactionBuilder::new(self.client.root(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::Transport(e.to_string()))?;

        Ok(DeploymentReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            contract_address: receipt.contract_address,
            success: receipt.status(),
        })
    }
}
