//! A scripted in-memory ledger for tests

use std::{collections::HashMap, sync::Mutex};

use alloy::primitives::{address, keccak256, Address, Bytes, TxHash};
use async_trait::async_trait;

use crate::{
    deploy::predict::contract_address_from,
    errors::ScriptError,
    tx::ledger::{DeploymentReceipt, Ledger},
};

/// Account the mock pretends to deploy from
pub const MOCK_DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// How a scripted stage fails
#[derive(Clone, Copy, Debug)]
pub enum Failure {
    /// The submission never reaches the ledger
    Transport,
    /// The constructor reverts
    Revert,
    /// The receipt carries no contract address
    NoContract,
}

/// What the mock saw so far
#[derive(Default)]
struct State {
    /// Nonce of the next deployment
    nonce: u64,
    /// Submissions as `(unit, code)`
    submissions: Vec<(String, Bytes)>,
    /// Confirmed count at the time of each submission
    confirmations_at_submission: Vec<usize>,
    /// Submitted but not yet confirmed, with their nonce
    pending: HashMap<TxHash, (String, u64)>,
    /// Addresses handed out so far
    confirmed: Vec<Address>,
}

/// Ledger handing out `CREATE` addresses of [`MOCK_DEPLOYER`], failing where scripted
pub struct MockLedger {
    /// Reported chain id
    chain_id: u64,
    /// Whether every request fails at the transport level
    unreachable: bool,
    /// Scripted failures, by unit name
    failures: HashMap<String, Failure>,
    /// Mutable bookkeeping
    state: Mutex<State>,
}

impl MockLedger {
    /// A ledger reporting `chain_id` that never fails
    pub fn new(chain_id: u64) -> Self {
        MockLedger {
            chain_id,
            unreachable: false,
            failures: HashMap::new(),
            state: Mutex::new(State::default()),
        }
    }

    /// Refuse every connection
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Script a failure for the stage named `unit`
    pub fn fail_on(mut self, unit: &str, failure: Failure) -> Self {
        self.failures.insert(unit.to_string(), failure);
        self
    }

    /// Every submission, in order, as `(unit, code)`
    pub fn submissions(&self) -> Vec<(String, Bytes)> {
        self.state.lock().unwrap().submissions.clone()
    }

    /// Addresses handed out by successful confirmations, in order
    pub fn confirmed_addresses(&self) -> Vec<Address> {
        self.state.lock().unwrap().confirmed.clone()
    }

    /// How many confirmations had happened when submission `index` was made
    pub fn confirmations_before_submission(&self, index: usize) -> usize {
        self.state.lock().unwrap().confirmations_at_submission[index]
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn chain_id(&self) -> Result<u64, ScriptError> {
        if self.unreachable {
            return Err(ScriptError::Transport("connection refused".into()));
        }
        Ok(self.chain_id)
    }

    async fn submit_deployment(&self, unit: &str, code: Bytes) -> Result<TxHash, ScriptError> {
        let mut state = self.state.lock().unwrap();
        let confirmed = state.confirmed.len();
        state.submissions.push((unit.to_string(), code));
        state.confirmations_at_submission.push(confirmed);

        if let Some(Failure::Transport) = self.failures.get(unit) {
            return Err(ScriptError::Transport("connection refused".into()));
        }

        let nonce = state.nonce;
        state.nonce += 1;
        let tx_hash = keccak256(nonce.to_be_bytes());
        state.pending.insert(tx_hash, (unit.to_string(), nonce));
        Ok(tx_hash)
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<DeploymentReceipt, ScriptError> {
        let mut state = self.state.lock().unwrap();
        let (unit, nonce) = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| ScriptError::Transport(format!("unknown transaction {tx_hash}")))?;

        let receipt = DeploymentReceipt {
            tx_hash,
            block_number: Some(nonce + 1),
            contract_address: Some(contract_address_from(MOCK_DEPLOYER, nonce)),
            success: true,
        };
        let receipt = match self.failures.get(&unit) {
            Some(Failure::Revert) => DeploymentReceipt {
                success: false,
                contract_address: None,
                ..receipt
            },
            Some(Failure::NoContract) => DeploymentReceipt {
                contract_address: None,
                ..receipt
            },
            _ => receipt,
        };

        if let Some(address) = receipt.contract_address.filter(|_| receipt.success) {
            state.confirmed.push(address);
        }
        Ok(receipt)
    }
}
