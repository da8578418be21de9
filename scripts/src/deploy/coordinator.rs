//! Sequential execution of a [`DeploymentPlan`]

use tracing::{info, warn};

use crate::{
    config::NetworkConfig,
    deploy::plan::{DeployedPlan, DeployedUnit, DeploymentPlan, DeploymentUnit},
    errors::ScriptError,
    tx::ledger::Ledger,
};

/// Deploys the units of a plan one after the other, feeding each address forward
pub struct DeploymentCoordinator<'a, L: Ledger> {
    /// Configuration of the target network
    config: &'a NetworkConfig,
    /// Transport to the target network
    ledger: &'a L,
}

impl<'a, L: Ledger> DeploymentCoordinator<'a, L> {
    /// Create a coordinator deploying to `ledger`, expected to match `config`
    pub fn new(config: &'a NetworkConfig, ledger: &'a L) -> Self {
        DeploymentCoordinator { config, ledger }
    }

    /// Execute every unit of `plan` in order.
    ///
    /// Unit `i + 1` is only resolved once unit `i` is confirmed. The first failure aborts the
    /// sequence; units already confirmed stay on chain and are reported in the error.
    pub async fn execute(&self, plan: &DeploymentPlan) -> Result<DeployedPlan, ScriptError> {
        // An unreachable ledger fails the first stage
        let chain_id = match self.ledger.chain_id().await {
            Ok(chain_id) => chain_id,
            Err(cause) => match plan.units().first() {
                Some(first) => {
                    warn!("Stage 1 ({}) failed, ledger unreachable", first.name);
                    return Err(ScriptError::StageFailed {
                        index: 1,
                        stage: first.name.clone(),
                        cause: Box::new(cause),
                        deployed: Vec::new(),
                    });
                }
                None => return Err(cause),
            },
        };
        if chain_id != self.config.chain_id {
            return Err(ScriptError::Configuration(format!(
                "{} is configured with chain id {} but the node reports {}",
                self.config.network, self.config.chain_id, chain_id
            )));
        }
        info!("Deploying {} contracts on chain {}", plan.len(), chain_id);

        let mut deployed: Vec<DeployedUnit> = Vec::with_capacity(plan.len());
        for (index, unit) in plan.units().iter().enumerate() {
            match self.deploy_unit(unit, &deployed).await {
                Ok(done) => deployed.push(done),
                Err(cause) => {
                    warn!("Stage {} ({}) failed, aborting", index + 1, unit.name);
                    return Err(ScriptError::StageFailed {
                        index: index + 1,
                        stage: unit.name.clone(),
                        cause: Box::new(cause),
                        deployed,
                    });
                }
            }
        }

        Ok(DeployedPlan { units: deployed })
    }

    /// Deploy a single unit, once all of its predecessors are confirmed
    async fn deploy_unit(
        &self,
        unit: &DeploymentUnit,
        deployed: &[DeployedUnit],
    ) -> Result<DeployedUnit, ScriptError> {
        let args = unit.resolve_args(deployed)?;
        info!("Deploying {} ({})...", unit.name, unit.artifact.name);

        let tx_hash = self
            .ledger
            .submit_deployment(&unit.name, unit.deploy_code(&args))
            .await?;
        info!("Pending deployment transaction... {}", tx_hash);

        let receipt = self.ledger.confirm(tx_hash).await?;
        if !receipt.success {
            return Err(ScriptError::DeploymentRejected {
                unit: unit.name.clone(),
                reason: format!("transaction {} reverted", receipt.tx_hash),
            });
        }
        let address = receipt
            .contract_address
            .filter(|address| !address.is_zero())
            .ok_or_else(|| ScriptError::DeploymentRejected {
                unit: unit.name.clone(),
                reason: format!("transaction {} created no contract", receipt.tx_hash),
            })?;

        match receipt.block_number {
            Some(block) => info!("{} deployed at {:#x} on block {}", unit.name, address, block),
            None => info!("{} deployed at {:#x}", unit.name, address),
        }

        Ok(DeployedUnit {
            name: unit.name.clone(),
            artifact: unit.artifact.name.clone(),
            constructor_args: args,
            address,
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }
}
