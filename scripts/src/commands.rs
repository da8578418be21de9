//! Implementations of the CLI commands

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    build::compile::ArtifactBuilder,
    cli::{AddUserArgs, DeployContractsArgs},
    config::{Network, NetworkConfig, Overrides},
    deploy::{
        coordinator::DeploymentCoordinator,
        plan::{DeployedPlan, DeployedUnit, DeploymentPlan},
        registry::{registry_plan_from, RegistryArtifacts},
    },
    errors::ScriptError,
    output_writer::{
        descriptor_path, read_contract_descriptor, write_contract_descriptor, write_output_file,
        OutputKeys,
    },
    tx::{
        client::create_rpc_provider,
        ledger::{Ledger, RpcLedger},
        reader::{get_network_info, has_code},
        sender::send_add_user,
    },
};

/// Deploy the registry contracts and record where they landed
pub async fn deploy_contracts(
    args: DeployContractsArgs,
    network: Network,
    overrides: &Overrides,
) -> Result<DeployedPlan, ScriptError> {
    deploy_contracts_with(
        args,
        network,
        overrides,
        |key| std::env::var(key).ok(),
        RpcLedger::connect,
    )
    .await
}

/// [`deploy_contracts`] against the ledger returned by `connect`.
///
/// The configuration is resolved before anything is compiled or loaded.
pub async fn deploy_contracts_with<F, C, L>(
    args: DeployContractsArgs,
    network: Network,
    overrides: &Overrides,
    lookup: F,
    connect: C,
) -> Result<DeployedPlan, ScriptError>
where
    F: Fn(&str) -> Option<String>,
    C: FnOnce(&NetworkConfig) -> Result<L, ScriptError>,
    L: Ledger,
{
    let config = NetworkConfig::resolve(network, overrides, lookup)?;

    // Build the contracts
    let mut builder = ArtifactBuilder::new(args.framework, &args.project_dir);
    if let Some(dir) = &args.artifacts_dir {
        builder = builder.with_artifacts_dir(dir);
    }
    if args.compile {
        info!("Compiling contracts in {}...", builder.project_dir().display());
        builder.compile()?;
        info!("Compiled with success");
    }
    let artifacts = RegistryArtifacts::load(
        &builder,
        &args.role_artifact,
        &args.user_artifact,
        &args.document_artifact,
    )?;
    let plan = registry_plan_from(artifacts)?;

    // Deploy them
    let result = execute_on(&config, &plan, connect).await;

    // Whatever made it on chain is recorded, even when a later stage failed
    match &result {
        Ok(deployed) => {
            record_deployment(&args.out_dir, network, &plan, &deployed.units)?;
            info!("Deployed with success");
        }
        Err(ScriptError::StageFailed { deployed, .. }) if !deployed.is_empty() => {
            warn!("Recording the {} contracts deployed before the failure", deployed.len());
            // The stage failure is what gets reported
            if let Err(e) = record_deployment(&args.out_dir, network, &plan, deployed) {
                warn!("Could not record the partial deployment: {}", e);
            }
        }
        Err(_) => {}
    }

    result
}

/// Resolve the configuration of `network`, connect to it and execute `plan`.
///
/// Configuration problems surface before `connect` is called.
pub async fn deploy_plan_on<F, C, L>(
    network: Network,
    overrides: &Overrides,
    lookup: F,
    plan: &DeploymentPlan,
    connect: C,
) -> Result<DeployedPlan, ScriptError>
where
    F: Fn(&str) -> Option<String>,
    C: FnOnce(&NetworkConfig) -> Result<L, ScriptError>,
    L: Ledger,
{
    let config = NetworkConfig::resolve(network, overrides, lookup)?;
    execute_on(&config, plan, connect).await
}

/// Connect to the network of `config` and execute `plan` there
async fn execute_on<C, L>(
    config: &NetworkConfig,
    plan: &DeploymentPlan,
    connect: C,
) -> Result<DeployedPlan, ScriptError>
where
    C: FnOnce(&NetworkConfig) -> Result<L, ScriptError>,
    L: Ledger,
{
    let ledger = connect(config)?;

    DeploymentCoordinator::new(config, &ledger)
        .execute(plan)
        .await
}

/// Path of the deployment record of `network`
pub fn record_path(out_dir: &Path, network: Network) -> PathBuf {
    out_dir.join(format!("{}.json", network.name()))
}

/// Write the deployment record and one descriptor per deployed contract
pub fn record_deployment(
    out_dir: &Path,
    network: Network,
    plan: &DeploymentPlan,
    deployed: &[DeployedUnit],
) -> Result<(), ScriptError> {
    let record = record_path(out_dir, network);
    let descriptors_dir = out_dir.join(network.name());

    for unit in deployed {
        write_output_file(&record, OutputKeys::Deployment { key: &unit.name }, unit.address)?;
        write_output_file(
            &record,
            OutputKeys::Tx {
                key: &unit.name,
                tx_key: "deploy",
            },
            unit.tx_hash,
        )?;

        let planned = plan
            .units()
            .iter()
            .find(|planned| planned.name == unit.name)
            .ok_or_else(|| {
                ScriptError::JsonOutputError(format!("{} is not part of the plan", unit.name))
            })?;
        let path = write_contract_descriptor(
            &descriptors_dir,
            &unit.artifact,
            &planned.artifact.abi,
            unit.address,
        )?;
        info!("Wrote {} descriptor to {}", unit.name, path.display());
    }

    Ok(())
}

/// Register a user on the deployed document registry
pub async fn add_user(
    args: AddUserArgs,
    network: Network,
    overrides: &Overrides,
) -> Result<(), ScriptError> {
    let config = NetworkConfig::from_env(network, overrides)?;

    // Fetch contract address from the descriptor
    let (_abi, contract) = read_contract_descriptor(&document_descriptor(&args, network))?;

    let client = create_rpc_provider(&config)?;
    if !has_code(contract, &client).await? {
        return Err(ScriptError::ContractInteraction(format!(
            "no contract deployed at {:#x} on {}",
            contract, network
        )));
    }

    let tx_hash = send_add_user(contract, args.name, args.role, &client).await?;
    info!("User added successfully. Transaction Hash: {}", tx_hash);

    Ok(())
}

/// Descriptor of the document registry targeted by `add-user`
fn document_descriptor(args: &AddUserArgs, network: Network) -> PathBuf {
    match &args.descriptor {
        Some(path) => path.clone(),
        None => descriptor_path(&args.out_dir.join(network.name()), &args.document_artifact),
    }
}

/// Log the identity of the connected network
pub async fn network_info(network: Network, overrides: &Overrides) -> Result<(), ScriptError> {
    let config = NetworkConfig::from_env(network, overrides)?;
    let client = create_rpc_provider(&config)?;

    let info = get_network_info(&client).await?;
    info!("Connected to network with ID: {}", info.chain_id);
    info!("Latest block: {}", info.block_number);
    if info.chain_id != config.chain_id {
        warn!("{} is configured with chain id {}", network, config.chain_id);
    }

    Ok(())
}
