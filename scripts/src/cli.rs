//! Definitions of CLI arguments and commands for the registry scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    build::artifact::Framework,
    commands::{add_user, deploy_contracts, network_info},
    config::{Network, Overrides},
    constants::{DEFAULT_DEPLOYMENTS_DIR, DOCUMENT_ARTIFACT, ROLE_ARTIFACT, USER_ARTIFACT},
    errors::ScriptError,
};

/// Scripts for deploying & interacting with the document, user and role registries
#[derive(Parser)]
#[command(name = "registry-scripts")]
pub struct Cli {
    /// Network to run against
    #[arg(short, long, value_enum, default_value_t = Network::Sepolia)]
    pub network: Network,

    /// Private key or seed phrase of the deployer, overrides PRIVATE_KEY
    #[arg(short, long)]
    pub priv_key: Option<String>,

    /// Network RPC URL, overrides <NETWORK>_URL
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// Network chain id, overrides <NETWORK>_CHAIN_ID
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Values given on the command line that take precedence over the environment
    pub fn overrides(&self) -> Overrides {
        Overrides {
            rpc_url: self.rpc_url.clone(),
            chain_id: self.chain_id,
            priv_key: self.priv_key.clone(),
        }
    }
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the role, user and document registries, in that order
    DeployContracts(DeployContractsArgs),
    /// Register a user on a deployed document registry
    AddUser(AddUserArgs),
    /// Print the chain id and latest block of the network
    NetworkInfo,
}

impl Command {
    /// Run the command
    pub async fn run(self, network: Network, overrides: &Overrides) -> Result<(), ScriptError> {
        match self {
            Command::DeployContracts(args) => {
                info!("Deploying contracts on {}...", network);
                let deployed = deploy_contracts(args, network, overrides).await?;
                for unit in deployed.units {
                    info!("{}: {:#x}", unit.name, unit.address);
                }

                Ok(())
            }
            Command::AddUser(args) => {
                info!("Adding user {} as {}...", args.name, args.role);
                add_user(args, network, overrides).await?;

                Ok(())
            }
            Command::NetworkInfo => network_info(network, overrides).await,
        }
    }
}

/// Deploy contracts
#[derive(Args)]
pub struct DeployContractsArgs {
    /// Root of the Solidity project holding the compiled artifacts
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Toolchain that compiled the contracts
    #[arg(long, value_enum, default_value_t = Framework::Truffle)]
    pub framework: Framework,

    /// Compile the contracts before deploying them
    #[arg(long)]
    pub compile: bool,

    /// Artifacts directory, relative to the project, defaults to the framework's own
    #[arg(long)]
    pub artifacts_dir: Option<PathBuf>,

    /// Directory receiving the deployment records and contract descriptors
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub out_dir: PathBuf,

    /// Artifact name of the role registry
    #[arg(long, default_value = ROLE_ARTIFACT)]
    pub role_artifact: String,

    /// Artifact name of the user registry
    #[arg(long, default_value = USER_ARTIFACT)]
    pub user_artifact: String,

    /// Artifact name of the document registry
    #[arg(long, default_value = DOCUMENT_ARTIFACT)]
    pub document_artifact: String,
}

/// Register a user on the document registry
#[derive(Args)]
pub struct AddUserArgs {
    /// Name of the user
    #[arg(long)]
    pub name: String,

    /// Role granted to the user
    #[arg(long)]
    pub role: String,

    /// Descriptor of the document registry, defaults to the one written by `deploy-contracts`
    #[arg(long)]
    pub descriptor: Option<PathBuf>,

    /// Artifact name the document registry was deployed from
    #[arg(long, default_value = DOCUMENT_ARTIFACT)]
    pub document_artifact: String,

    /// Directory holding the deployment records and contract descriptors
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_DIR)]
    pub out_dir: PathBuf,
}
