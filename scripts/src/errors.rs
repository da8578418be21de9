//! Definitions of errors that can occur during the execution of the registry scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::deploy::plan::DeployedUnit;

/// Errors that can occur during the execution of the registry scripts
#[derive(Debug)]
pub enum ScriptError {
    /// A required configuration value is missing or malformed
    Configuration(String),
    /// The ledger endpoint is unreachable or refused a submission
    Transport(String),
    /// The deployment transaction was mined but its execution failed
    DeploymentRejected {
        /// Name of the unit whose constructor failed
        unit: String,
        /// What the ledger reported
        reason: String,
    },
    /// A deployment plan violates its ordering rules
    InvalidPlan(String),
    /// A stage of the deployment sequence failed, aborting the remaining ones
    StageFailed {
        /// Position of the failing stage, starting at 1
        index: usize,
        /// Name of the failing stage
        stage: String,
        /// The underlying failure
        cause: Box<ScriptError>,
        /// Units confirmed on chain before the failure
        deployed: Vec<DeployedUnit>,
    },
    /// Error reading a compiled contract artifact
    Artifact(String),
    /// Error when building output file
    JsonOutputError(String),
    /// Error when fetching the nonce to predict a contract address
    NonceFetching(String),
    /// Error compiling the contracts
    ContractCompilation(String),
    /// Error calling a contract method
    ContractInteraction(String),
}

impl ScriptError {
    /// Name of the stage that failed, if this error aborted a deployment sequence
    pub fn failed_stage(&self) -> Option<&str> {
        match self {
            ScriptError::StageFailed { stage, .. } => Some(stage.as_str()),
            _ => None,
        }
    }

    /// Whether this error stems from the configuration
    pub fn is_configuration(&self) -> bool {
        match self {
            ScriptError::Configuration(_) => true,
            ScriptError::StageFailed { cause, .. } => cause.is_configuration(),
            _ => false,
        }
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Configuration(s) => write!(f, "configuration error: {}", s),
            ScriptError::Transport(s) => write!(f, "ledger transport error: {}", s),
            ScriptError::DeploymentRejected { unit, reason } => {
                write!(f, "deployment of {} rejected: {}", unit, reason)
            }
            ScriptError::InvalidPlan(s) => write!(f, "invalid deployment plan: {}", s),
            ScriptError::StageFailed {
                index,
                stage,
                cause,
                deployed,
            } => {
                write!(f, "stage {} ({}) failed: {}", index, stage, cause)?;
                if !deployed.is_empty() {
                    let already = deployed
                        .iter()
                        .map(|unit| format!("{} at {:#x}", unit.name, unit.address))
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, " (already deployed: {})", already)?;
                }
                Ok(())
            }
            ScriptError::Artifact(s) => write!(f, "error reading contract artifact: {}", s),
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
            ScriptError::NonceFetching(s) => {
                write!(f, "error during nonce fetching for address prediction: {}", s)
            }
            ScriptError::ContractCompilation(s) => write!(f, "error compiling contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
        }
    }
}

impl Error for ScriptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ScriptError::StageFailed { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
