//! The role → user → document registry chain

use crate::{
    build::{artifact::ContractArtifact, compile::ArtifactBuilder},
    constants::{DOCUMENT_REGISTRY, ROLE_REGISTRY, USER_REGISTRY},
    deploy::plan::{ConstructorArg, DeploymentPlan, DeploymentUnit},
    errors::ScriptError,
};

/// Compiled artifacts of the three registries
#[derive(Clone, Debug)]
pub struct RegistryArtifacts {
    /// Role registry, no constructor args
    pub role: ContractArtifact,
    /// User registry, built with the role registry address
    pub user: ContractArtifact,
    /// Document registry, built with the user registry address
    pub document: ContractArtifact,
}

impl RegistryArtifacts {
    /// Load the three artifacts by contract name
    pub fn load(
        builder: &ArtifactBuilder,
        role: &str,
        user: &str,
        document: &str,
    ) -> Result<Self, ScriptError> {
        Ok(RegistryArtifacts {
            role: builder.artifact(role)?,
            user: builder.artifact(user)?,
            document: builder.artifact(document)?,
        })
    }
}

/// Build the registry plan: each registry receives the address of the one before it
pub fn registry_plan_from(artifacts: RegistryArtifacts) -> Result<DeploymentPlan, ScriptError> {
    DeploymentPlan::new()
        .then(DeploymentUnit::new(ROLE_REGISTRY, artifacts.role))?
        .then(
            DeploymentUnit::new(USER_REGISTRY, artifacts.user)
                .with_arg(ConstructorArg::address_of(ROLE_REGISTRY)),
        )?
        .then(
            DeploymentUnit::new(DOCUMENT_REGISTRY, artifacts.document)
                .with_arg(ConstructorArg::address_of(USER_REGISTRY)),
        )
}
