//! Deployment plans: ordered units whose constructor args may reference earlier units

use alloy::{
    dyn_abi::DynSolValue,
    primitives::{Address, Bytes, TxHash},
};

use crate::{build::artifact::ContractArtifact, errors::ScriptError};

/// A constructor argument, either known up front or taken from an earlier unit
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructorArg {
    /// A value known when the plan is built
    Literal(DynSolValue),
    /// The deployed address of the named earlier unit
    AddressOf(String),
}

impl ConstructorArg {
    /// Reference the address of an earlier unit
    pub fn address_of(unit: impl Into<String>) -> Self {
        ConstructorArg::AddressOf(unit.into())
    }
}

/// A contract waiting to be deployed
#[derive(Clone, Debug)]
pub struct DeploymentUnit {
    /// Identifier of the unit inside the plan
    pub name: String,
    /// Compiled contract to deploy
    pub artifact: ContractArtifact,
    /// Ordered constructor args
    pub constructor_args: Vec<ConstructorArg>,
}

impl DeploymentUnit {
    /// Create a unit without constructor args
    pub fn new(name: impl Into<String>, artifact: ContractArtifact) -> Self {
        DeploymentUnit {
            name: name.into(),
            artifact,
            constructor_args: Vec::new(),
        }
    }

    /// Append a constructor arg
    pub fn with_arg(mut self, arg: ConstructorArg) -> Self {
        self.constructor_args.push(arg);
        self
    }

    /// Resolve the constructor args against the addresses deployed so far
    pub fn resolve_args(&self, deployed: &[DeployedUnit]) -> Result<Vec<DynSolValue>, ScriptError> {
        self.constructor_args
            .iter()
            .map(|arg| match arg {
                ConstructorArg::Literal(value) => Ok(value.clone()),
                ConstructorArg::AddressOf(name) => deployed
                    .iter()
                    .find(|unit| &unit.name == name)
                    .map(|unit| DynSolValue::Address(unit.address))
                    .ok_or_else(|| {
                        ScriptError::InvalidPlan(format!(
                            "{} references {} before it is deployed",
                            self.name, name
                        ))
                    }),
            })
            .collect()
    }

    /// Creation code followed by the abi encoded constructor args
    pub fn deploy_code(&self, args: &[DynSolValue]) -> Bytes {
        let mut code = self.artifact.bytecode.to_vec();
        if !args.is_empty() {
            code.extend(DynSolValue::Tuple(args.to_vec()).abi_encode_params());
        }
        Bytes::from(code)
    }
}

/// An ordered list of units forming a dependency chain
#[derive(Clone, Debug, Default)]
pub struct DeploymentPlan {
    /// Units, in deployment order
    units: Vec<DeploymentUnit>,
}

impl DeploymentPlan {
    /// Create an empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit, rejecting duplicate names, forward references and arity mismatches
    pub fn push(&mut self, unit: DeploymentUnit) -> Result<(), ScriptError> {
        if self.units.iter().any(|known| known.name == unit.name) {
            return Err(ScriptError::InvalidPlan(format!(
                "unit {} is already part of the plan",
                unit.name
            )));
        }

        for arg in &unit.constructor_args {
            if let ConstructorArg::AddressOf(target) = arg {
                if !self.units.iter().any(|known| &known.name == target) {
                    return Err(ScriptError::InvalidPlan(format!(
                        "{} references {} which is not deployed before it",
                        unit.name, target
                    )));
                }
            }
        }

        if let Some(expected) = unit.artifact.constructor_arity {
            if expected != unit.constructor_args.len() {
                return Err(ScriptError::InvalidPlan(format!(
                    "{} constructor takes {} args, {} given",
                    unit.name,
                    expected,
                    unit.constructor_args.len()
                )));
            }
        }

        self.units.push(unit);
        Ok(())
    }

    /// Builder flavour of [`DeploymentPlan::push`]
    pub fn then(mut self, unit: DeploymentUnit) -> Result<Self, ScriptError> {
        self.push(unit)?;
        Ok(self)
    }

    /// The units, in deployment order
    pub fn units(&self) -> &[DeploymentUnit] {
        &self.units
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the plan has no unit
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// A unit confirmed on chain
#[derive(Clone, Debug, PartialEq)]
pub struct DeployedUnit {
    /// Identifier of the unit inside the plan
    pub name: String,
    /// Name of the compiled artifact
    pub artifact: String,
    /// Constructor args as they were sent
    pub constructor_args: Vec<DynSolValue>,
    /// Address of the new contract
    pub address: Address,
    /// Hash of the deployment transaction
    pub tx_hash: TxHash,
    /// Block including the deployment
    pub block_number: Option<u64>,
}

/// The result of a successful plan execution
#[derive(Clone, Debug, Default)]
pub struct DeployedPlan {
    /// Deployed units, in deployment order
    pub units: Vec<DeployedUnit>,
}

impl DeployedPlan {
    /// Find a deployed unit by name
    pub fn get(&self, name: &str) -> Option<&DeployedUnit> {
        self.units.iter().find(|unit| unit.name == name)
    }

    /// Address of the named unit
    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.get(name).map(|unit| unit.address)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{address, U256};

    use super::*;
    use crate::build::artifact::ContractArtifact;

    fn artifact(name: &str, arity: Option<usize>) -> ContractArtifact {
        ContractArtifact::from_parts(name, vec![0x60, 0x80, 0x60, 0x40], arity)
    }

    #[test]
    fn rejects_forward_references() {
        let mut plan = DeploymentPlan::new();
        let err = plan
            .push(
                DeploymentUnit::new("UserRegistry", artifact("User", Some(1)))
                    .with_arg(ConstructorArg::address_of("RoleRegistry")),
            )
            .unwrap_err();

        assert!(matches!(err, ScriptError::InvalidPlan(_)));
        assert!(plan.is_empty());
    }

    #[test]
    fn rejects_self_references_and_duplicates() {
        let mut plan = DeploymentPlan::new();
        plan.push(DeploymentUnit::new("RoleRegistry", artifact("Role", Some(0))))
            .unwrap();

        let self_ref = DeploymentUnit::new("UserRegistry", artifact("User", Some(1)))
            .with_arg(ConstructorArg::address_of("UserRegistry"));
        assert!(plan.push(self_ref).is_err());

        let duplicate = DeploymentUnit::new("RoleRegistry", artifact("Role", Some(0)));
        assert!(plan.push(duplicate).is_err());
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn rejects_arity_mismatch() {
        let err = DeploymentPlan::new()
            .then(DeploymentUnit::new("UserRegistry", artifact("User", Some(1))))
            .unwrap_err();

        assert!(err.to_string().contains("takes 1 args, 0 given"));
    }

    #[test]
    fn unknown_arity_is_not_checked() {
        let plan = DeploymentPlan::new()
            .then(
                DeploymentUnit::new("Registry", artifact("Registry", None))
                    .with_arg(ConstructorArg::Literal(DynSolValue::Bool(true))),
            )
            .unwrap();
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn deploy_code_appends_encoded_args() {
        let unit = DeploymentUnit::new("UserRegistry", artifact("User", Some(1)));
        let role = address!("b139302585dF6445545b3D724f1011F1dB79220D");

        let code = unit.deploy_code(&[DynSolValue::Address(role)]);
        assert_eq!(code.len(), 4 + 32);
        assert_eq!(&code[..4], &[0x60, 0x80, 0x60, 0x40]);
        assert_eq!(&code[4 + 12..], role.as_slice());

        let bare = unit.deploy_code(&[]);
        assert_eq!(bare.len(), 4);

        let two = unit.deploy_code(&[
            DynSolValue::Address(role),
            DynSolValue::Uint(U256::from(7), 256),
        ]);
        assert_eq!(two.len(), 4 + 64);
        assert_eq!(two[two.len() - 1], 7);
    }
}
