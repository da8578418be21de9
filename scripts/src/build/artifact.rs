use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{hex, primitives::Bytes};
use clap::ValueEnum;
use json::JsonValue;

use crate::errors::ScriptError;

/// The toolchains whose compiled artifacts we know how to read
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Framework {
    /// Artifacts under `<artifacts>/<Name>.json`, `build/contracts` by default
    Truffle,
    /// Artifacts under `<artifacts>/contracts/<Name>.sol/<Name>.json`, `artifacts` by default
    Hardhat,
}

impl Framework {
    /// Artifacts directory used when the project does not override it
    pub fn default_artifacts_dir(&self) -> &'static str {
        match self {
            Framework::Truffle => "build/contracts",
            Framework::Hardhat => "artifacts",
        }
    }

    /// Location of the artifact of `contract` inside `artifacts_dir`
    pub fn artifact_path(&self, artifacts_dir: &Path, contract: &str) -> PathBuf {
        match self {
            Framework::Truffle => artifacts_dir.join(format!("{contract}.json")),
            Framework::Hardhat => artifacts_dir
                .join("contracts")
                .join(format!("{contract}.sol"))
                .join(format!("{contract}.json")),
        }
    }

    /// Command line compiling the project
    pub fn compile_command(&self) -> [&'static str; 3] {
        match self {
            Framework::Truffle => ["npx", "truffle", "compile"],
            Framework::Hardhat => ["npx", "hardhat", "compile"],
        }
    }
}

/// A compiled contract: its interface and creation code
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// Contract name, as known by the compiler
    pub name: String,
    /// The json abi
    pub abi: JsonValue,
    /// Creation bytecode
    pub bytecode: Bytes,
    /// Number of constructor inputs declared in the abi, if the abi is known
    pub constructor_arity: Option<usize>,
}

impl ContractArtifact {
    /// Build an artifact from raw parts, without abi
    pub fn from_parts(name: &str, bytecode: Vec<u8>, constructor_arity: Option<usize>) -> Self {
        ContractArtifact {
            name: name.to_string(),
            abi: JsonValue::new_array(),
            bytecode: Bytes::from(bytecode),
            constructor_arity,
        }
    }

    /// Load the artifact of `contract` compiled by `framework` into `artifacts_dir`
    pub fn load(
        framework: Framework,
        artifacts_dir: &Path,
        contract: &str,
    ) -> Result<Self, ScriptError> {
        Self::from_file(&framework.artifact_path(artifacts_dir, contract))
    }

    /// Read an artifact file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ScriptError::Artifact(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| ScriptError::Artifact(format!("{}: {}", path.display(), e)))
    }

    /// Parse the json content of an artifact
    pub fn parse(content: &str) -> Result<Self, String> {
        let parsed = json::parse(content).map_err(|e| e.to_string())?;

        let name = parsed["contractName"]
            .as_str()
            .ok_or("missing contractName")?
            .to_string();

        let abi = parsed["abi"].clone();
        if !abi.is_array() {
            return Err(format!("{name}: missing abi"));
        }

        let raw_bytecode = parsed["bytecode"]
            .as_str()
            .ok_or_else(|| format!("{name}: missing bytecode"))?;
        // Unlinked libraries show up as `__$<hash>$__` placeholders
        if raw_bytecode.contains("__") {
            return Err(format!("{name}: bytecode has unlinked library references"));
        }
        let bytecode = hex::decode(raw_bytecode).map_err(|e| format!("{name}: {e}"))?;
        if bytecode.is_empty() {
            return Err(format!(
                "{name}: empty bytecode, abstract contracts and interfaces cannot be deployed"
            ));
        }

        // No constructor entry means no constructor args
        let constructor_arity = abi
            .members()
            .find(|entry| entry["type"] == "constructor")
            .map_or(0, |constructor| constructor["inputs"].len());

        Ok(ContractArtifact {
            name,
            abi,
            bytecode: Bytes::from(bytecode),
            constructor_arity: Some(constructor_arity),
        })
    }
}
