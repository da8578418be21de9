//! Fixtures shared by the unit tests

use crate::{
    build::artifact::ContractArtifact,
    config::{Credential, Network, NetworkConfig},
    deploy::registry::RegistryArtifacts,
};

/// Well known local development key
pub const TEST_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A ganache config signing with [`TEST_KEY`]
pub fn test_config() -> NetworkConfig {
    NetworkConfig {
        network: Network::Ganache,
        rpc_url: "http://localhost:7545".parse().unwrap(),
        chain_id: 1337,
        credential: TEST_KEY.parse::<Credential>().unwrap(),
    }
}

/// Tiny fake artifacts for the three registries
pub fn registry_artifacts() -> RegistryArtifacts {
    RegistryArtifacts {
        role: ContractArtifact::from_parts("Role", vec![0x60, 0x80, 0x01], Some(0)),
        user: ContractArtifact::from_parts("User", vec![0x60, 0x80, 0x02], Some(1)),
        document: ContractArtifact::from_parts("DocumentState", vec![0x60, 0x80, 0x03], Some(1)),
    }
}

/// Minimal Truffle artifact for `name` taking `inputs` address args
pub fn artifact_json(name: &str, inputs: usize) -> String {
    let inputs = (0..inputs)
        .map(|i| format!(r#"{{ "name": "arg{i}", "type": "address" }}"#))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        r#"{{
            "contractName": "{name}",
            "abi": [
                {{ "type": "constructor", "inputs": [{inputs}], "stateMutability": "nonpayable" }},
                {{ "type": "function", "name": "addUser", "inputs": [
                    {{ "name": "userName", "type": "string" }},
                    {{ "name": "role", "type": "string" }}
                ], "outputs": [], "stateMutability": "nonpayable" }}
            ],
            "bytecode": "0x608060405234801561001057600080fd5b50"
        }}"#
    )
}
