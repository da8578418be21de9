//! Network configuration, resolved from the environment and CLI overrides

use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

use alloy::{
    hex,
    primitives::B256,
    signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner},
};
use clap::ValueEnum;
use reqwest::Url;

use crate::{constants::CREDENTIAL_ENV_KEY, errors::ScriptError};

/// The networks the scripts know how to reach
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Network {
    /// A local Ganache node
    Ganache,
    /// The Sepolia testnet
    Sepolia,
}

impl Network {
    /// Prefix of the environment keys describing this network
    fn env_prefix(&self) -> &'static str {
        match self {
            Network::Ganache => "GANACHE",
            Network::Sepolia => "SEPOLIA",
        }
    }

    /// Environment key holding the RPC url of this network
    pub fn rpc_url_key(&self) -> String {
        format!("{}_URL", self.env_prefix())
    }

    /// Environment key holding the chain id of this network
    pub fn chain_id_key(&self) -> String {
        format!("{}_CHAIN_ID", self.env_prefix())
    }

    /// Lowercase name, used for output file names
    pub fn name(&self) -> &'static str {
        match self {
            Network::Ganache => "ganache",
            Network::Sepolia => "sepolia",
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of the deployer signature
#[derive(Clone)]
pub enum Credential {
    /// A raw secp256k1 private key
    PrivateKey(B256),
    /// A BIP-39 seed phrase, the first derived account is used
    Mnemonic(String),
}

impl Credential {
    /// Build the signer for this credential
    pub fn signer(&self) -> Result<PrivateKeySigner, ScriptError> {
        match self {
            Credential::PrivateKey(key) => PrivateKeySigner::from_bytes(key)
                .map_err(|e| ScriptError::Configuration(format!("invalid private key: {}", e))),
            Credential::Mnemonic(phrase) => MnemonicBuilder::<English>::default()
                .phrase(phrase.as_str())
                .index(0u32)
                .and_then(|builder| builder.build())
                .map_err(|e| ScriptError::Configuration(format!("invalid seed phrase: {}", e))),
        }
    }
}

impl FromStr for Credential {
    type Err = ScriptError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScriptError::Configuration(format!(
                "{} is empty",
                CREDENTIAL_ENV_KEY
            )));
        }

        // A seed phrase is made of several words
        if raw.split_whitespace().count() > 1 {
            return Ok(Credential::Mnemonic(
                raw.split_whitespace().collect::<Vec<_>>().join(" "),
            ));
        }

        let bytes = hex::decode(raw).map_err(|e| {
            ScriptError::Configuration(format!("{} is not valid hex: {}", CREDENTIAL_ENV_KEY, e))
        })?;
        if bytes.len() != 32 {
            return Err(ScriptError::Configuration(format!(
                "{} must be 32 bytes, got {}",
                CREDENTIAL_ENV_KEY,
                bytes.len()
            )));
        }
        Ok(Credential::PrivateKey(B256::from_slice(&bytes)))
    }
}

// Never print key material
impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Credential::PrivateKey(_) => f.write_str("Credential::PrivateKey(<redacted>)"),
            Credential::Mnemonic(_) => f.write_str("Credential::Mnemonic(<redacted>)"),
        }
    }
}

/// Values given on the command line, taking precedence over the environment
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// RPC url override
    pub rpc_url: Option<String>,
    /// Chain id override
    pub chain_id: Option<u64>,
    /// Credential override
    pub priv_key: Option<String>,
}

/// Everything needed to reach and sign for a network
#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// The selected network
    pub network: Network,
    /// Transport endpoint
    pub rpc_url: Url,
    /// Expected chain id of the endpoint
    pub chain_id: u64,
    /// Deployer credential
    pub credential: Credential,
}

impl NetworkConfig {
    /// Resolve the configuration of `network` from the process environment
    pub fn from_env(network: Network, overrides: &Overrides) -> Result<Self, ScriptError> {
        Self::resolve(network, overrides, |key| std::env::var(key).ok())
    }

    /// Resolve the configuration of `network`, reading missing values through `lookup`
    pub fn resolve<F>(network: Network, overrides: &Overrides, lookup: F) -> Result<Self, ScriptError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_key = network.rpc_url_key();
        let raw_url = overrides
            .rpc_url
            .clone()
            .or_else(|| lookup(&rpc_key))
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ScriptError::Configuration(format!("missing rpc url ({})", rpc_key)))?;
        let rpc_url = raw_url.trim().parse::<Url>().map_err(|e| {
            ScriptError::Configuration(format!("malformed rpc url {:?}: {}", raw_url, e))
        })?;

        let chain_key = network.chain_id_key();
        let chain_id = match overrides.chain_id {
            Some(chain_id) => chain_id,
            None => {
                let raw = lookup(&chain_key).ok_or_else(|| {
                    ScriptError::Configuration(format!("missing chain id ({})", chain_key))
                })?;
                raw.trim().parse::<u64>().map_err(|e| {
                    ScriptError::Configuration(format!(
                        "malformed chain id {:?} ({}): {}",
                        raw, chain_key, e
                    ))
                })?
            }
        };

        let credential = overrides
            .priv_key
            .clone()
            .or_else(|| lookup(CREDENTIAL_ENV_KEY))
            .ok_or_else(|| {
                ScriptError::Configuration(format!("missing credential ({})", CREDENTIAL_ENV_KEY))
            })?
            .parse::<Credential>()?;

        Ok(NetworkConfig {
            network,
            rpc_url,
            chain_id,
            credential,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const PHRASE: &str = "test test test test test test test test test test test junk";

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn sepolia_env() -> HashMap<String, String> {
        env(&[
            ("SEPOLIA_URL", "https://rpc.sepolia.org"),
            ("SEPOLIA_CHAIN_ID", "11155111"),
            ("PRIVATE_KEY", KEY),
        ])
    }

    #[test]
    fn resolves_every_key_from_the_environment() {
        let vars = sepolia_env();
        let config =
            NetworkConfig::resolve(Network::Sepolia, &Overrides::default(), |k| vars.get(k).cloned())
                .unwrap();

        assert_eq!(config.rpc_url.as_str(), "https://rpc.sepolia.org/");
        assert_eq!(config.chain_id, 11155111);
        assert!(matches!(config.credential, Credential::PrivateKey(_)));
    }

    #[test]
    fn missing_rpc_url_is_a_configuration_error() {
        let mut vars = sepolia_env();
        vars.remove("SEPOLIA_URL");
        let err =
            NetworkConfig::resolve(Network::Sepolia, &Overrides::default(), |k| vars.get(k).cloned())
                .unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("SEPOLIA_URL"));
    }

    #[test]
    fn malformed_chain_id_is_a_configuration_error() {
        let mut vars = sepolia_env();
        vars.insert("SEPOLIA_CHAIN_ID".into(), "sepolia".into());
        let err =
            NetworkConfig::resolve(Network::Sepolia, &Overrides::default(), |k| vars.get(k).cloned())
                .unwrap_err();

        assert!(err.is_configuration());
    }

    #[test]
    fn missing_credential_is_a_configuration_error() {
        let vars = env(&[("GANACHE_URL", "http://localhost:7545"), ("GANACHE_CHAIN_ID", "1337")]);
        let err =
            NetworkConfig::resolve(Network::Ganache, &Overrides::default(), |k| vars.get(k).cloned())
                .unwrap_err();

        assert!(err.is_configuration());
        assert!(err.to_string().contains("PRIVATE_KEY"));
    }

    #[test]
    fn overrides_take_precedence() {
        let vars = sepolia_env();
        let overrides = Overrides {
            rpc_url: Some("http://127.0.0.1:8545".into()),
            chain_id: Some(31337),
            priv_key: None,
        };
        let config =
            NetworkConfig::resolve(Network::Sepolia, &overrides, |k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.rpc_url.as_str(), "http://127.0.0.1:8545/");
        assert_eq!(config.chain_id, 31337);
    }

    #[test]
    fn credential_accepts_prefixed_keys_and_seed_phrases() {
        assert!(matches!(
            format!("0x{KEY}").parse::<Credential>().unwrap(),
            Credential::PrivateKey(_)
        ));
        assert!(matches!(
            PHRASE.parse::<Credential>().unwrap(),
            Credential::Mnemonic(_)
        ));
        assert!("0xdeadbeef".parse::<Credential>().unwrap_err().is_configuration());
    }

    #[test]
    fn credential_debug_never_prints_the_key() {
        let credential = KEY.parse::<Credential>().unwrap();
        assert!(!format!("{credential:?}").contains(&KEY[..8]));
    }

    #[test]
    fn signers_derive_the_well_known_test_account() {
        let expected = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        let from_key = KEY.parse::<Credential>().unwrap().signer().unwrap();
        let from_phrase = PHRASE.parse::<Credential>().unwrap().signer().unwrap();

        assert_eq!(from_key.address().to_checksum(None), expected);
        assert_eq!(from_phrase.address().to_checksum(None), expected);
    }
}
