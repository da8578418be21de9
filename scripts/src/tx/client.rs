use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{
        fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller},
        Identity, ProviderBuilder, ReqwestProvider,
    },
};
use reqwest::Client;
use tracing::info;

use crate::{config::NetworkConfig, errors::ScriptError};

/// Re-export from alloy recommend filter
type RecommendFiller =
    JoinFill<JoinFill<JoinFill<Identity, GasFiller>, NonceFiller>, ChainIdFiller>;

/// An alloy provider that uses a local signer to generate signatures
/// & interfaces with the RPC endpoint over HTTP
pub type RpcProvider = FillProvider<
    JoinFill<RecommendFiller, WalletFiller<EthereumWallet>>,
    ReqwestProvider,
    alloy::transports::http::Http<Client>,
    Ethereum,
>;

/// Build the signing RPC provider for the given network.
/// No request is sent until the provider is first used.
pub fn create_rpc_provider(config: &NetworkConfig) -> Result<RpcProvider, ScriptError> {
    // Create our signer
    let signer = config.credential.signer()?;
    info!("Signing as {}", signer.address());

    let wallet = EthereumWallet::from(signer);

    // Create our provider with the rpc client + signer
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(wallet)
        .on_http(config.rpc_url.clone());

    Ok(provider)
}
