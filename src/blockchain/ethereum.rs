use async_trait::async_trait;
use ethers::{
    contract::abigen,
    middleware::SignerMiddleware,
    providers::{Http, JsonRpcClient, Middleware, PendingTransaction, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, H256, U64},
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use super::traits::{
    TxConfirmation, WalletExtension, WalletProvider, WalletSigner, WhitelistReader,
    WhitelistWriter,
};
use crate::core::{domain::PrivateKey, errors::DappError};

abigen!(
    WhitelistAbi,
    r#"[
        function numAddressesWhitelisted() external view returns (uint8)
        function whitelistedAddresses(address account) external view returns (bool)
        function addAddressToWhitelist() external
    ]"#
);

/// Wallet backed by a locally held signing key, talking to a JSON-RPC node.
///
/// It counts as "installed" only when a key is configured.
pub struct LocalWalletExtension {
    rpc_url: String,
    key: Option<PrivateKey>,
}

impl LocalWalletExtension {
    pub fn new(rpc_url: impl Into<String>, key: Option<PrivateKey>) -> Self {
        Self { rpc_url: rpc_url.into(), key }
    }

    fn build_provider(&self) -> Result<Provider<Http>, DappError> {
        let rpc_url_clean = self.rpc_url.trim();
        let parsed_url = reqwest::Url::parse(rpc_url_clean).map_err(|e| {
            DappError::Config(format!("Invalid RPC URL '{}': {}", rpc_url_clean, e))
        })?;

        // Short timeout; honour proxy environment vars.
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(10));
        if let Ok(proxy) = std::env::var("HTTPS_PROXY").or_else(|_| std::env::var("HTTP_PROXY")) {
            if let Ok(p) = reqwest::Proxy::all(proxy) {
                builder = builder.proxy(p);
            }
        }
        let client = builder
            .build()
            .map_err(|e| DappError::Config(format!("Failed to build HTTP client: {}", e)))?;

        debug!(rpc_url = %parsed_url, "Built RPC provider");
        Ok(Provider::new(Http::new_with_client(parsed_url, client)))
    }

    fn local_wallet(&self) -> Result<LocalWallet, DappError> {
        let key = self.key.as_ref().ok_or(DappError::NoWalletExtension)?;
        key.with_secret(|bytes| LocalWallet::from_bytes(bytes))
            .map_err(|e| DappError::InvalidKey(e.to_string()))
    }
}

#[async_trait]
impl WalletExtension for LocalWalletExtension {
    fn is_installed(&self) -> bool {
        self.key.is_some()
    }

    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, DappError> {
        let wallet = self.local_wallet()?;
        let provider = self.build_provider()?;
        info!(account = ?wallet.address(), "Local wallet connected");
        Ok(Arc::new(EthersProvider::new(provider, Some(wallet))))
    }
}

/// Read-only handle over an ethers `Provider`.
#[derive(Clone)]
pub struct EthersProvider<P: JsonRpcClient + Clone = Http> {
    provider: Provider<P>,
    wallet: Option<LocalWallet>,
}

impl<P: JsonRpcClient + Clone> EthersProvider<P> {
    /// Wraps a provider. Passing a `MockProvider` is useful for testing.
    pub fn new(provider: Provider<P>, wallet: Option<LocalWallet>) -> Self {
        Self { provider, wallet }
    }
}

#[async_trait]
impl<P> WalletProvider for EthersProvider<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    async fn chain_id(&self) -> Result<u64, DappError> {
        let chain_id = self.provider.get_chainid().await?;
        Ok(chain_id.as_u64())
    }

    async fn signer(&self) -> Result<Arc<dyn WalletSigner>, DappError> {
        let wallet = self.wallet.clone().ok_or(DappError::NoWalletExtension)?;
        let chain_id = self.chain_id().await?;
        let client = SignerMiddleware::new(self.provider.clone(), wallet.with_chain_id(chain_id));
        Ok(Arc::new(EthersSigner { client: Arc::new(client) }))
    }

    fn whitelist(&self, contract: Address) -> Arc<dyn WhitelistReader> {
        Arc::new(EthersWhitelist::new(contract, Arc::new(self.provider.clone())))
    }
}

/// Signing handle: the provider wrapped in a `SignerMiddleware`.
pub struct EthersSigner<P: JsonRpcClient + Clone = Http> {
    client: Arc<SignerMiddleware<Provider<P>, LocalWallet>>,
}

#[async_trait]
impl<P> WalletSigner for EthersSigner<P>
where
    P: JsonRpcClient + Clone + 'static,
{
    async fn address(&self) -> Result<Address, DappError> {
        Ok(self.client.address())
    }

    fn whitelist(&self, contract: Address) -> Arc<dyn WhitelistWriter> {
        Arc::new(EthersWhitelist::new(contract, self.client.clone()))
    }
}

/// Whitelist contract bound to any ethers middleware.
pub struct EthersWhitelist<M: Middleware> {
    contract: WhitelistAbi<M>,
    client: Arc<M>,
}

impl<M: Middleware + 'static> EthersWhitelist<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        Self { contract: WhitelistAbi::new(address, client.clone()), client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> WhitelistReader for EthersWhitelist<M> {
    async fn num_addresses_whitelisted(&self) -> Result<u64, DappError> {
        let count: u8 = self
            .contract
            .num_addresses_whitelisted()
            .call()
            .await
            .map_err(|e| DappError::contract(format!("numAddressesWhitelisted: {}", e)))?;
        debug!(count, "numAddressesWhitelisted");
        Ok(u64::from(count))
    }

    async fn whitelisted_addresses(&self, account: Address) -> Result<bool, DappError> {
        self.contract
            .whitelisted_addresses(account)
            .call()
            .await
            .map_err(|e| DappError::contract(format!("whitelistedAddresses: {}", e)))
    }
}

#[async_trait]
impl<M: Middleware + 'static> WhitelistWriter for EthersWhitelist<M> {
    async fn add_address_to_whitelist(&self) -> Result<H256, DappError> {
        let call = self.contract.add_address_to_whitelist();
        let pending = call
            .send()
            .await
            .map_err(|e| DappError::contract(format!("addAddressToWhitelist: {}", e)))?;
        let tx_hash = pending.tx_hash();
        info!(tx_hash = ?tx_hash, "addAddressToWhitelist submitted");
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: H256) -> Result<TxConfirmation, DappError> {
        let receipt = PendingTransaction::new(tx_hash, self.client.provider())
            .confirmations(1)
            .await?;

        let receipt = match receipt {
            Some(r) => r,
            None => {
                warn!(tx_hash = ?tx_hash, "Transaction dropped from mempool");
                return Err(DappError::contract(format!("transaction {:?} was dropped", tx_hash)));
            }
        };

        if receipt.status != Some(U64::from(1)) {
            return Err(DappError::contract(format!("transaction {:?} reverted", tx_hash)));
        }

        Ok(TxConfirmation { tx_hash, block_number: receipt.block_number.map(|b| b.as_u64()) })
    }
}
