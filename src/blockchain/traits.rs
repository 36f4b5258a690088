use async_trait::async_trait;
use ethers::types::{Address, H256};
use std::sync::Arc;

use crate::core::errors::DappError;

/// The wallet boundary: something that can hand out a provider connected to
/// the user's account.
#[async_trait]
pub trait WalletExtension: Send + Sync {
    /// Whether a wallet is present at all. Checked before any connect attempt.
    fn is_installed(&self) -> bool;

    /// Connects to the wallet and returns a read-only provider handle.
    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, DappError>;
}

/// Read-only handle to the chain the wallet is connected to.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Chain the wallet is currently connected to.
    async fn chain_id(&self) -> Result<u64, DappError>;

    /// Derives a transaction-signing handle for the connected account.
    async fn signer(&self) -> Result<Arc<dyn WalletSigner>, DappError>;

    /// Binds the whitelist contract at `contract` for read-only calls.
    fn whitelist(&self, contract: Address) -> Arc<dyn WhitelistReader>;
}

/// Signing handle. Signers can read as well as write.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Address of the connected account.
    async fn address(&self) -> Result<Address, DappError>;

    /// Binds the whitelist contract at `contract` for signed calls.
    fn whitelist(&self, contract: Address) -> Arc<dyn WhitelistWriter>;
}

/// View functions of the whitelist contract.
#[async_trait]
pub trait WhitelistReader: Send + Sync {
    /// `numAddressesWhitelisted()`
    async fn num_addresses_whitelisted(&self) -> Result<u64, DappError>;

    /// `whitelistedAddresses(address)`
    async fn whitelisted_addresses(&self, account: Address) -> Result<bool, DappError>;
}

/// State-changing functions of the whitelist contract.
#[async_trait]
pub trait WhitelistWriter: WhitelistReader {
    /// Submits `addAddressToWhitelist()` and returns the pending transaction hash.
    async fn add_address_to_whitelist(&self) -> Result<H256, DappError>;

    /// Waits until the transaction is mined. A revert or a dropped
    /// transaction is reported as `ContractCallFailure`.
    async fn wait_for_confirmation(&self, tx_hash: H256) -> Result<TxConfirmation, DappError>;
}

/// A mined, successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxConfirmation {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
}
