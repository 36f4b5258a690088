//! Wallet session controller.
//!
//! Sequences wallet connection, network validation and whitelist contract
//! calls. Failures never escape the public operations: wallet and network
//! problems raise an alert, contract failures are logged, and the session
//! state is left as it was.
use ethers::types::Address;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::alert::AlertSink;
use super::state::SessionSnapshot;
use crate::blockchain::traits::{TxConfirmation, WalletExtension, WalletProvider, WalletSigner};
use crate::core::config::{DappConfig, NetworkConfig};
use crate::core::errors::DappError;

pub const NO_WALLET_ALERT: &str = "No wallet found. Install or configure a wallet to continue.";

/// A read-only or signing handle, as handed out by [`WalletSession::acquire_handle`].
#[derive(Clone)]
pub enum ChainHandle {
    ReadOnly(Arc<dyn WalletProvider>),
    Signing(Arc<dyn WalletSigner>),
}

pub struct WalletSession {
    contract: Address,
    required_chain_id: u64,
    network_name: String,
    connector: OnceCell<Arc<dyn WalletExtension>>,
    provider: Mutex<Option<Arc<dyn WalletProvider>>>,
    alerts: Arc<dyn AlertSink>,
    state: watch::Sender<SessionSnapshot>,
}

impl WalletSession {
    pub fn new(contract: Address, network: &NetworkConfig, alerts: Arc<dyn AlertSink>) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::default());
        Self {
            contract,
            required_chain_id: network.chain_id,
            network_name: network.name.clone(),
            connector: OnceCell::new(),
            provider: Mutex::new(None),
            alerts,
            state,
        }
    }

    pub fn from_config(config: &DappConfig, alerts: Arc<dyn AlertSink>) -> Result<Self, DappError> {
        Ok(Self::new(config.contract_address()?, &config.network, alerts))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Installs the wallet connector. Only the first call has an effect.
    pub fn initialize(&self, connector: Arc<dyn WalletExtension>) -> bool {
        match self.connector.set(connector) {
            Ok(()) => {
                debug!("Wallet connector initialized");
                true
            }
            Err(_) => {
                debug!("Wallet connector already initialized, ignoring");
                false
            }
        }
    }

    /// Startup effect: initialize the connector and connect unless the
    /// session is already connected.
    pub async fn on_page_load(&self, connector: Arc<dyn WalletExtension>) -> bool {
        if self.state.borrow().connected {
            return true;
        }
        self.initialize(connector);
        self.connect().await
    }

    /// Connects the wallet, then refreshes membership and the whitelist count.
    ///
    /// Returns whether the session ended up connected.
    pub async fn connect(&self) -> bool {
        let installed = self.connector.get().map(|c| c.is_installed()).unwrap_or(false);
        if !installed {
            warn!("connect aborted: no wallet extension");
            self.alerts.alert(NO_WALLET_ALERT);
            return false;
        }

        if let Err(e) = self.acquire_provider().await {
            log_failure("connect", &e);
            return false;
        }

        self.state.send_modify(|s| s.connected = true);
        info!("Wallet session connected");

        let (whitelisted, count) =
            tokio::join!(self.check_membership(), self.fetch_whitelist_count());
        debug!(whitelisted, count, "Post-connect refresh finished");
        true
    }

    /// Obtains a handle to the wallet, rejecting any chain other than the
    /// required one.
    pub async fn acquire_handle(&self, needs_signer: bool) -> Result<ChainHandle, DappError> {
        if needs_signer {
            Ok(ChainHandle::Signing(self.acquire_signer().await?))
        } else {
            Ok(ChainHandle::ReadOnly(self.acquire_provider().await?))
        }
    }

    /// Reads the whitelist count. On failure the previous count is kept and returned.
    pub async fn fetch_whitelist_count(&self) -> u64 {
        match self.try_fetch_whitelist_count().await {
            Ok(count) => {
                self.state.send_if_modified(|s| {
                    let changed = s.whitelist_count != count;
                    s.whitelist_count = count;
                    changed
                });
                count
            }
            Err(e) => {
                log_failure("fetch_whitelist_count", &e);
                self.state.borrow().whitelist_count
            }
        }
    }

    /// Checks whether the connected account is whitelisted. On failure the
    /// previous flag is kept and returned.
    pub async fn check_membership(&self) -> bool {
        match self.try_check_membership().await {
            Ok((account, whitelisted)) => {
                self.state.send_modify(|s| {
                    s.account = Some(account);
                    s.whitelisted = whitelisted;
                });
                whitelisted
            }
            Err(e) => {
                log_failure("check_membership", &e);
                self.state.borrow().whitelisted
            }
        }
    }

    /// Sends the join transaction and waits for it to be mined.
    ///
    /// `loading` is set while the transaction is pending and is cleared on
    /// every exit path.
    pub async fn join_whitelist(&self) -> Option<TxConfirmation> {
        match self.try_join_whitelist().await {
            Ok(confirmation) => Some(confirmation),
            Err(e) => {
                self.set_loading(false);
                log_failure("join_whitelist", &e);
                None
            }
        }
    }

    async fn try_fetch_whitelist_count(&self) -> Result<u64, DappError> {
        let provider = self.acquire_provider().await?;
        provider.whitelist(self.contract).num_addresses_whitelisted().await
    }

    async fn try_check_membership(&self) -> Result<(Address, bool), DappError> {
        let signer = self.acquire_signer().await?;
        let account = signer.address().await?;
        let whitelisted = signer.whitelist(self.contract).whitelisted_addresses(account).await?;
        debug!(account = ?account, whitelisted, "Membership checked");
        Ok((account, whitelisted))
    }

    async fn try_join_whitelist(&self) -> Result<TxConfirmation, DappError> {
        let signer = self.acquire_signer().await?;
        let whitelist = signer.whitelist(self.contract);

        let tx_hash = whitelist.add_address_to_whitelist().await?;
        self.set_loading(true);
        info!(tx_hash = ?tx_hash, "Join transaction pending");

        let confirmation = whitelist.wait_for_confirmation(tx_hash).await?;
        self.set_loading(false);
        info!(tx_hash = ?tx_hash, block = ?confirmation.block_number, "Join transaction confirmed");

        self.fetch_whitelist_count().await;
        self.state.send_modify(|s| s.whitelisted = true);
        Ok(confirmation)
    }

    async fn acquire_signer(&self) -> Result<Arc<dyn WalletSigner>, DappError> {
        let provider = self.acquire_provider().await?;
        provider.signer().await
    }

    async fn acquire_provider(&self) -> Result<Arc<dyn WalletProvider>, DappError> {
        let connector = self.connector.get().ok_or(DappError::NoWalletExtension)?;
        if !connector.is_installed() {
            return Err(DappError::NoWalletExtension);
        }

        // Guard must not live across the connect await.
        let cached = self.provider.lock().clone();
        let provider = match cached {
            Some(p) => p,
            None => {
                let fresh = connector.connect().await?;
                self.provider.lock().get_or_insert(fresh).clone()
            }
        };

        let chain_id = provider.chain_id().await?;
        if chain_id != self.required_chain_id {
            self.alerts.alert(&format!("Change the network to {}", self.network_name));
            return Err(DappError::NetworkMismatch { expected: self.required_chain_id, actual: chain_id });
        }

        self.state.send_if_modified(|s| {
            let changed = s.chain_id != Some(chain_id);
            s.chain_id = Some(chain_id);
            changed
        });
        Ok(provider)
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|s| {
            let changed = s.loading != loading;
            s.loading = loading;
            changed
        });
    }
}

fn log_failure(operation: &str, err: &DappError) {
    if err.is_user_facing() {
        warn!(operation, error = %err, "operation aborted");
    } else {
        error!(operation, error = %err, "operation failed");
    }
}
