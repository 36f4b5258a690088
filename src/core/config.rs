use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::domain::PrivateKey;
use super::errors::DappError;

pub const CONFIG_PATH_ENV: &str = "WHITELIST_CONFIG";
pub const RPC_URL_ENV: &str = "WHITELIST_RPC_URL";
pub const CONTRACT_ADDRESS_ENV: &str = "WHITELIST_CONTRACT_ADDRESS";
pub const CHAIN_ID_ENV: &str = "WHITELIST_CHAIN_ID";
pub const PRIVATE_KEY_ENV: &str = "WHITELIST_PRIVATE_KEY";

/// Network the whitelist contract is deployed on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "NetworkConfig::default_name")]
    pub name: String,

    #[serde(default = "NetworkConfig::default_rpc_url")]
    pub rpc_url: String,

    /// Chain the wallet must be connected to before any contract call.
    #[serde(default = "NetworkConfig::default_chain_id")]
    pub chain_id: u64,
}

impl NetworkConfig {
    fn default_name() -> String { "rinkeby".to_string() }
    fn default_rpc_url() -> String { "http://127.0.0.1:8545".to_string() }
    fn default_chain_id() -> u64 { 4 }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            rpc_url: Self::default_rpc_url(),
            chain_id: Self::default_chain_id(),
        }
    }
}

/// dApp configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DappConfig {
    /// Deployed whitelist contract.
    #[serde(default)]
    pub contract_address: Option<String>,

    #[serde(default)]
    pub network: NetworkConfig,
}

impl DappConfig {
    pub const DEFAULT_PATH: &'static str = "whitelist.toml";

    pub fn from_toml_str(content: &str) -> Result<Self, DappError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the config file and applies environment overrides.
    ///
    /// The path is taken from `path`, then `WHITELIST_CONFIG`, then
    /// `whitelist.toml`. Only the implicit default path may be absent.
    pub fn load(path: Option<&Path>) -> Result<Self, DappError> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(p) => {
                let content = std::fs::read_to_string(&p).map_err(|e| {
                    DappError::Config(format!("cannot read {}: {}", p.display(), e))
                })?;
                info!(path = %p.display(), "Loaded configuration");
                Self::from_toml_str(&content)?
            }
            None => match std::fs::read_to_string(Self::DEFAULT_PATH) {
                Ok(content) => {
                    info!(path = Self::DEFAULT_PATH, "Loaded configuration");
                    Self::from_toml_str(&content)?
                }
                Err(_) => {
                    debug!("No {} found, using defaults", Self::DEFAULT_PATH);
                    Self::default()
                }
            },
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), DappError> {
        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            self.network.rpc_url = url.trim().to_string();
        }
        if let Ok(addr) = std::env::var(CONTRACT_ADDRESS_ENV) {
            self.contract_address = Some(addr.trim().to_string());
        }
        if let Ok(raw) = std::env::var(CHAIN_ID_ENV) {
            self.network.chain_id = raw
                .trim()
                .parse()
                .map_err(|e| DappError::Config(format!("{} must be an integer: {}", CHAIN_ID_ENV, e)))?;
        }
        Ok(())
    }

    pub fn contract_address(&self) -> Result<Address, DappError> {
        let raw = self
            .contract_address
            .as_deref()
            .ok_or_else(|| DappError::Config("contract_address is not set".to_string()))?;
        Address::from_str(raw.trim())
            .map_err(|e| DappError::InvalidAddress(format!("{}: {}", raw, e)))
    }

    /// Signing key for the local wallet. `None` means no wallet is available.
    pub fn signing_key_from_env() -> Result<Option<PrivateKey>, DappError> {
        let hex_key = match std::env::var(PRIVATE_KEY_ENV) {
            Ok(raw) => Zeroizing::new(raw),
            Err(_) => return Ok(None),
        };
        if hex_key.trim().is_empty() {
            return Ok(None);
        }
        PrivateKey::from_hex(&hex_key).map(Some)
    }
}
