use thiserror::Error;

/// Errors raised while talking to the wallet or the whitelist contract.
#[derive(Debug, Error)]
pub enum DappError {
    /// No wallet is installed or configured; the user has to provide one.
    #[error("No wallet extension available")]
    NoWalletExtension,

    /// The wallet is connected to a different chain than the one required.
    #[error("Network mismatch: expected chain {expected}, wallet is on chain {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    /// RPC failure, rejected request or on-chain revert.
    #[error("Contract call failed: {0}")]
    ContractCallFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidKey(String),
}

impl DappError {
    pub fn contract(message: impl Into<String>) -> Self {
        Self::ContractCallFailure(message.into())
    }

    /// Whether the failure is surfaced to the user as a blocking alert
    /// instead of only being logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, DappError::NoWalletExtension | DappError::NetworkMismatch { .. })
    }
}

impl From<ethers::providers::ProviderError> for DappError {
    fn from(err: ethers::providers::ProviderError) -> Self {
        DappError::ContractCallFailure(err.to_string())
    }
}

impl From<toml::de::Error> for DappError {
    fn from(err: toml::de::Error) -> Self {
        DappError::Config(err.to_string())
    }
}
