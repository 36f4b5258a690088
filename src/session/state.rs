use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Immutable view of the session, published after every state transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub connected: bool,
    pub whitelisted: bool,
    /// A join transaction is waiting for confirmation.
    pub loading: bool,
    pub whitelist_count: u64,
    /// Last chain id that passed validation.
    pub chain_id: Option<u64>,
    /// Connected account, known once membership has been checked.
    pub account: Option<Address>,
}
