// filepath: src/blockchain/mock.rs
//! In-memory wallet and whitelist contract.
//!
//! `MockChain` holds the contract state shared by every handle derived from a
//! `MockWallet`, so tests can inspect and steer the chain while a session is
//! talking to it.
use async_trait::async_trait;
use ethers::types::{Address, H256};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::traits::{
    TxConfirmation, WalletExtension, WalletProvider, WalletSigner, WhitelistReader,
    WhitelistWriter,
};
use crate::core::errors::DappError;

/// Deterministic test account.
pub fn account(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

#[derive(Debug, Default)]
struct MockChainState {
    chain_id: u64,
    count: u64,
    members: HashSet<Address>,
    pending: HashMap<H256, Address>,
    submitted: Vec<H256>,
    block_number: u64,
    fail_reads: bool,
    reject_join: bool,
    revert_join: bool,
}

/// Shared state of the mock chain and its whitelist contract.
#[derive(Debug, Clone, Default)]
pub struct MockChain {
    state: Arc<Mutex<MockChainState>>,
}

impl MockChain {
    pub fn new(chain_id: u64, count: u64) -> Self {
        let chain = Self::default();
        {
            let mut state = chain.state.lock();
            state.chain_id = chain_id;
            state.count = count;
        }
        chain
    }

    /// Marks `member` as already whitelisted. Does not change the counter.
    pub fn with_member(self, member: Address) -> Self {
        self.state.lock().members.insert(member);
        self
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state.lock().chain_id = chain_id;
    }

    pub fn set_count(&self, count: u64) {
        self.state.lock().count = count;
    }

    /// Makes every view call fail as if the RPC node were unreachable.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Makes the wallet refuse to sign the join transaction.
    pub fn set_reject_join(&self, reject: bool) {
        self.state.lock().reject_join = reject;
    }

    /// Makes the join transaction revert once mined.
    pub fn set_revert_join(&self, revert: bool) {
        self.state.lock().revert_join = revert;
    }

    pub fn count(&self) -> u64 {
        self.state.lock().count
    }

    pub fn is_member(&self, member: &Address) -> bool {
        self.state.lock().members.contains(member)
    }

    pub fn submitted_transactions(&self) -> Vec<H256> {
        self.state.lock().submitted.clone()
    }
}

/// Wallet extension over a `MockChain`.
pub struct MockWallet {
    installed: bool,
    account: Address,
    chain: MockChain,
    connects: AtomicUsize,
}

impl MockWallet {
    pub fn new(chain: MockChain, account: Address) -> Self {
        Self { installed: true, account, chain, connects: AtomicUsize::new(0) }
    }

    /// A wallet that reports itself as absent.
    pub fn not_installed(chain: MockChain) -> Self {
        Self { installed: false, account: Address::zero(), chain, connects: AtomicUsize::new(0) }
    }

    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletExtension for MockWallet {
    fn is_installed(&self) -> bool {
        self.installed
    }

    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, DappError> {
        if !self.installed {
            return Err(DappError::NoWalletExtension);
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockRpc { chain: self.chain.clone(), account: self.account }))
    }
}

struct MockRpc {
    chain: MockChain,
    account: Address,
}

#[async_trait]
impl WalletProvider for MockRpc {
    async fn chain_id(&self) -> Result<u64, DappError> {
        Ok(self.chain.state.lock().chain_id)
    }

    async fn signer(&self) -> Result<Arc<dyn WalletSigner>, DappError> {
        Ok(Arc::new(MockSigner { chain: self.chain.clone(), account: self.account }))
    }

    fn whitelist(&self, _contract: Address) -> Arc<dyn WhitelistReader> {
        Arc::new(MockWhitelist { chain: self.chain.clone(), caller: None })
    }
}

struct MockSigner {
    chain: MockChain,
    account: Address,
}

#[async_trait]
impl WalletSigner for MockSigner {
    async fn address(&self) -> Result<Address, DappError> {
        Ok(self.account)
    }

    fn whitelist(&self, _contract: Address) -> Arc<dyn WhitelistWriter> {
        Arc::new(MockWhitelist { chain: self.chain.clone(), caller: Some(self.account) })
    }
}

struct MockWhitelist {
    chain: MockChain,
    caller: Option<Address>,
}

#[async_trait]
impl WhitelistReader for MockWhitelist {
    async fn num_addresses_whitelisted(&self) -> Result<u64, DappError> {
        let state = self.chain.state.lock();
        if state.fail_reads {
            return Err(DappError::contract("mock rpc unavailable"));
        }
        Ok(state.count)
    }

    async fn whitelisted_addresses(&self, account: Address) -> Result<bool, DappError> {
        let state = self.chain.state.lock();
        if state.fail_reads {
            return Err(DappError::contract("mock rpc unavailable"));
        }
        Ok(state.members.contains(&account))
    }
}

#[async_trait]
impl WhitelistWriter for MockWhitelist {
    async fn add_address_to_whitelist(&self) -> Result<H256, DappError> {
        let caller = self.caller.ok_or_else(|| DappError::contract("read-only handle cannot send"))?;
        let mut state = self.chain.state.lock();
        if state.reject_join {
            return Err(DappError::contract("user rejected transaction"));
        }
        let tx_hash = H256::from_low_u64_be(state.submitted.len() as u64 + 1);
        state.submitted.push(tx_hash);
        state.pending.insert(tx_hash, caller);
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: H256) -> Result<TxConfirmation, DappError> {
        let mut state = self.chain.state.lock();
        let caller = state
            .pending
            .remove(&tx_hash)
            .ok_or_else(|| DappError::contract(format!("unknown transaction {:?}", tx_hash)))?;
        state.block_number += 1;
        if state.revert_join {
            return Err(DappError::contract(format!("transaction {:?} reverted", tx_hash)));
        }
        if !state.members.insert(caller) {
            return Err(DappError::contract("Sender has already been whitelisted"));
        }
        state.count += 1;
        Ok(TxConfirmation { tx_hash, block_number: Some(state.block_number) })
    }
}
