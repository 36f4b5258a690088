pub mod ethereum;
pub mod mock;
pub mod traits;

pub use traits::{
    TxConfirmation, WalletExtension, WalletProvider, WalletSigner, WhitelistReader,
    WhitelistWriter,
};
