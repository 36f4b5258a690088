pub mod alert;
pub mod controller;
pub mod state;

pub use alert::{AlertSink, ConsoleAlert, RecordingAlerts};
pub use controller::{ChainHandle, WalletSession};
pub use state::SessionSnapshot;
