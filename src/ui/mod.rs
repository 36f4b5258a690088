//! Text rendering of the whitelist page.
use std::fmt;

use crate::session::SessionSnapshot;

pub const TITLE: &str = "Welcome to Crypto Devs!";
pub const TAGLINE: &str = "Its an NFT collection for developers in Crypto.";
pub const FOOTER: &str = "Made with love by Crypto Devs";

/// The single call to action shown on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    ConnectWallet,
    JoinWhitelist,
    Loading,
    Joined,
}

impl ButtonState {
    /// Derived from the connected, whitelisted and loading flags only.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        if !snapshot.connected {
            ButtonState::ConnectWallet
        } else if snapshot.whitelisted {
            ButtonState::Joined
        } else if snapshot.loading {
            ButtonState::Loading
        } else {
            ButtonState::JoinWhitelist
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ButtonState::ConnectWallet => "Connect your wallet",
            ButtonState::JoinWhitelist => "Join the Whitelist",
            ButtonState::Loading => "Loading...",
            ButtonState::Joined => "Thanks for joining the Whitelist!",
        }
    }

    /// `Joined` is a plain message, everything else is clickable.
    pub fn is_button(&self) -> bool {
        !matches!(self, ButtonState::Joined)
    }
}

impl fmt::Display for ButtonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_button() {
            write!(f, "[ {} ]", self.label())
        } else {
            f.write_str(self.label())
        }
    }
}

pub fn joined_line(count: u64) -> String {
    format!("{} have already joined the Whitelist", count)
}

/// Renders the whole page for a snapshot.
pub fn render_page(snapshot: &SessionSnapshot) -> String {
    let button = ButtonState::from_snapshot(snapshot);
    [
        TITLE.to_string(),
        TAGLINE.to_string(),
        joined_line(snapshot.whitelist_count),
        button.to_string(),
        String::new(),
        FOOTER.to_string(),
    ]
    .join("\n")
}
