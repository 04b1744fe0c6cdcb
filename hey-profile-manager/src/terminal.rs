use crate::list::View;
use crate::toast::Toaster;
use clap::{CommandFactory, Parser, Subcommand};
use hey_lens::{EvmAddress, ProfileId};
use std::fmt::Write;
use std::str::FromStr;

/// One line typed at the `profile-manager` prompt.
#[derive(Parser, Debug)]
#[command(
    name = ">",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true,
    help_template = "commands:\n{subcommands}"
)]
pub struct Prompt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load the next page
    #[command(visible_alias = "m")]
    More,

    /// Manage or un-manage a profile
    #[command(visible_alias = "t")]
    Toggle {
        /// 1-based row number or profile id
        target: String,
    },

    /// Switch to the managed list
    Managed,

    /// Switch to the un-managed list
    Unmanaged,

    /// Connect a wallet address
    Connect { address: EvmAddress },

    /// Disconnect the wallet
    Disconnect,

    /// Exit
    #[command(visible_aliases = ["exit", "q"])]
    Quit,
}

impl FromStr for Command {
    type Err = clap::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Prompt::try_parse_from(line.split_whitespace()).map(|prompt| prompt.command)
    }
}

/// Command list shown at startup and for `help`.
pub fn help() -> String {
    Prompt::command().render_help().to_string()
}

/// Resolve a toggle target against the rows currently on screen.
pub fn resolve_toggle(view: &View, target: &str) -> Option<ProfileId> {
    let rows = view.rows();
    if let Ok(index) = target.parse::<usize>() {
        if let Some(row) = index.checked_sub(1).and_then(|i| rows.get(i)) {
            return Some(row.profile.id.clone());
        }
    }
    rows.iter()
        .find(|row| row.profile.id.as_str() == target)
        .map(|row| row.profile.id.clone())
}

pub fn render(view: &View, managed: bool) -> String {
    let mut out = String::new();
    let heading = if managed {
        "Managed profiles"
    } else {
        "Un-managed profiles"
    };
    let _ = writeln!(out, "== {heading} ==");

    match view {
        View::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        View::Error { title, message } => {
            let _ = writeln!(out, "{title}");
            let _ = writeln!(out, "  {message}");
        }
        View::Empty { message } => {
            let _ = writeln!(out, "{message}");
        }
        View::Populated { rows, sentinel } => {
            for (i, row) in rows.iter().enumerate() {
                let handle = row
                    .profile
                    .handle
                    .as_ref()
                    .map(|h| format!(" @{}", h.full_handle))
                    .unwrap_or_default();
                let action = if row.disabled {
                    format!("({})", row.action)
                } else {
                    format!("[{}]", row.action)
                };
                let marker = if row.last_logged_in {
                    " *last logged in*"
                } else {
                    ""
                };
                let _ = writeln!(
                    out,
                    "{:>3}. {}{} ({}) {}{}",
                    i + 1,
                    row.profile.display_name(),
                    handle,
                    row.profile.id,
                    action,
                    marker
                );
            }
            if *sentinel {
                let _ = writeln!(out, "  ... type `more` to load more");
            }
        }
    }
    out
}

/// Prints toasts on stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalToaster;

impl Toaster for TerminalToaster {
    fn success(&self, message: &str) {
        println!("✓ {message}");
    }

    fn error(&self, message: &str) {
        println!("✗ {message}");
    }
}
