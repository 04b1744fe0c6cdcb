//! Managed / un-managed profile list.
//!
//! [`ManagedProfilesList`] is the synchronous state machine; [`ListDriver`]
//! runs its effects against the Lens API and publishes [`View`]s.

pub mod driver;
pub mod state;

pub use driver::{ListDriver, UiEvent};
pub use state::{
    Effect, FetchKind, ListError, ManagedProfilesList, Msg, ToggleKind, ToggleState,
};

use hey_lens::{ManagedProfileVisibility, Profile};

/// Visibility filter for a list mode.
///
/// "Managed" profiles are the ones that are *not* hidden, and the un-managed
/// list is the hidden set. Do not map `managed` to `HiddenOnly`.
pub fn hidden_filter(managed: bool) -> ManagedProfileVisibility {
    if managed {
        ManagedProfileVisibility::NoneHidden
    } else {
        ManagedProfileVisibility::HiddenOnly
    }
}

pub fn error_title(managed: bool) -> &'static str {
    if managed {
        "Failed to load managed profiles"
    } else {
        "Failed to load un-managed profiles"
    }
}

pub fn empty_message(managed: bool) -> &'static str {
    if managed {
        "You are not managing any profiles!"
    } else {
        "You are not un-managing any profiles!"
    }
}

pub fn action_label(managed: bool) -> &'static str {
    if managed { "Un-manage" } else { "Manage" }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub profile: Profile,
    pub action: &'static str,
    pub disabled: bool,
    /// The viewer last signed in with this profile.
    pub last_logged_in: bool,
}

/// What the list renders. Exactly one state at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Error { title: &'static str, message: String },
    Empty { message: &'static str },
    Populated { rows: Vec<Row>, sentinel: bool },
}

impl View {
    pub fn rows(&self) -> &[Row] {
        match self {
            View::Populated { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn has_sentinel(&self) -> bool {
        matches!(self, View::Populated { sentinel: true, .. })
    }
}
