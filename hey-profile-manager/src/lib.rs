pub mod account;
pub mod config;
pub mod list;
pub mod reporting;
pub mod terminal;
pub mod toast;

pub use list::{ListDriver, ManagedProfilesList, UiEvent, View};
pub use toast::Toaster;
