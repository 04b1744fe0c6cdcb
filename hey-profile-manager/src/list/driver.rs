use super::state::{Effect, ManagedProfilesList, Msg, ToggleKind};
use super::View;
use crate::account::AccountConnection;
use crate::reporting;
use crate::toast::{Toaster, error_toast};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use hey_lens::{ManagedProfileMutations, ProfileId, ProfilesManagedApi};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Input from whatever renders the list.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SetManaged(bool),
    /// The sentinel after the last row entered (`true`) or left the viewport.
    SentinelVisibility(bool),
    Toggle(ProfileId),
}

impl From<UiEvent> for Msg {
    fn from(event: UiEvent) -> Self {
        match event {
            UiEvent::SetManaged(managed) => Msg::ManagedChanged(managed),
            UiEvent::SentinelVisibility(in_view) => Msg::SentinelVisibility(in_view),
            UiEvent::Toggle(profile_id) => Msg::Toggle(profile_id),
        }
    }
}

type InFlight = FuturesUnordered<BoxFuture<'static, Msg>>;

/// Runs a [`ManagedProfilesList`] against the Lens API.
///
/// All state changes happen on the driver task; requests run concurrently
/// and come back as messages.
pub struct ListDriver<C, T> {
    client: Arc<C>,
    toaster: T,
}

impl<C, T> ListDriver<C, T>
where
    C: ProfilesManagedApi + ManagedProfileMutations + 'static,
    T: Toaster,
{
    pub fn new(client: Arc<C>, toaster: T) -> Self {
        Self { client, toaster }
    }

    /// Mount the list and process events until the UI side hangs up.
    pub async fn run(
        self,
        managed: bool,
        mut events: mpsc::Receiver<UiEvent>,
        mut account: AccountConnection,
        views: watch::Sender<View>,
    ) {
        let (mut list, effects) = ManagedProfilesList::mount(managed, account.address());
        let mut in_flight = InFlight::new();
        self.apply(effects, &mut in_flight);
        views.send_replace(list.view());

        let mut account_open = true;
        loop {
            let msg = tokio::select! {
                Some(msg) = in_flight.next(), if !in_flight.is_empty() => msg,
                event = events.recv() => match event {
                    Some(event) => event.into(),
                    None => break,
                },
                changed = account.changed(), if account_open => match changed {
                    Ok(viewer) => Msg::ViewerChanged(viewer),
                    Err(_) => {
                        tracing::debug!("account connection closed, keeping last viewer");
                        account_open = false;
                        continue;
                    }
                },
            };

            let effects = list.update(msg);
            self.apply(effects, &mut in_flight);
            views.send_replace(list.view());
        }

        if !in_flight.is_empty() {
            tracing::debug!("unmounting with {} request(s) in flight", in_flight.len());
        }
    }

    fn apply(&self, effects: Vec<Effect>, in_flight: &mut InFlight) {
        for effect in effects {
            match effect {
                Effect::Fetch {
                    generation,
                    kind,
                    variables,
                } => {
                    let client = Arc::clone(&self.client);
                    in_flight.push(Box::pin(async move {
                        let _transaction = reporting::start_transaction("ProfilesManaged");
                        let result = client.profiles_managed(&variables).await;
                        Msg::Fetched {
                            generation,
                            kind,
                            result,
                        }
                    }));
                }
                Effect::Hide(request) => {
                    let client = Arc::clone(&self.client);
                    in_flight.push(Box::pin(async move {
                        let _transaction = reporting::start_transaction("HideManagedProfile");
                        let result = client.hide_managed_profile(&request).await;
                        Msg::Toggled {
                            kind: ToggleKind::Hide,
                            profile_id: request.profile_id,
                            result,
                        }
                    }));
                }
                Effect::Unhide(request) => {
                    let client = Arc::clone(&self.client);
                    in_flight.push(Box::pin(async move {
                        let _transaction = reporting::start_transaction("UnhideManagedProfile");
                        let result = client.unhide_managed_profile(&request).await;
                        Msg::Toggled {
                            kind: ToggleKind::Unhide,
                            profile_id: request.profile_id,
                            result,
                        }
                    }));
                }
                Effect::NotifySuccess(message) => self.toaster.success(message),
                Effect::NotifyError(error) => error_toast(&self.toaster, &error),
                Effect::ReportError(error) => {
                    reporting::capture_error(&error);
                }
            }
        }
    }
}
