use super::{Row, View, action_label, empty_message, error_title, hidden_filter};
use hey_lens::{
    EvmAddress, HideManagedProfileRequest, LensError, Profile, ProfileId, ProfilesManagedData,
    ProfilesManagedVariables, UnhideManagedProfileRequest,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    #[error(transparent)]
    Lens(#[from] LensError),
    #[error("wallet is not connected")]
    NotConnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page for a new viewer or mode. Shows the loading state.
    Initial,
    /// First page again after a mutation. Keeps the current page on screen.
    Refetch,
    /// Next page, appended to the current one.
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleKind {
    Hide,
    Unhide,
}

impl ToggleKind {
    pub fn for_mode(managed: bool) -> Self {
        if managed {
            ToggleKind::Hide
        } else {
            ToggleKind::Unhide
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            ToggleKind::Hide => "Profile is now un-managed",
            ToggleKind::Unhide => "Profile is now managed",
        }
    }
}

/// In-flight mutations. Any of them locks every row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToggleState {
    pub hiding: bool,
    pub unhiding: bool,
}

impl ToggleState {
    pub fn busy(&self) -> bool {
        self.hiding || self.unhiding
    }
}

#[derive(Debug)]
pub enum Msg {
    ViewerChanged(Option<EvmAddress>),
    ManagedChanged(bool),
    SentinelVisibility(bool),
    Toggle(ProfileId),
    Fetched {
        generation: u64,
        kind: FetchKind,
        result: Result<ProfilesManagedData, LensError>,
    },
    Toggled {
        kind: ToggleKind,
        profile_id: ProfileId,
        result: Result<(), LensError>,
    },
}

#[derive(Debug)]
pub enum Effect {
    Fetch {
        generation: u64,
        kind: FetchKind,
        variables: ProfilesManagedVariables,
    },
    Hide(HideManagedProfileRequest),
    Unhide(UnhideManagedProfileRequest),
    NotifySuccess(&'static str),
    NotifyError(LensError),
    ReportError(LensError),
}

#[derive(Debug, Clone, PartialEq)]
struct Page {
    items: Vec<Profile>,
    next: Option<String>,
    last_logged_in: Option<ProfileId>,
}

impl From<ProfilesManagedData> for Page {
    fn from(data: ProfilesManagedData) -> Self {
        Self {
            items: data.profiles_managed.items,
            next: data.profiles_managed.page_info.next,
            last_logged_in: data.last_logged_in_profile.map(|profile| profile.id),
        }
    }
}

#[derive(Debug)]
enum Query {
    Loading,
    Failed(ListError),
    Ready(Page),
}

#[derive(Debug)]
pub struct ManagedProfilesList {
    managed: bool,
    viewer: Option<EvmAddress>,
    generation: u64,
    query: Query,
    in_flight: Option<FetchKind>,
    toggle: ToggleState,
}

impl ManagedProfilesList {
    pub fn mount(managed: bool, viewer: Option<EvmAddress>) -> (Self, Vec<Effect>) {
        let mut list = Self {
            managed,
            viewer,
            generation: 0,
            query: Query::Loading,
            in_flight: None,
            toggle: ToggleState::default(),
        };
        let effects = list.start(FetchKind::Initial);
        (list, effects)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle
    }

    pub fn in_flight(&self) -> Option<FetchKind> {
        self.in_flight
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::ViewerChanged(viewer) => {
                if viewer == self.viewer {
                    return Vec::new();
                }
                self.viewer = viewer;
                self.start(FetchKind::Initial)
            }
            Msg::ManagedChanged(managed) => {
                if managed == self.managed {
                    return Vec::new();
                }
                self.managed = managed;
                self.start(FetchKind::Initial)
            }
            Msg::SentinelVisibility(in_view) => self.fetch_more(in_view),
            Msg::Toggle(profile_id) => self.toggle(profile_id),
            Msg::Fetched {
                generation,
                kind,
                result,
            } => self.fetched(generation, kind, result),
            Msg::Toggled {
                kind,
                profile_id,
                result,
            } => self.toggled(kind, profile_id, result),
        }
    }

    pub fn view(&self) -> View {
        match &self.query {
            Query::Loading => View::Loading,
            Query::Failed(error) => View::Error {
                title: error_title(self.managed),
                message: error.to_string(),
            },
            Query::Ready(page) if page.items.is_empty() => View::Empty {
                message: empty_message(self.managed),
            },
            Query::Ready(page) => View::Populated {
                rows: page
                    .items
                    .iter()
                    .map(|profile| Row {
                        profile: profile.clone(),
                        action: action_label(self.managed),
                        disabled: self.toggle.busy(),
                        last_logged_in: page.last_logged_in.as_ref() == Some(&profile.id),
                    })
                    .collect(),
                sentinel: page.next.is_some(),
            },
        }
    }

    fn variables(&self, cursor: Option<String>) -> Option<ProfilesManagedVariables> {
        let viewer = self.viewer.clone()?;
        Some(ProfilesManagedVariables::new(
            viewer,
            hidden_filter(self.managed),
            cursor,
        ))
    }

    /// Begin a new first-page request. Results of older generations are dropped.
    fn start(&mut self, kind: FetchKind) -> Vec<Effect> {
        self.generation += 1;
        self.in_flight = None;

        let Some(variables) = self.variables(None) else {
            self.query = Query::Failed(ListError::NotConnected);
            return Vec::new();
        };

        if kind == FetchKind::Initial {
            self.query = Query::Loading;
        }
        self.in_flight = Some(kind);
        vec![Effect::Fetch {
            generation: self.generation,
            kind,
            variables,
        }]
    }

    fn fetch_more(&mut self, in_view: bool) -> Vec<Effect> {
        if !in_view || self.in_flight.is_some() {
            return Vec::new();
        }
        let cursor = match &self.query {
            Query::Ready(page) if !page.items.is_empty() => page.next.clone(),
            _ => None,
        };
        let Some(variables) = cursor.and_then(|cursor| self.variables(Some(cursor))) else {
            return Vec::new();
        };

        self.in_flight = Some(FetchKind::More);
        vec![Effect::Fetch {
            generation: self.generation,
            kind: FetchKind::More,
            variables,
        }]
    }

    fn fetched(
        &mut self,
        generation: u64,
        kind: FetchKind,
        result: Result<ProfilesManagedData, LensError>,
    ) -> Vec<Effect> {
        if generation != self.generation {
            tracing::debug!(
                "discarding {:?} result from generation {} (current {})",
                kind,
                generation,
                self.generation
            );
            return Vec::new();
        }
        self.in_flight = None;

        match (kind, result) {
            (FetchKind::More, Ok(data)) => {
                if let Query::Ready(page) = &mut self.query {
                    page.items.extend(data.profiles_managed.items);
                    page.next = data.profiles_managed.page_info.next;
                    page.last_logged_in = data.last_logged_in_profile.map(|profile| profile.id);
                }
                Vec::new()
            }
            (FetchKind::More, Err(error)) => {
                tracing::warn!("failed to load next page of managed profiles: {}", error);
                vec![Effect::ReportError(error)]
            }
            (_, Ok(data)) => {
                self.query = Query::Ready(Page::from(data));
                Vec::new()
            }
            (_, Err(error)) => {
                self.query = Query::Failed(error.into());
                Vec::new()
            }
        }
    }

    fn toggle(&mut self, profile_id: ProfileId) -> Vec<Effect> {
        if self.toggle.busy() {
            tracing::debug!("ignoring toggle of {}: a toggle is in flight", profile_id);
            return Vec::new();
        }
        let listed = match &self.query {
            Query::Ready(page) => page.items.iter().any(|p| p.id == profile_id),
            _ => false,
        };
        if !listed {
            tracing::debug!("ignoring toggle of {}: not listed", profile_id);
            return Vec::new();
        }

        match ToggleKind::for_mode(self.managed) {
            ToggleKind::Hide => {
                self.toggle.hiding = true;
                vec![Effect::Hide(HideManagedProfileRequest { profile_id })]
            }
            ToggleKind::Unhide => {
                self.toggle.unhiding = true;
                vec![Effect::Unhide(UnhideManagedProfileRequest { profile_id })]
            }
        }
    }

    fn toggled(
        &mut self,
        kind: ToggleKind,
        profile_id: ProfileId,
        result: Result<(), LensError>,
    ) -> Vec<Effect> {
        match kind {
            ToggleKind::Hide => self.toggle.hiding = false,
            ToggleKind::Unhide => self.toggle.unhiding = false,
        }

        match result {
            Ok(()) => {
                tracing::info!("{:?} of profile {} succeeded", kind, profile_id);
                let mut effects = vec![Effect::NotifySuccess(kind.success_message())];
                effects.extend(self.start(FetchKind::Refetch));
                effects
            }
            Err(error) => {
                tracing::warn!("{:?} of profile {} failed: {}", kind, profile_id, error);
                vec![Effect::NotifyError(error)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hey_lens::{
        ManagedProfileVisibility, PaginatedProfileResult, PaginatedResultInfo, types::NetworkAddress,
    };

    fn viewer() -> EvmAddress {
        "0x7b1f7c6fa8e3c2b9d3e1a1f2b6c5d4e3f2a1b0c9".parse().unwrap()
    }

    fn profile(id: &str) -> Profile {
        Profile {
            id: ProfileId::new(id),
            owned_by: NetworkAddress {
                address: viewer(),
                chain_id: 137,
            },
            handle: None,
            metadata: None,
        }
    }

    fn data(ids: &[&str], next: Option<&str>) -> ProfilesManagedData {
        ProfilesManagedData {
            profiles_managed: PaginatedProfileResult {
                items: ids.iter().map(|id| profile(id)).collect(),
                page_info: PaginatedResultInfo {
                    next: next.map(str::to_string),
                    prev: None,
                },
            },
            last_logged_in_profile: None,
        }
    }

    fn ids(view: &View) -> Vec<&str> {
        view.rows().iter().map(|r| r.profile.id.as_str()).collect()
    }

    fn single_fetch(effects: Vec<Effect>) -> (u64, FetchKind, ProfilesManagedVariables) {
        assert_eq!(effects.len(), 1, "expected one effect, got {effects:?}");
        match effects.into_iter().next() {
            Some(Effect::Fetch {
                generation,
                kind,
                variables,
            }) => (generation, kind, variables),
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    /// Mounted list whose first page has been loaded.
    fn loaded(managed: bool, ids: &[&str], next: Option<&str>) -> ManagedProfilesList {
        let (mut list, effects) = ManagedProfilesList::mount(managed, Some(viewer()));
        let (generation, kind, _) = single_fetch(effects);
        assert!(
            list.update(Msg::Fetched {
                generation,
                kind,
                result: Ok(data(ids, next)),
            })
            .is_empty()
        );
        list
    }

    fn lens_error(message: &str) -> LensError {
        LensError::GraphQl(vec![hey_lens::GraphQlError {
            message: message.to_string(),
            path: None,
            extensions: None,
        }])
    }

    #[test]
    fn test_mount_fetches_first_page_with_inverted_filter() {
        for (managed, filter) in [
            (true, ManagedProfileVisibility::NoneHidden),
            (false, ManagedProfileVisibility::HiddenOnly),
        ] {
            let (list, effects) = ManagedProfilesList::mount(managed, Some(viewer()));
            let (_, kind, variables) = single_fetch(effects);

            assert_eq!(kind, FetchKind::Initial);
            assert_eq!(variables.profiles_managed_request.hidden_filter, filter);
            assert_eq!(variables.profiles_managed_request.for_, viewer());
            assert!(variables.profiles_managed_request.cursor.is_none());
            assert_eq!(variables.last_logged_in_profile_request.for_, viewer());
            assert_eq!(list.view(), View::Loading);
        }
    }

    #[test]
    fn test_empty_page_renders_mode_specific_empty_state() {
        let list = loaded(true, &[], None);
        assert_eq!(
            list.view(),
            View::Empty {
                message: "You are not managing any profiles!"
            }
        );

        let list = loaded(false, &[], Some("c1"));
        assert_eq!(
            list.view(),
            View::Empty {
                message: "You are not un-managing any profiles!"
            }
        );
    }

    #[test]
    fn test_query_error_renders_error_state() {
        let (mut list, effects) = ManagedProfilesList::mount(false, Some(viewer()));
        let (generation, kind, _) = single_fetch(effects);
        list.update(Msg::Fetched {
            generation,
            kind,
            result: Err(lens_error("rate limited")),
        });

        assert_eq!(
            list.view(),
            View::Error {
                title: "Failed to load un-managed profiles",
                message: "rate limited".to_string(),
            }
        );
        assert!(list.view().rows().is_empty());
    }

    #[test]
    fn test_missing_viewer_is_an_error_without_request() {
        let (mut list, effects) = ManagedProfilesList::mount(true, None);
        assert!(effects.is_empty());
        assert_eq!(
            list.view(),
            View::Error {
                title: "Failed to load managed profiles",
                message: "wallet is not connected".to_string(),
            }
        );

        let (_, kind, variables) = single_fetch(list.update(Msg::ViewerChanged(Some(viewer()))));
        assert_eq!(kind, FetchKind::Initial);
        assert_eq!(variables.profiles_managed_request.for_, viewer());
        assert_eq!(list.view(), View::Loading);
    }

    #[test]
    fn test_populated_rows_use_mode_label() {
        let list = loaded(true, &["A", "B"], None);
        let view = list.view();

        assert_eq!(ids(&view), vec!["A", "B"]);
        assert!(view.rows().iter().all(|r| r.action == "Un-manage" && !r.disabled));
        assert!(!view.has_sentinel());

        let list = loaded(false, &["A"], None);
        assert!(list.view().rows().iter().all(|r| r.action == "Manage"));
    }

    #[test]
    fn test_fetch_more_appends_and_drops_sentinel() {
        let mut list = loaded(true, &["A", "B"], Some("c1"));
        assert!(list.view().has_sentinel());

        let (generation, kind, variables) = single_fetch(list.update(Msg::SentinelVisibility(true)));
        assert_eq!(kind, FetchKind::More);
        assert_eq!(variables.profiles_managed_request.cursor.as_deref(), Some("c1"));
        assert_eq!(
            variables.profiles_managed_request.hidden_filter,
            ManagedProfileVisibility::NoneHidden
        );

        list.update(Msg::Fetched {
            generation,
            kind,
            result: Ok(data(&["C"], None)),
        });

        let view = list.view();
        assert_eq!(ids(&view), vec!["A", "B", "C"]);
        assert!(!view.has_sentinel());
        assert!(list.update(Msg::SentinelVisibility(true)).is_empty());
    }

    #[test]
    fn test_sentinel_leaving_view_does_nothing() {
        let mut list = loaded(true, &["A"], Some("c1"));
        assert!(list.update(Msg::SentinelVisibility(false)).is_empty());
    }

    #[test]
    fn test_duplicate_fetch_more_is_suppressed_while_in_flight() {
        let mut list = loaded(true, &["A"], Some("c1"));

        single_fetch(list.update(Msg::SentinelVisibility(true)));
        assert!(list.update(Msg::SentinelVisibility(false)).is_empty());
        assert!(list.update(Msg::SentinelVisibility(true)).is_empty());
        assert_eq!(list.in_flight(), Some(FetchKind::More));
    }

    #[test]
    fn test_fetch_more_failure_keeps_items_and_allows_retry() {
        let mut list = loaded(true, &["A"], Some("c1"));
        let (generation, kind, _) = single_fetch(list.update(Msg::SentinelVisibility(true)));

        let effects = list.update(Msg::Fetched {
            generation,
            kind,
            result: Err(lens_error("timeout")),
        });
        assert!(matches!(effects.as_slice(), [Effect::ReportError(_)]));
        assert_eq!(ids(&list.view()), vec!["A"]);
        assert!(list.view().has_sentinel());

        let (_, kind, _) = single_fetch(list.update(Msg::SentinelVisibility(true)));
        assert_eq!(kind, FetchKind::More);
    }

    #[test]
    fn test_hide_when_managed_then_notify_and_refetch() {
        let mut list = loaded(true, &["X", "Y"], Some("c1"));

        let effects = list.update(Msg::Toggle(ProfileId::new("X")));
        match effects.as_slice() {
            [Effect::Hide(request)] => assert_eq!(request.profile_id, ProfileId::new("X")),
            other => panic!("expected hide, got {other:?}"),
        }
        assert!(list.toggle_state().hiding);

        let effects = list.update(Msg::Toggled {
            kind: ToggleKind::Hide,
            profile_id: ProfileId::new("X"),
            result: Ok(()),
        });
        assert_eq!(effects.len(), 2);
        assert!(matches!(
            effects[0],
            Effect::NotifySuccess("Profile is now un-managed")
        ));
        match &effects[1] {
            Effect::Fetch {
                kind: FetchKind::Refetch,
                variables,
                ..
            } => {
                assert!(variables.profiles_managed_request.cursor.is_none());
                assert_eq!(
                    variables.profiles_managed_request.hidden_filter,
                    ManagedProfileVisibility::NoneHidden
                );
            }
            other => panic!("expected refetch, got {other:?}"),
        }
        assert!(!list.toggle_state().busy());
        // the stale page stays visible until the refetch lands
        assert_eq!(ids(&list.view()), vec!["X", "Y"]);
    }

    #[test]
    fn test_unhide_when_unmanaged() {
        let mut list = loaded(false, &["X"], None);

        let effects = list.update(Msg::Toggle(ProfileId::new("X")));
        assert!(matches!(effects.as_slice(), [Effect::Unhide(_)]));
        assert!(list.toggle_state().unhiding);

        let effects = list.update(Msg::Toggled {
            kind: ToggleKind::Unhide,
            profile_id: ProfileId::new("X"),
            result: Ok(()),
        });
        assert!(matches!(
            effects.as_slice(),
            [
                Effect::NotifySuccess("Profile is now managed"),
                Effect::Fetch {
                    kind: FetchKind::Refetch,
                    ..
                }
            ]
        ));
    }

    #[test]
    fn test_toggle_is_locked_globally_while_in_flight() {
        let mut list = loaded(true, &["X", "Y"], None);
        assert_eq!(list.update(Msg::Toggle(ProfileId::new("X"))).len(), 1);

        assert!(list.update(Msg::Toggle(ProfileId::new("Y"))).is_empty());
        assert!(list.update(Msg::Toggle(ProfileId::new("X"))).is_empty());
        assert!(list.view().rows().iter().all(|r| r.disabled));

        list.update(Msg::Toggled {
            kind: ToggleKind::Hide,
            profile_id: ProfileId::new("X"),
            result: Err(lens_error("nope")),
        });
        assert!(list.view().rows().iter().all(|r| !r.disabled));
        assert_eq!(list.update(Msg::Toggle(ProfileId::new("Y"))).len(), 1);
    }

    #[test]
    fn test_mutation_failure_notifies_without_refetch() {
        let mut list = loaded(true, &["X", "Y"], None);
        let before = list.view();
        let generation = list.generation();

        list.update(Msg::Toggle(ProfileId::new("X")));
        let effects = list.update(Msg::Toggled {
            kind: ToggleKind::Hide,
            profile_id: ProfileId::new("X"),
            result: Err(lens_error("Profile is not managed by you")),
        });

        assert!(matches!(effects.as_slice(), [Effect::NotifyError(_)]));
        assert_eq!(list.generation(), generation);
        assert_eq!(list.view(), before);
    }

    #[test]
    fn test_toggle_of_unlisted_profile_is_ignored() {
        let mut list = loaded(true, &["X"], None);
        assert!(list.update(Msg::Toggle(ProfileId::new("Z"))).is_empty());

        let (mut loading, _) = ManagedProfilesList::mount(true, Some(viewer()));
        assert!(loading.update(Msg::Toggle(ProfileId::new("X"))).is_empty());
    }

    #[test]
    fn test_mode_change_discards_stale_first_page() {
        let (mut list, effects) = ManagedProfilesList::mount(true, Some(viewer()));
        let (stale, kind, _) = single_fetch(effects);

        let (current, _, variables) = single_fetch(list.update(Msg::ManagedChanged(false)));
        assert_eq!(
            variables.profiles_managed_request.hidden_filter,
            ManagedProfileVisibility::HiddenOnly
        );

        list.update(Msg::Fetched {
            generation: current,
            kind,
            result: Ok(data(&["hidden"], None)),
        });
        list.update(Msg::Fetched {
            generation: stale,
            kind,
            result: Ok(data(&["visible"], None)),
        });

        assert_eq!(ids(&list.view()), vec!["hidden"]);
        assert!(list.view().rows().iter().all(|r| r.action == "Manage"));
    }

    #[test]
    fn test_fetch_more_after_mode_change_is_discarded() {
        let mut list = loaded(true, &["A"], Some("c1"));
        let (more, kind, _) = single_fetch(list.update(Msg::SentinelVisibility(true)));

        let (current, initial, _) = single_fetch(list.update(Msg::ManagedChanged(false)));
        assert_eq!(list.view(), View::Loading);

        list.update(Msg::Fetched {
            generation: more,
            kind,
            result: Ok(data(&["B"], None)),
        });
        assert_eq!(list.view(), View::Loading);

        list.update(Msg::Fetched {
            generation: current,
            kind: initial,
            result: Ok(data(&["H"], None)),
        });
        assert_eq!(ids(&list.view()), vec!["H"]);
    }

    #[test]
    fn test_same_mode_or_viewer_does_not_refetch() {
        let mut list = loaded(true, &["A"], None);
        assert!(list.update(Msg::ManagedChanged(true)).is_empty());
        assert!(list.update(Msg::ViewerChanged(Some(viewer()))).is_empty());
        assert_eq!(ids(&list.view()), vec!["A"]);
    }

    #[test]
    fn test_same_wallet_in_other_case_does_not_refetch() {
        let mut list = loaded(true, &["A"], None);
        let upper: EvmAddress = "0x7B1F7C6FA8E3C2B9D3E1A1F2B6C5D4E3F2A1B0C9".parse().unwrap();

        assert!(list.update(Msg::ViewerChanged(Some(upper))).is_empty());
        assert_eq!(ids(&list.view()), vec!["A"]);
    }

    #[test]
    fn test_last_logged_in_profile_is_marked() {
        let (mut list, effects) = ManagedProfilesList::mount(true, Some(viewer()));
        let (generation, kind, _) = single_fetch(effects);
        let mut page = data(&["A", "B"], None);
        page.last_logged_in_profile = Some(profile("B"));
        list.update(Msg::Fetched {
            generation,
            kind,
            result: Ok(page),
        });

        let marked: Vec<bool> = list.view().rows().iter().map(|r| r.last_logged_in).collect();
        assert_eq!(marked, vec![false, true]);
    }

    #[test]
    fn test_refetch_failure_shows_error() {
        let mut list = loaded(true, &["X"], None);
        list.update(Msg::Toggle(ProfileId::new("X")));
        let effects = list.update(Msg::Toggled {
            kind: ToggleKind::Hide,
            profile_id: ProfileId::new("X"),
            result: Ok(()),
        });
        let (generation, kind, _) = single_fetch(effects.into_iter().skip(1).collect());

        list.update(Msg::Fetched {
            generation,
            kind,
            result: Err(lens_error("down")),
        });
        assert!(matches!(
            list.view(),
            View::Error {
                title: "Failed to load managed profiles",
                ..
            }
        ));
    }

    #[test]
    fn test_disconnect_shows_error() {
        let mut list = loaded(true, &["A"], None);
        assert!(list.update(Msg::ViewerChanged(None)).is_empty());
        assert!(matches!(list.view(), View::Error { message, .. } if message == "wallet is not connected"));
    }
}
