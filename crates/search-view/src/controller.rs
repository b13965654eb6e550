//! # Search View Controller
//!
//! Coordinates one search cycle:
//! 1. Check the query and move the state to Loading
//! 2. Send the request to the Recommendation Service
//! 3. Fold the outcome back into the state (stale answers are dropped)
//!
//! It also owns the theme preference: read from the store on load, flipped
//! and persisted on toggle, and pushed to the renderer each time.

use std::time::Instant;

use assessments::TestType;
use recommend_client::RecommendationService;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::state::{Action, Lifecycle, Outcome, SearchState, SearchTicket};
use crate::theme::{PreferenceStore, THEME_KEY, ThemePreference, ThemeTarget};

/// Interactive state plus the collaborators needed to act on it.
pub struct SearchView<S, P> {
    service: S,
    store: P,
    state: SearchState,
    theme: ThemePreference,
}

impl<S, P> SearchView<S, P>
where
    S: RecommendationService,
    P: PreferenceStore,
{
    pub fn new(service: S, store: P) -> Self {
        Self {
            service,
            store,
            state: SearchState::new(),
            theme: ThemePreference::default(),
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        self.state.lifecycle()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.dispatch(Action::SetQuery(query.into()));
    }

    pub fn toggle_remote(&mut self) {
        self.state.dispatch(Action::ToggleRemote);
    }

    pub fn toggle_adaptive(&mut self) {
        self.state.dispatch(Action::ToggleAdaptive);
    }

    pub fn select_test_type(&mut self, test_type: TestType) {
        self.state.dispatch(Action::SelectTestType(test_type));
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Start a search without awaiting it.
    ///
    /// Returns `None` (and changes nothing) when the trimmed query is empty.
    pub fn begin_search(&mut self) -> Option<SearchTicket> {
        let ticket = self.state.dispatch(Action::Submit)?;
        info!(
            "Starting search #{} for {:?}",
            ticket.generation, ticket.request.query
        );
        Some(ticket)
    }

    /// Fold the service's answer for `ticket` back into the state.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: recommend_client::Result<assessments::RecommendResponse>,
    ) {
        let outcome = match outcome {
            Ok(response) => {
                info!(
                    "Search #{} returned {} results",
                    ticket.generation,
                    response.results.len()
                );
                Outcome::Results(response.results)
            }
            Err(e) => {
                warn!("Search #{} failed: {}", ticket.generation, e);
                Outcome::Failed
            }
        };
        self.state.dispatch(Action::Completed {
            generation: ticket.generation,
            outcome,
        });
    }

    /// Submit the current query and wait for the answer.
    ///
    /// A blank query is a no-op: no request, no state change. Returns whether
    /// a request was sent.
    pub async fn submit(&mut self) -> bool {
        self.submit_observed(|_| {}).await
    }

    /// Like [`submit`](Self::submit), calling `on_loading` with the Loading
    /// state before the request is awaited.
    pub async fn submit_observed(&mut self, mut on_loading: impl FnMut(&Lifecycle)) -> bool {
        let Some(ticket) = self.begin_search() else {
            return false;
        };
        on_loading(self.state.lifecycle());

        let start = Instant::now();
        let outcome = self.service.recommend(&ticket.request).await;
        debug!("Search #{} took {:.2?}", ticket.generation, start.elapsed());

        self.complete_search(&ticket, outcome);
        true
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Load the stored theme and apply it.
    ///
    /// An unreadable store falls back to the light theme.
    pub fn initialize(&mut self, target: &mut impl ThemeTarget) -> ThemePreference {
        let stored = self.store.get(THEME_KEY).unwrap_or_else(|e| {
            warn!("Could not read theme preference: {}", e);
            None
        });
        self.theme = ThemePreference::from_stored(stored.as_deref());
        target.apply_theme(self.theme);
        debug!("Initialized theme: {}", self.theme.as_str());
        self.theme
    }

    /// Flip the theme, apply it and persist it.
    ///
    /// The new theme is applied even if persisting it fails.
    pub fn toggle_theme(&mut self, target: &mut impl ThemeTarget) -> Result<ThemePreference> {
        self.theme = self.theme.toggled();
        target.apply_theme(self.theme);
        self.store.set(THEME_KEY, self.theme.as_str())?;
        info!("Theme set to {}", self.theme.as_str());
        Ok(self.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BACKEND_UNREACHABLE, Phase};
    use crate::theme::MemoryStore;
    use assessments::{Assessment, RecommendRequest, RecommendResponse};
    use recommend_client::ClientError;
    use std::sync::{Arc, Mutex};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Service that records every request and answers from a fixed script.
    #[derive(Clone, Default)]
    struct ScriptedService {
        seen: Arc<Mutex<Vec<RecommendRequest>>>,
        results: Option<Vec<Assessment>>,
    }

    impl ScriptedService {
        fn returning(results: Vec<Assessment>) -> Self {
            Self {
                seen: Arc::default(),
                results: Some(results),
            }
        }

        fn failing() -> Self {
            Self::default()
        }

        fn requests(&self) -> Vec<RecommendRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl RecommendationService for ScriptedService {
        async fn recommend(
            &self,
            request: &RecommendRequest,
        ) -> recommend_client::Result<RecommendResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.results {
                Some(results) => Ok(RecommendResponse {
                    results: results.clone(),
                }),
                None => Err(ClientError::Status { status: 503 }),
            }
        }
    }

    #[derive(Default)]
    struct RecordingTarget {
        applied: Vec<ThemePreference>,
    }

    impl ThemeTarget for RecordingTarget {
        fn apply_theme(&mut self, theme: ThemePreference) {
            self.applied.push(theme);
        }
    }

    fn three_items() -> Vec<Assessment> {
        ["Java 8", "Python (New)", "Automata Fix"]
            .iter()
            .map(|name| Assessment::new(*name, "desc", "K", "Yes", "Yes", "https://example.com"))
            .collect()
    }

    // ============================================================================
    // Search
    // ============================================================================

    #[tokio::test]
    async fn test_coding_test_returns_three_items_in_order() {
        let service = ScriptedService::returning(three_items());
        let mut view = SearchView::new(service.clone(), MemoryStore::new());

        view.set_query("coding test");
        view.submit().await;

        assert_eq!(view.state().phase(), Phase::Success);
        let names: Vec<&str> = view.lifecycle().results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Java 8", "Python (New)", "Automata Fix"]);

        let requests = service.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query, "coding test");
        assert_eq!(requests[0].k, 10);
        assert_eq!(requests[0].remote_preferred, None);
        assert_eq!(requests[0].adaptive_preferred, None);
        assert_eq!(requests[0].test_type_preference, "");
    }

    #[tokio::test]
    async fn test_whitespace_query_sends_nothing() {
        let service = ScriptedService::returning(three_items());
        let mut view = SearchView::new(service.clone(), MemoryStore::new());

        view.set_query("   ");
        assert!(!view.submit().await);

        assert_eq!(view.state().phase(), Phase::Idle);
        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failure_sets_fixed_message_and_clears_results() {
        let mut view = SearchView::new(ScriptedService::failing(), MemoryStore::new());

        view.set_query("coding test");
        view.submit().await;

        assert_eq!(view.state().phase(), Phase::Error);
        assert!(view.lifecycle().results().is_empty());
        assert_eq!(view.lifecycle().error_message(), Some(BACKEND_UNREACHABLE));
    }

    #[tokio::test]
    async fn test_remote_filter_on_then_off() {
        let service = ScriptedService::returning(three_items());
        let mut view = SearchView::new(service.clone(), MemoryStore::new());
        view.set_query("coding test");

        view.toggle_remote();
        view.submit().await;
        view.toggle_remote();
        view.submit().await;

        let requests = service.requests();
        assert_eq!(requests[0].remote_preferred, Some(true));
        assert_eq!(requests[1].remote_preferred, None);
    }

    #[tokio::test]
    async fn test_begin_search_is_loading_before_completion() {
        let service = ScriptedService::returning(three_items());
        let mut view = SearchView::new(service.clone(), MemoryStore::new());
        view.set_query("coding test");

        let ticket = view.begin_search().unwrap();
        assert_eq!(view.state().phase(), Phase::Loading);

        let outcome = service.recommend(&ticket.request).await;
        view.complete_search(&ticket, outcome);
        assert_eq!(view.state().phase(), Phase::Success);
    }

    #[tokio::test]
    async fn test_submit_observed_sees_loading_once() {
        let service = ScriptedService::returning(three_items());
        let mut view = SearchView::new(service.clone(), MemoryStore::new());
        view.set_query("coding test");

        let mut seen = Vec::new();
        assert!(view.submit_observed(|l| seen.push(l.phase())).await);

        assert_eq!(seen, vec![Phase::Loading]);
        assert_eq!(view.state().phase(), Phase::Success);
        assert_eq!(service.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_searches_keep_newest() {
        let mut view = SearchView::new(ScriptedService::failing(), MemoryStore::new());

        view.set_query("first");
        let older = view.begin_search().unwrap();
        view.set_query("second");
        let newer = view.begin_search().unwrap();

        view.complete_search(
            &newer,
            Ok(RecommendResponse {
                results: three_items(),
            }),
        );
        view.complete_search(&older, Err(ClientError::Status { status: 500 }));

        assert_eq!(view.state().phase(), Phase::Success);
        assert_eq!(view.lifecycle().results().len(), 3);
    }

    // ============================================================================
    // Theme
    // ============================================================================

    #[test]
    fn test_initialize_defaults_to_light() {
        let mut view = SearchView::new(ScriptedService::failing(), MemoryStore::new());
        let mut target = RecordingTarget::default();

        assert_eq!(view.initialize(&mut target), ThemePreference::Light);
        assert_eq!(target.applied, vec![ThemePreference::Light]);
    }

    #[test]
    fn test_initialize_reads_stored_dark() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark").unwrap();
        let mut view = SearchView::new(ScriptedService::failing(), store);
        let mut target = RecordingTarget::default();

        assert_eq!(view.initialize(&mut target), ThemePreference::Dark);
        assert_eq!(target.applied, vec![ThemePreference::Dark]);
    }

    #[test]
    fn test_theme_toggle_twice_restores_store_and_target() {
        let mut view = SearchView::new(ScriptedService::failing(), MemoryStore::new());
        let mut target = RecordingTarget::default();
        view.initialize(&mut target);

        assert_eq!(view.toggle_theme(&mut target).unwrap(), ThemePreference::Dark);
        assert_eq!(view.store().get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        assert_eq!(view.toggle_theme(&mut target).unwrap(), ThemePreference::Light);
        assert_eq!(view.store().get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(target.applied.last(), target.applied.first());
    }
}
