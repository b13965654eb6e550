//! # Search State
//!
//! A single state object for the search view, changed only through
//! [`Action`]s. Results and the error message live inside the lifecycle
//! variants, so a view can never be "loading" while still holding results
//! from the previous search.

use assessments::{Assessment, Filters, RecommendRequest, TestType};
use tracing::debug;

/// Message shown for every failed search, whatever the cause.
pub const BACKEND_UNREACHABLE: &str = "Backend not reachable. Start FastAPI.";

/// Phase of the current or most recent search.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
    Idle,
    Loading,
    Success(Vec<Assessment>),
    Error(String),
}

/// Payload-free view of [`Lifecycle`], handy for assertions and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

impl Lifecycle {
    pub fn phase(&self) -> Phase {
        match self {
            Lifecycle::Idle => Phase::Idle,
            Lifecycle::Loading => Phase::Loading,
            Lifecycle::Success(_) => Phase::Success,
            Lifecycle::Error(_) => Phase::Error,
        }
    }

    /// Results of the last successful search; empty in every other phase.
    pub fn results(&self) -> &[Assessment] {
        match self {
            Lifecycle::Success(results) => results,
            _ => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Lifecycle::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// How a request ended, as seen by the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Results(Vec<Assessment>),
    Failed,
}

/// Discrete user or network events that move the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetQuery(String),
    ToggleRemote,
    ToggleAdaptive,
    SelectTestType(TestType),
    Submit,
    Completed { generation: u64, outcome: Outcome },
}

/// A started search: the request to send and the generation to report back.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub generation: u64,
    pub request: RecommendRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    query: String,
    filters: Filters,
    lifecycle: Lifecycle,
    generation: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            filters: Filters::default(),
            lifecycle: Lifecycle::Idle,
            generation: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Generation of the most recently started search (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Apply one action.
    ///
    /// Returns a ticket when the action started a search; the caller owes a
    /// matching `Action::Completed` once the service answers.
    pub fn dispatch(&mut self, action: Action) -> Option<SearchTicket> {
        match action {
            Action::SetQuery(query) => {
                self.query = query;
                None
            }
            Action::ToggleRemote => {
                self.filters.toggle_remote();
                None
            }
            Action::ToggleAdaptive => {
                self.filters.toggle_adaptive();
                None
            }
            Action::SelectTestType(test_type) => {
                self.filters.test_type = test_type;
                None
            }
            Action::Submit => self.start_search(),
            Action::Completed {
                generation,
                outcome,
            } => {
                self.finish_search(generation, outcome);
                None
            }
        }
    }

    fn start_search(&mut self) -> Option<SearchTicket> {
        if self.query.trim().is_empty() {
            debug!("Ignoring submit with blank query");
            return None;
        }

        self.generation += 1;
        self.lifecycle = Lifecycle::Loading;

        Some(SearchTicket {
            generation: self.generation,
            request: RecommendRequest::new(self.query.clone(), &self.filters),
        })
    }

    fn finish_search(&mut self, generation: u64, outcome: Outcome) {
        if generation != self.generation || self.lifecycle != Lifecycle::Loading {
            debug!(
                "Discarding stale response (generation {}, latest {})",
                generation, self.generation
            );
            return;
        }

        self.lifecycle = match outcome {
            Outcome::Results(results) => Lifecycle::Success(results),
            Outcome::Failed => Lifecycle::Error(BACKEND_UNREACHABLE.to_string()),
        };
    }
}
