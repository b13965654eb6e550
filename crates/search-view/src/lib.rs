//! Search view crate for the assessment recommendation client.
//!
//! This crate contains the controller that owns all interactive state:
//! query text, filters, the request lifecycle and the theme preference.

pub mod controller;
pub mod error;
pub mod state;
pub mod theme;

pub use controller::SearchView;
pub use error::{Result, StoreError};
pub use state::{
    Action, BACKEND_UNREACHABLE, Lifecycle, Outcome, Phase, SearchState, SearchTicket,
};
pub use theme::{
    FileStore, MemoryStore, PreferenceStore, THEME_KEY, ThemePreference, ThemeTarget,
};
