//! # Assessments Crate
//!
//! Shared domain types for the assessment recommendation client.
//!
//! ## Main Components
//!
//! - **types**: Filters, wire bodies and the `Assessment` result item
//! - **error**: Error types for filter parsing
//!
//! ## Example Usage
//!
//! ```ignore
//! use assessments::{Filters, RecommendRequest, TestType};
//!
//! let mut filters = Filters::default();
//! filters.toggle_remote();
//! filters.test_type = "k".parse::<TestType>()?;
//!
//! let request = RecommendRequest::new("graduate coding test", &filters);
//! assert_eq!(request.remote_preferred, Some(true));
//! ```

// Public modules
pub mod error;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{AssessmentError, Result};
pub use types::{
    Assessment, Filters, Preference, RESULT_LIMIT, RecommendRequest, RecommendResponse, TestType,
};
