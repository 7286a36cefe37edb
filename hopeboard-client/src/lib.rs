//! hopeboard-client: typed access to the hopeboard API
//!
//! - `ApiClient`: one async method per endpoint, bearer token handling,
//!   failures normalized into `ClientError`
//! - `ApiOutcome`: `{success, data}` for callers that prefer flags to errors
//! - `BoardSession`: a board opened into the editor, saved with one PUT

pub mod client;
pub mod error;
pub mod session;

pub use client::{ApiClient, ApiOutcome, HealthCounts, HealthReport, LoginResponse};
pub use error::{ClientError, ClientResult};
pub use session::{BoardSession, SaveError, SAVE_FAILED_MESSAGE};
