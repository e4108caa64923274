//! Home-safe companion backend: home-safe timer, silent alerts, a guardian
//! list, and a language-model judgment of whether an unexpected stop
//! deserves an automated check-in.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod monitor;
pub mod routes;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use evaluation::{EvaluationRequest, EvaluationResult, StopEvaluator, UpstreamEvaluationError};
pub use state::AppState;
