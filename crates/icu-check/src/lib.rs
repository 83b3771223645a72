//! ICU Check - privacy exposure check orchestration.
//!
//! This crate owns everything between a user pressing "check" and a result
//! being shown: input validation, the submit/result state machine, the
//! analysis service client, and score-to-risk-band interpretation.
//!
//! # Features
//!
//! - **Input Validation**: trimming and empty-input rejection, with opt-in per-kind syntax rules
//! - **Single Flight**: at most one analysis request in flight per controller
//! - **Bounded Requests**: every check is cut off after a configurable timeout
//! - **Risk Bands**: deterministic Low/Medium/High classification of the score
//!
//! # Example
//!
//! ```rust,no_run
//! use icu_check::{CheckRequestController, HttpAnalysisBackend, SubmitOutcome};
//! use icu_core::InputKind;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpAnalysisBackend::new("http://localhost:8001")?;
//! let controller = CheckRequestController::new(Arc::new(backend));
//!
//! if let SubmitOutcome::Completed(result) =
//!     controller.submit(InputKind::Email, " someone@example.com ").await?
//! {
//!     println!("score {} ({})", result.score(), result.risk_band());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # State Machine
//!
//! ```text
//!            submit (valid)            backend ok
//! Idle ───────────────────▶ Submitting ──────────▶ Succeeded(result)
//!  ▲                           │  ▲                      │
//!  │ future dropped            │  └──── submit ──────────┤
//!  └───────────────────────────┤                         │
//!                              └──── backend error ──▶ Failed(error)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod backend;
pub mod controller;
pub mod error;
pub mod http;
pub mod notices;
pub mod score;
pub mod types;
pub mod validator;

// Re-export commonly used types
pub use backend::{AnalysisBackend, HttpAnalysisBackend};
pub use controller::{CheckRequestController, CheckState, SubmitOutcome};
pub use error::{CheckError, Result};
pub use score::{classify, RiskBand, ScoreRangeError};
pub use types::{CheckRequest, CheckResponse, CheckResult, WhoisInfo};
pub use validator::{validate, InputValidator};
