//! # Connect AI
//!
//! Client for the external AI service behind the learning hub.
//!
//! ## Features
//!
//! - **Resume parsing**: skills, summary and score from free text
//! - **Learning paths**: recommended skills, timeline and steps for a goal role
//! - **Fallbacks**: fixed payloads when the service is unconfigured or down
//! - **Retry**: exponential backoff on transport errors, 429 and 5xx
//!
//! ## Example
//!
//! ```rust,no_run
//! use connect_ai::{AiClient, AiConfig};
//!
//! # async fn example() -> Result<(), connect_ai::AiError> {
//! let client = AiClient::new(AiConfig::from_env())?;
//! let analysis = client.parse_resume("Built services in Rust and Go").await;
//! println!("{:?}", analysis.skills);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod types;

pub use client::AiClient;
pub use config::AiConfig;
pub use error::{AiError, AiResult};
pub use retry::{with_retry_if, RetryConfig};
pub use types::{LearningPath, ResumeAnalysis};
