//! twentyq — client library for a twenty-questions character guessing engine.
//!
//! The guessing itself happens in an external HTTP service; this crate
//! owns the client side of a play-through:
//!
//! - **Client**: typed requests to the engine's game and admin endpoints
//! - **Machine**: the session state machine (`idle | playing | guessing | adding`)
//!   that turns user intents into engine calls and state snapshots
//! - **Submission**: assembling and validating new-character submissions
//! - **Tui**: a terminal front end that renders snapshots and emits intents
//!
//! # Example
//!
//! ```no_run
//! use twentyq::client::EngineClient;
//! use twentyq::machine::{GameMachine, Intent};
//!
//! # async fn example() {
//! let client = EngineClient::new("http://localhost:5000/api");
//! let mut machine = GameMachine::new(client);
//! machine.handle(Intent::Start).await;
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod machine;
pub mod protocol;
pub mod submission;
pub mod tui;

pub use client::{Engine, EngineClient, TransportError};
pub use config::{ClientConfig, ConfigError, DEFAULT_SERVER_URL};
pub use machine::{GameMachine, Intent, Phase, Snapshot};
pub use protocol::{Answer, AnswerResponse, FeatureValue, Question};
pub use submission::{CharacterSheet, FEATURE_QUESTIONS, SubmissionError};
