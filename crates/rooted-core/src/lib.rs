//! # Rooted Core Library
//!
//! Business logic for Rooted, a workplace burnout-recovery companion. The
//! `rooted-cli` binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Assessment**: fixed burnout/stress questionnaires, scoring and
//!   severity bands, plus the question-by-question flow
//! - **Breathing**: technique catalog, a pure per-second `tick()` state
//!   machine and a Tokio driver that supplies the wall clock
//! - **Onboarding**: simulated sign-up, avatar builder, mentor choice
//! - **Storage**: key-value persistence (SQLite or memory), the versioned
//!   profile store, the breathwork log and TOML configuration
//! - **AI**: chat-completions client and wellness prompts
//!
//! ## Key Components
//!
//! - [`BreathingSession`]: breathing timer state machine
//! - [`BreathingDriver`]: once-per-second tick task
//! - [`ProfileStore`]: read-modify-write of the [`UserProfile`]
//! - [`Config`]: application configuration
//! - [`AiClient`]: remote text/image generation

pub mod ai;
pub mod assessment;
pub mod breathing;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod onboarding;
pub mod profile;
pub mod storage;

pub use ai::AiClient;
pub use assessment::{AssessmentFlow, AssessmentResults, BurnoutScores};
pub use breathing::{BreathingDriver, BreathingSession, SessionRecord, SessionState, Technique};
pub use error::{AiError, ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use profile::UserProfile;
pub use storage::{Config, KvStore, MemoryStore, ProfileStore, SessionLog, SqliteStore};
