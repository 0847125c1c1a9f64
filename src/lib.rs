// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Gridbots: a tiny bot language and the turn-based grid arena it plays in.
//!
//! Players submit short programs that steer an agent around a grid full of
//! randomly acting enemies. The language is deliberately ambiguous, so a
//! program can parse several ways; the arena picks the first reading that
//! survives a full dry run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Session / Tournament / Replay     │
//! ├─────────────────────────────────────┤
//! │   Disambiguator                     │
//! ├─────────────────────────────────────┤
//! │   Evaluator  →  Action executor     │
//! ├─────────────────────────────────────┤
//! │   Parser (every derivation)         │
//! └─────────────────────────────────────┘
//! ```

pub mod arena;
pub mod error;
pub mod lang;
pub mod replay;
pub mod session;
pub mod tournament;

pub use error::{ArenaError, EvalError, ParseError, ProgramRejected, SubmitError};

// Re-export key arena types at crate root for convenience
pub use arena::{Action, Agent, AgentId, AgentKind, Arena, ArenaConfig, Position, World};
pub use session::{RoundReport, Session, Submission};
