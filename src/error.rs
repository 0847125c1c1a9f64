//! Error types for parsing, evaluation, and program submission.
//!
//! The action executor has no error type: every edge case of a rule
//! (bounds, occupancy, missing targets) is a no-op or a state change.

use thiserror::Error;

use crate::arena::AgentId;

/// Program text has no usable derivation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character outside the language's alphabet.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset into the source.
        offset: usize,
    },
    /// An integer literal that does not fit in 64 bits.
    #[error("integer literal {literal} at offset {offset} is out of range")]
    IntegerOutOfRange {
        /// The literal as written.
        literal: String,
        /// Byte offset into the source.
        offset: usize,
    },
    /// The source contains no tokens.
    #[error("program is empty")]
    Empty,
    /// Tokens were valid but no grammar derivation covers them.
    #[error("no parse for program")]
    NoDerivation,
    /// Nesting deeper than the parser follows.
    #[error("program is nested too deeply (more than {limit} levels)")]
    TooDeep {
        /// The nesting limit that was exceeded.
        limit: usize,
    },
}

/// Arithmetic failures during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// `a % 0`.
    #[error("modulo by zero")]
    ModuloByZero,
    /// Result does not fit in an integer.
    #[error("integer overflow")]
    Overflow,
}

/// A single turn's evaluation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// `$name` is bound neither by this evaluation nor by the agent's store.
    #[error("unbound variable ${0}")]
    UnboundVariable(String),
    /// A construct received a value of the wrong kind.
    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The construct that rejected the value.
        context: &'static str,
        /// The kind the construct requires.
        expected: &'static str,
        /// The kind actually produced.
        found: &'static str,
    },
    /// Integer arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
    /// The acting agent is not in the world.
    #[error("agent {0} is not in the world")]
    UnknownAgent(AgentId),
}

/// Why one candidate tree failed its dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialFailure {
    /// Index of the candidate in emission order.
    pub candidate: usize,
    /// Turn on which evaluation failed.
    pub turn: u32,
    /// The evaluation error.
    pub error: EvalError,
}

/// Every candidate tree failed its dry run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("all {} interpretations failed to evaluate", failures.len())]
pub struct ProgramRejected {
    /// One entry per candidate, in emission order.
    pub failures: Vec<TrialFailure>,
}

impl ProgramRejected {
    /// The failure of the first candidate, usually the most telling one.
    #[must_use]
    pub fn first_failure(&self) -> Option<&TrialFailure> {
        self.failures.first()
    }
}

/// Invalid arena configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArenaError {
    /// Width or height is zero.
    #[error("invalid arena size {width}x{height}")]
    InvalidDimensions {
        /// Configured width.
        width: u16,
        /// Configured height.
        height: u16,
    },
    /// Spawn probability outside `(0, 1]`.
    #[error("spawn probability {0} is not in (0, 1]")]
    InvalidSpawnProbability(f64),
}

/// Why a submitted program was not installed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The text did not parse.
    #[error("failed to parse: {0}")]
    Parse(#[from] ParseError),
    /// No interpretation survived the dry run.
    #[error("failed to evaluate: {0}")]
    Rejected(#[from] ProgramRejected),
    /// `quit` or `exit` where a program is required.
    #[error("expected a program, found a quit command")]
    NotAProgram,
}

/// Result type for a single evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
