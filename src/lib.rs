//! # reckon
//!
//! reckon is an embeddable expression calculator core written in Rust.
//! It normalizes localized input, parses it against a registry of named
//! constants, units, unknowns and functions, simplifies it exactly where it
//! can, approximates where it must, and renders the result as plain text or
//! HTML. Evaluation runs under a cooperative time budget, so a runaway
//! calculation returns a partial result instead of blocking its host.
//!
//! Hosts talk to a [`Session`]:
//!
//! ```
//! use std::time::Duration;
//!
//! use reckon::{Session, options::OptionFlags};
//!
//! let mut session = Session::new();
//! let result = session.calculate("sqrt(2)", Duration::from_millis(500), OptionFlags::PLAIN_TEXT);
//!
//! assert_eq!(result.output, "√2 ≈ 1.414213562");
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed input.
///
/// This module declares the `Expr` enum and the operator types that represent
/// a parsed expression as a tree. Every node carries the byte span of the
/// canonical text it was parsed from.
///
/// # Responsibilities
/// - Defines expression types for all supported constructs.
/// - Tells explicit operators from implicit multiplication.
/// - Attaches source spans for error reporting.
pub mod ast;
/// Collects the messages produced while serving a request.
///
/// Messages carry a severity (Info, Warning, Error) and are rendered one per
/// line for the host. Every message is also logged.
pub mod diagnostics;
/// Provides unified error types for parsing, evaluation and configuration.
///
/// # Responsibilities
/// - Defines error enums for each failure mode (parser, evaluator, registry,
///   options).
/// - Attaches byte offsets and offending names for context.
/// - Integrates with the standard error traits through `thiserror`.
pub mod error;
/// Orchestrates the calculation pipeline.
///
/// This module ties together locale normalization, lexing, parsing,
/// evaluation, result values and formatting.
///
/// # Responsibilities
/// - Coordinates all core components.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Options that steer parsing, evaluation and output.
///
/// Policies are plain enums with defaults; `OptionFlags` carries per-call
/// overrides across the host boundary.
pub mod options;
/// The symbol registry.
///
/// Built-in and user-defined constants, variables, units and functions with
/// their aliases, resolved by name during parsing and evaluation.
pub mod registry;
/// The host-facing facade.
pub mod session;
/// General utilities for exact and floating point numerics.
///
/// This module provides conversions and numeric routines that are used
/// throughout the lexer, evaluator and formatter.
///
/// # Responsibilities
/// - Safely convert between `f64` and exact rationals without silent data
///   loss.
/// - Provide general numeric functions used in multiple modules.
pub mod util;

pub use session::{CalculationResult, Session};
