/// The cooperative time budget.
///
/// Polls a deadline every few evaluation steps; once it has passed the
/// evaluator stops simplifying.
pub mod budget;

/// Core evaluation logic.
///
/// Contains the `Evaluator`, the dispatch over expression variants and the
/// expansion of variables.
pub mod core;

/// Algebraic simplification.
///
/// Sums, products and powers in normal form: constant folding, like terms,
/// like factors and exact roots.
pub mod simplify;

/// Evaluation of comparison operators.
pub mod comparison;

/// Function evaluation.
///
/// The built-in function table, argument checking and the exact and numeric
/// rules of every built-in.
pub mod function;

/// Numeric approximation of result trees.
pub mod approximate;

/// Choice of the fraction display for a result.
pub mod fraction;
