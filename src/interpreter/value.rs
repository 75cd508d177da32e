/// Numeric leaves.
///
/// Defines `Number`: exact rationals, floating point approximations and
/// intervals, with the arithmetic that mixes them. Exactness is kept only
/// when every operand is exact.
pub mod number;
/// Result tree nodes.
///
/// Defines the `Node` tree produced by the evaluator, its normal form and
/// the raw conversion used for parts of an interrupted evaluation.
pub mod node;
/// The evaluation outcome handed to the formatter.
pub mod result;
