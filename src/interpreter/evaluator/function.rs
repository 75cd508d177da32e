/// The built-in function table and call dispatch.
pub mod core;
/// Roots, trigonometric, hyperbolic, exponential and logarithmic functions.
pub mod elementary;
/// Factorial, rounding, sign, extrema and integer arithmetic.
pub mod integer;
