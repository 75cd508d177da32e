use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents the fatal errors of evaluation.
pub enum EvalError {
    /// A function received an argument count it does not accept.
    #[error("{name}() expects {expected} argument(s) but received {found} (position {position}).")]
    ArgumentCount {
        /// The function name.
        name:     String,
        /// Human readable description of the accepted counts.
        expected: String,
        /// The number of arguments received.
        found:    usize,
        /// Byte offset of the call.
        position: usize,
    },
    /// A value had an incompatible type, such as a comparison result used
    /// in arithmetic.
    #[error("Type mismatch at position {position}: {details}.")]
    TypeMismatch {
        /// What went wrong.
        details:  String,
        /// Byte offset of the offending expression.
        position: usize,
    },
    /// A variable whose value refers back to itself.
    #[error("The definition of \"{name}\" refers to itself.")]
    RecursiveDefinition {
        /// The variable being expanded.
        name: String,
    },
    /// A stored variable value that no longer parses.
    #[error("The value of \"{name}\" cannot be used: {reason}")]
    InvalidDefinition {
        /// The variable name.
        name:   String,
        /// The underlying parse failure.
        reason: String,
    },
    /// A function name used where a value is expected.
    #[error("Function \"{name}\" used as a value (position {position}).")]
    FunctionAsValue {
        /// The function name.
        name:     String,
        /// Byte offset of the reference.
        position: usize,
    },
    /// A registered function with no implementation.
    #[error("Function \"{name}\" is not implemented (position {position}).")]
    UnknownFunction {
        /// The function name.
        name:     String,
        /// Byte offset of the call.
        position: usize,
    },
}
