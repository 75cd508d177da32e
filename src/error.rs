/// Parsing errors.
///
/// Defines the errors raised while tokenizing and parsing canonical input:
/// malformed syntax, unbalanced delimiters and identifiers that resolve to
/// nothing in the symbol registry.
pub mod parse_error;
/// Evaluation errors.
///
/// Fatal structural failures of evaluation such as wrong arity or a
/// comparison result used as a number. Domain anomalies are not errors; they
/// surface as warnings next to an `undefined` result.
pub mod eval_error;
/// Symbol registry mutation errors.
pub mod registry_error;
/// Option setter errors.
pub mod config_error;

pub use config_error::ConfigError;
pub use eval_error::EvalError;
pub use parse_error::{ParseError, ParseErrorClass};
pub use registry_error::RegistryError;
