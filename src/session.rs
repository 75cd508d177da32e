use std::time::Duration;

use serde::Serialize;

use crate::{
    diagnostics::{Diagnostics, Message, render_messages},
    error::{ConfigError, RegistryError},
    interpreter::{
        evaluator::{budget::Budget, core::Evaluator},
        format::core::Formatter,
        locale::normalize,
        parser::core::parse,
    },
    options::{OptionFlags, Settings},
    registry::{Category, SymbolRegistry},
};

/// Version of the host interface implemented by [`Session`].
pub const INTERFACE_VERSION: u32 = 3;

const TIMEOUT_WARNING: &str = "Calculation timed out; the result is incomplete.";

/// The value returned to the host for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CalculationResult {
    /// The parsed input rendered back in normalized form.
    pub input:    String,
    /// The rendered result; empty when parsing failed.
    pub output:   String,
    /// One `"Label: text"` line per diagnostic.
    pub messages: String,
}

/// A listed variable as reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableInfo {
    pub name:        String,
    pub description: String,
    /// Every spelling, canonical name first, separated by tabs.
    pub aliases:     String,
}

/// The entry point a host embedding talks to.
///
/// A session owns the symbol registry, the diagnostics sink and the default
/// options. Every operation that changes state takes `&mut self`, so one
/// session serves one request at a time.
///
/// # Example
/// ```
/// use std::time::Duration;
///
/// use reckon::{options::OptionFlags, session::Session};
///
/// let mut session = Session::new();
/// let result = session.calculate("2+2", Duration::from_millis(500), OptionFlags::empty());
///
/// assert_eq!(result.input, "2 + 2");
/// assert_eq!(result.output, "4");
/// assert!(result.messages.is_empty());
/// ```
#[derive(Debug)]
pub struct Session {
    registry:    SymbolRegistry,
    diagnostics: Diagnostics,
    settings:    Settings,
}

impl Session {
    /// Creates a session with the built-in registry and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self { registry:    SymbolRegistry::new(),
               diagnostics: Diagnostics::new(),
               settings, }
    }

    /// Normalizes, parses, evaluates and formats one expression.
    ///
    /// Never fails: parse and evaluation errors are reported as `Error:`
    /// messages next to a best-effort output. A calculation that runs out of
    /// time returns its partial result with a warning.
    ///
    /// # Parameters
    /// - `input`: The expression as typed by the user.
    /// - `timeout`: Evaluation budget; [`Duration::ZERO`] is unbounded.
    /// - `flags`: Per-call overrides of the session options.
    ///
    /// # Returns
    /// The normalized input, the rendered result and the messages.
    pub fn calculate(&mut self,
                     input: &str,
                     timeout: Duration,
                     flags: OptionFlags)
                     -> CalculationResult {
        self.diagnostics.clear();

        let mut settings = self.settings.with_flags(flags);
        settings.evaluation.timeout = timeout;
        let (input, output) = self.run(input, &settings);

        let messages = self.diagnostics.drain();
        CalculationResult { input,
                            output,
                            messages: render_messages(&messages) }
    }

    /// [`Session::calculate`] with the integer arguments a host boundary
    /// passes. Unknown flag bits are ignored.
    pub fn calculate_with_bits(&mut self,
                               input: &str,
                               timeout_ms: u64,
                               flags: u32)
                               -> CalculationResult {
        self.calculate(input,
                       Duration::from_millis(timeout_ms),
                       OptionFlags::from_bits_truncate(flags))
    }

    fn run(&mut self, input: &str, settings: &Settings) -> (String, String) {
        if input.trim().is_empty() {
            return (String::new(), String::new());
        }

        let evaluation = &settings.evaluation;
        let canonical = normalize(input, &evaluation.parse);
        log::debug!("calculating \"{canonical}\"");

        let parsed = parse(&canonical,
                           &evaluation.parse,
                           &self.registry,
                           &mut self.diagnostics);
        let expr = match parsed {
            Ok(expr) => expr,
            Err(error) => {
                self.diagnostics.error(error.to_string());
                return (canonical, String::new());
            },
        };

        let formatter = Formatter::new(&settings.print, &self.registry);
        let echoed = formatter.format_expr(&expr);

        let evaluator = Evaluator::new(&self.registry, evaluation, Budget::start(evaluation.timeout));
        match evaluator.evaluate(&expr, &mut self.diagnostics) {
            Ok(result) => {
                if result.is_interrupted() {
                    self.diagnostics.warning(TIMEOUT_WARNING);
                }
                (echoed, formatter.format_result(&result))
            },
            Err(error) => {
                self.diagnostics.error(error.to_string());
                (echoed, String::new())
            },
        }
    }

    /// The known, visible variables, built-ins first.
    #[must_use]
    pub fn get_variables(&self) -> Vec<VariableInfo> {
        self.registry
            .list_known_visible()
            .filter(|entry| entry.category == Category::Variable)
            .map(|entry| VariableInfo { name:        entry.name.clone(),
                                        description: entry.description.clone(),
                                        aliases:     entry.aliases.join("\t"), })
            .collect()
    }

    /// Replaces the user variables with a serialized batch.
    ///
    /// The batch is applied all-or-nothing; on failure the previous user
    /// variables are kept and the error is also available through
    /// [`Session::take_messages`].
    ///
    /// # Errors
    /// The [`RegistryError`] of the first rejected definition.
    pub fn set_variables(&mut self, serialized: &str) -> Result<(), RegistryError> {
        self.diagnostics.clear();
        match self.registry.replace_user_entries(serialized) {
            Ok(count) => {
                log::debug!("replaced user variables with {count} definition(s)");
                Ok(())
            },
            Err(error) => {
                self.diagnostics.error(error.to_string());
                Err(error)
            },
        }
    }

    /// Drops every user variable.
    pub fn reset_variables(&mut self) {
        self.diagnostics.clear();
        self.registry.reset();
    }

    /// The user variables in the format [`Session::set_variables`] accepts.
    #[must_use]
    pub fn serialize_variables(&self) -> String {
        self.registry.serialize_user()
    }

    /// Changes a session default by key.
    ///
    /// # Errors
    /// See [`Settings::set`].
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    ///
    /// use reckon::{options::OptionFlags, session::Session};
    ///
    /// let mut session = Session::new();
    /// session.set_option("fraction", "decimal").unwrap();
    ///
    /// let result = session.calculate("1/3", Duration::ZERO, OptionFlags::empty());
    /// assert_eq!(result.output, "0.3333333333…");
    /// assert!(session.set_option("speed", "fast").is_err());
    /// ```
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.settings.set(key, value)
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn registry(&self) -> &SymbolRegistry {
        &self.registry
    }

    /// Messages produced by the last registry operation.
    pub fn take_messages(&mut self) -> Vec<Message> {
        self.diagnostics.drain()
    }

    /// A one-line description of the engine.
    #[must_use]
    pub const fn info() -> &'static str {
        concat!("reckon ", env!("CARGO_PKG_VERSION"), ": exact and symbolic expression calculator")
    }

    #[must_use]
    pub const fn version() -> u32 {
        INTERFACE_VERSION
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
