use serde::Serialize;

/// The kind of thing a registry entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Variable,
    Unit,
    Function,
}

/// The value bound to a variable entry.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolValue {
    /// A named constant that stays symbolic in exact mode; the float is used
    /// when approximating.
    Constant(f64),
    /// A value written in canonical input syntax, evaluated on use.
    Expression(String),
    /// A variable without a value.
    Unknown,
    /// The `undefined` constant.
    Undefined,
    /// Units and functions carry no value.
    None,
}

/// A named entity known to the parser and evaluator.
///
/// The canonical `name` is always the first alias; every alias is unique
/// across the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub name:         String,
    /// All spellings, canonical name first, in declaration order.
    pub aliases:      Vec<String>,
    /// Preferred spelling when Unicode output is enabled (`π`, `√`).
    pub display_name: Option<String>,
    pub category:     Category,
    pub description:  String,
    /// Hidden entries resolve but are never listed.
    pub hidden:       bool,
    /// Unknown variables (`x`, `y`, `z`) are not listed either.
    pub known:        bool,
    pub value:        SymbolValue,
    /// Whether the entry belongs to the built-in set.
    pub builtin:      bool,
}

impl SymbolEntry {
    fn base(name: &str, aliases: &[&str], category: Category, description: &str) -> Self {
        let mut all = vec![name.to_string()];
        all.extend(aliases.iter()
                          .filter(|alias| **alias != name)
                          .map(ToString::to_string));
        Self { name: name.to_string(),
               aliases: all,
               display_name: None,
               category,
               description: description.to_string(),
               hidden: false,
               known: true,
               value: SymbolValue::None,
               builtin: false }
    }

    /// A named constant with an approximate value.
    #[must_use]
    pub fn constant(name: &str, aliases: &[&str], approximation: f64, description: &str) -> Self {
        Self { value: SymbolValue::Constant(approximation),
               ..Self::base(name, aliases, Category::Variable, description) }
    }

    /// A variable whose value is an expression in canonical syntax.
    ///
    /// # Example
    /// ```
    /// use reckon::registry::{Category, SymbolEntry, SymbolValue};
    ///
    /// let entry = SymbolEntry::expression("rate", &["r"], "3/100", "Interest rate");
    ///
    /// assert_eq!(entry.aliases, vec!["rate", "r"]);
    /// assert_eq!(entry.category, Category::Variable);
    /// assert_eq!(entry.value, SymbolValue::Expression("3/100".to_string()));
    /// ```
    #[must_use]
    pub fn expression(name: &str, aliases: &[&str], value: &str, description: &str) -> Self {
        Self { value: SymbolValue::Expression(value.to_string()),
               ..Self::base(name, aliases, Category::Variable, description) }
    }

    /// A variable without value; not listed.
    #[must_use]
    pub fn unknown(name: &str) -> Self {
        Self { value: SymbolValue::Unknown,
               known: false,
               ..Self::base(name, &[], Category::Variable, "Unknown") }
    }

    #[must_use]
    pub fn unit(name: &str, aliases: &[&str], description: &str) -> Self {
        Self::base(name, aliases, Category::Unit, description)
    }

    #[must_use]
    pub fn function(name: &str, aliases: &[&str], description: &str) -> Self {
        Self::base(name, aliases, Category::Function, description)
    }

    #[must_use]
    pub fn with_display(mut self, display: &str) -> Self {
        self.display_name = Some(display.to_string());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: SymbolValue) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The spelling used in output.
    #[must_use]
    pub fn display(&self, unicode: bool) -> &str {
        match &self.display_name {
            Some(display) if unicode => display,
            _ => &self.name,
        }
    }
}

/// Whether `name` can be written as a single identifier token.
///
/// # Example
/// ```
/// use reckon::registry::is_valid_identifier;
///
/// assert!(is_valid_identifier("rate_2"));
/// assert!(is_valid_identifier("π"));
/// assert!(!is_valid_identifier("2x"));
/// assert!(!is_valid_identifier("a b"));
/// ```
#[must_use]
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next()
         .is_some_and(|c| c == '_' || c.is_alphabetic())
    && chars.all(|c| c == '_' || c.is_alphabetic() || c.is_ascii_digit())
}
