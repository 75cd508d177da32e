use serde::{Deserialize, Serialize};

use crate::{
    diagnostics::Diagnostics,
    error::RegistryError,
    interpreter::{locale::normalize, parser::core::parse},
    options::ParseOptions,
    registry::{SymbolEntry, SymbolRegistry, SymbolValue},
};

/// One user variable as exchanged with the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name:        String,
    /// The value in input syntax, e.g. `"3/100"` or `"2 * pi"`.
    pub value:       String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases:     Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl VariableDefinition {
    fn to_entry(&self) -> Result<SymbolEntry, RegistryError> {
        if self.value.trim().is_empty() {
            return Err(RegistryError::EmptyValue { name: self.name.clone() });
        }
        let aliases: Vec<&str> = self.aliases.iter().map(String::as_str).collect();
        Ok(SymbolEntry::expression(&self.name, &aliases, &self.value, &self.description))
    }

    fn from_entry(entry: &SymbolEntry) -> Option<Self> {
        let SymbolValue::Expression(value) = &entry.value else {
            return None;
        };
        Some(Self { name:        entry.name.clone(),
                    value:       value.clone(),
                    aliases:     entry.aliases.iter().skip(1).cloned().collect(),
                    description: entry.description.clone(), })
    }
}

impl SymbolRegistry {
    /// Appends the user variables described by a JSON array.
    ///
    /// The batch is applied all-or-nothing: every definition is checked for
    /// identifier syntax and collisions (with existing entries and within the
    /// batch), and every value must parse against the registry extended with
    /// the whole batch. Nothing is committed unless all checks pass.
    ///
    /// # Returns
    /// The number of variables defined.
    ///
    /// # Errors
    /// A [`RegistryError`] describing the first failing definition.
    ///
    /// # Example
    /// ```
    /// use reckon::registry::SymbolRegistry;
    ///
    /// let mut registry = SymbolRegistry::new();
    /// let defined = registry.define_from(r#"[{"name": "rate", "value": "3/100"},
    ///                                        {"name": "total", "value": "100 rate", "aliases": ["sum"]}]"#)
    ///                       .unwrap();
    /// assert_eq!(defined, 2);
    /// assert_eq!(registry.lookup("sum").unwrap().name, "total");
    ///
    /// let before = registry.len();
    /// assert!(registry.define_from(r#"[{"name": "ok", "value": "1"},
    ///                                  {"name": "bad", "value": "1 +"}]"#)
    ///                 .is_err());
    /// assert_eq!(registry.len(), before);
    /// ```
    pub fn define_from(&mut self, serialized: &str) -> Result<usize, RegistryError> {
        let definitions: Vec<VariableDefinition> = serde_json::from_str(serialized)?;

        let mut scratch = self.clone();
        for definition in &definitions {
            scratch.define(definition.to_entry()?)?;
        }

        let options = ParseOptions::default();
        for definition in &definitions {
            let mut sink = Diagnostics::new();
            let canonical = normalize(&definition.value, &options);
            let invalid = |source| RegistryError::InvalidValue { name: definition.name.clone(),
                                                                 source };
            parse(&canonical, &options, &scratch, &mut sink).map_err(invalid)?;
        }

        *self = scratch;
        log::info!("defined {} user variable(s)", definitions.len());
        Ok(definitions.len())
    }

    /// Replaces every user variable with the batch in `serialized`.
    ///
    /// The previous user set survives when the batch is rejected.
    ///
    /// # Errors
    /// As [`SymbolRegistry::define_from`].
    pub fn replace_user_entries(&mut self, serialized: &str) -> Result<usize, RegistryError> {
        let mut scratch = self.clone();
        scratch.reset();
        let defined = scratch.define_from(serialized)?;
        *self = scratch;
        Ok(defined)
    }

    /// Serializes the user variables in the format
    /// [`SymbolRegistry::define_from`] accepts.
    ///
    /// # Example
    /// ```
    /// use reckon::registry::SymbolRegistry;
    ///
    /// let mut registry = SymbolRegistry::new();
    /// registry.define_from(r#"[{"name": "rate", "value": "3/100", "aliases": ["r"]}]"#)
    ///         .unwrap();
    ///
    /// let serialized = registry.serialize_user();
    /// let mut restored = SymbolRegistry::new();
    /// restored.define_from(&serialized).unwrap();
    ///
    /// assert_eq!(restored.lookup("r"), registry.lookup("r"));
    /// ```
    #[must_use]
    pub fn serialize_user(&self) -> String {
        let definitions: Vec<VariableDefinition> =
            self.user_entries().filter_map(VariableDefinition::from_entry).collect();
        serde_json::to_string(&definitions).unwrap_or_else(|_| "[]".to_string())
    }
}
