use std::collections::HashMap;

use crate::{error::RegistryError, options::ParseOptions};

/// Symbol entries and their constructors.
pub mod entry;
/// The built-in constants, unknowns, units and functions.
pub mod defaults;
/// JSON persistence of user-defined variables.
///
/// User variables cross the host boundary as a JSON array of
/// `{ name, value, aliases?, description? }` objects. Batches are validated
/// as a whole and applied all-or-nothing.
pub mod serial;

pub use entry::{Category, SymbolEntry, SymbolValue, is_valid_identifier};
pub use serial::VariableDefinition;

/// The registry of named symbols consulted by the parser and evaluator.
///
/// Built-in entries come first and are never removed; user entries follow
/// in definition order. Every canonical name and alias maps to exactly one
/// entry.
///
/// # Example
/// ```
/// use reckon::{options::ParseOptions, registry::SymbolRegistry};
///
/// let registry = SymbolRegistry::new();
/// assert_eq!(registry.lookup("π").unwrap().name, "pi");
/// assert!(registry.lookup("PI").is_none());
///
/// let options = ParseOptions { case_sensitive: false,
///                              ..ParseOptions::default() };
/// assert_eq!(registry.resolve("PI", &options).unwrap().name, "pi");
/// ```
#[derive(Debug, Clone)]
pub struct SymbolRegistry {
    entries:       Vec<SymbolEntry>,
    index:         HashMap<String, usize>,
    folded:        HashMap<String, usize>,
    builtin_count: usize,
}

impl SymbolRegistry {
    /// Creates a registry holding the built-in set.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for entry in defaults::builtin_entries() {
            registry.insert(entry);
        }
        registry.builtin_count = registry.entries.len();
        log::debug!("symbol registry initialised with {} built-in entries",
                    registry.builtin_count);
        registry
    }

    /// Creates a registry without any entries.
    #[must_use]
    pub fn empty() -> Self {
        Self { entries:       Vec::new(),
               index:         HashMap::new(),
               folded:        HashMap::new(),
               builtin_count: 0, }
    }

    /// Finds an entry by canonical name or alias.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Finds an entry the way the parser does: an exact match first, then a
    /// case-folded match when `options` disable case sensitivity.
    #[must_use]
    pub fn resolve(&self, name: &str, options: &ParseOptions) -> Option<&SymbolEntry> {
        self.lookup(name).or_else(|| {
                              if options.case_sensitive {
                                  None
                              } else {
                                  self.folded
                                      .get(&name.to_lowercase())
                                      .map(|&i| &self.entries[i])
                              }
                          })
    }

    /// All entries, built-ins first.
    pub fn entries(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    /// User-defined entries in definition order.
    pub fn user_entries(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries[self.builtin_count..].iter()
    }

    /// Entries a host may list: known and not hidden, built-ins first.
    pub fn list_known_visible(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter().filter(|e| e.known && !e.hidden)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every user-defined entry. Built-ins are untouched.
    pub fn reset(&mut self) {
        if self.entries.len() > self.builtin_count {
            log::debug!("dropping {} user entries",
                        self.entries.len() - self.builtin_count);
        }
        self.entries.truncate(self.builtin_count);
        self.rebuild_index();
    }

    /// Adds a single user entry.
    ///
    /// # Errors
    /// [`RegistryError::InvalidName`] when a spelling is not an identifier
    /// and [`RegistryError::NameCollision`] when one is already taken. The
    /// registry is unchanged on error.
    ///
    /// # Example
    /// ```
    /// use reckon::registry::{SymbolEntry, SymbolRegistry};
    ///
    /// let mut registry = SymbolRegistry::new();
    /// registry.define(SymbolEntry::expression("rate", &[], "3/100", "")).unwrap();
    /// assert!(registry.define(SymbolEntry::expression("pi", &[], "3", "")).is_err());
    /// ```
    pub fn define(&mut self, mut entry: SymbolEntry) -> Result<(), RegistryError> {
        for alias in &entry.aliases {
            if !is_valid_identifier(alias) {
                return Err(RegistryError::InvalidName { name: alias.clone() });
            }
            if let Some(existing) = self.lookup(alias) {
                return Err(RegistryError::NameCollision { name:     alias.clone(),
                                                          existing: existing.name.clone(), });
            }
        }
        for (i, alias) in entry.aliases.iter().enumerate() {
            if entry.aliases[..i].contains(alias) {
                return Err(RegistryError::NameCollision { name:     alias.clone(),
                                                          existing: entry.name.clone(), });
            }
        }
        entry.builtin = false;
        self.insert(entry);
        Ok(())
    }

    fn insert(&mut self, entry: SymbolEntry) {
        let position = self.entries.len();
        for alias in &entry.aliases {
            self.index.insert(alias.clone(), position);
            self.folded.entry(alias.to_lowercase()).or_insert(position);
        }
        self.entries.push(entry);
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        self.folded.clear();
        for (position, entry) in self.entries.iter().enumerate() {
            for alias in &entry.aliases {
                self.index.insert(alias.clone(), position);
                self.folded.entry(alias.to_lowercase()).or_insert(position);
            }
        }
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
