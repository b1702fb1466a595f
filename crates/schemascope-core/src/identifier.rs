//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type. Node names, type references and node
//! identifiers are all interned, so resolving a field's type against the node
//! set is a symbol comparison instead of a string comparison.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use schemascope_core::identifier::Id;
///
/// let user = Id::new("User");
/// assert_eq!(user, "User");
///
/// // Node identifiers are scoped by the tree they come from
/// let scoped = Id::new("schema").create_nested(user);
/// assert_eq!(scoped, "schema::User");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates a nested ID by combining parent ID and child ID with '::' separator.
    ///
    /// # Arguments
    ///
    /// * `child_id` - The child identifier to append.
    pub fn create_nested(&self, child_id: Id) -> Self {
        let mut interner = interner();
        let parent_str = interner
            .resolve(self.0)
            .expect("Parent ID should exist in interner");
        let child_str = interner
            .resolve(child_id.0)
            .expect("Child ID should exist in interner");
        let nested_name = format!("{parent_str}::{child_str}");
        Self(interner.get_or_intern(&nested_name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("User");
        let id2 = Id::new("User");
        let id3 = Id::new("Post");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "User");
    }

    #[test]
    fn test_create_nested() {
        let schema = Id::new("schema");
        let library = Id::new("library");
        let user = Id::new("User");

        let ours = schema.create_nested(user);
        let theirs = library.create_nested(user);

        assert_ne!(ours, theirs);
        assert_eq!(ours, "schema::User");
        assert_eq!(theirs, "library::User");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{id}"), "display_test");
    }

    #[test]
    fn test_from_trait() {
        let id1: Id = "Query".into();
        assert_eq!(id1, Id::new("Query"));
    }

    #[test]
    fn test_hash_and_eq() {
        let id1 = Id::new("key1");
        let id2 = Id::new("key1");
        let id3 = Id::new("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("Mutation");
        assert!(id == "Mutation");
        assert!(id != "Query");

        let empty = Id::new("");
        assert!(empty == "");
    }
}
