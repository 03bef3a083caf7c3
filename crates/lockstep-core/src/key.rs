#![forbid(unsafe_code)]

//! Stable reconciliation keys for view nodes.
//!
//! A [`Key`] identifies a view node across reorderings and rebuilds. Keys are
//! extracted from items by the key function of a
//! [`Binding`](crate::binding::Binding) and frozen into the node at build
//! time. They are cheap to clone: integer keys are `Copy`-sized, text keys
//! share their backing allocation.
//!
//! Key collisions are not checked. Two items with the same key reconcile to
//! distinct nodes (the columns are index-aligned, not key-deduplicated), but
//! downstream consumers that cache by key will conflate them.

use std::fmt;
use std::rc::Rc;

/// Identity of a view node, stable across reorderings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Numeric identity, typically a record id or sequence number.
    Int(i64),
    /// Textual identity, typically a slug or composite id.
    Text(Rc<str>),
}

impl Key {
    /// The numeric value, if this is an integer key.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(n) => Some(*n),
            Key::Text(_) => None,
        }
    }

    /// The text value, if this is a text key.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(i64::from(n))
    }
}

impl From<u32> for Key {
    fn from(n: u32) -> Self {
        Key::Int(i64::from(n))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Text(Rc::from(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Text(Rc::from(s))
    }
}

impl From<Rc<str>> for Key {
    fn from(s: Rc<str>) -> Self {
        Key::Text(s)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_and_text_accessors() {
        let a = Key::from(42i64);
        assert_eq!(a.as_int(), Some(42));
        assert_eq!(a.as_text(), None);

        let b = Key::from("r-42");
        assert_eq!(b.as_int(), None);
        assert_eq!(b.as_text(), Some("r-42"));
    }

    #[test]
    fn equality_across_clones() {
        let a = Key::from("shared");
        let b = a.clone();
        assert_eq!(a, b);

        let c = Key::from(String::from("shared"));
        assert_eq!(a, c, "text keys compare by content, not allocation");
    }

    #[test]
    fn int_keys_from_smaller_widths() {
        assert_eq!(Key::from(7i32), Key::Int(7));
        assert_eq!(Key::from(7u32), Key::Int(7));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Key::from(3i64).to_string(), "3");
        assert_eq!(Key::from("abc").to_string(), "abc");
    }

    #[test]
    fn usable_as_map_key() {
        use std::collections::HashMap;
        let mut seen: HashMap<Key, usize> = HashMap::new();
        seen.insert(Key::from(1i64), 10);
        seen.insert(Key::from("one"), 11);
        assert_eq!(seen.get(&Key::Int(1)), Some(&10));
        assert_eq!(seen.get(&Key::from("one")), Some(&11));
    }
}
