use alloc::string::String;
use alloc::vec::Vec;

use super::{Node, Schema};

/// What an object schema does with record keys it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnknownKeys {
    /// Unknown keys are dropped from the output.
    #[default]
    Strip,
    /// Unknown keys are reported as issues.
    Reject,
    /// Unknown keys are copied to the output unvalidated.
    Passthrough,
}

/// Composes named entries into one record schema, with [`UnknownKeys::Strip`].
///
/// Entries keep their insertion order, which is also the order of reported issues.
/// A repeated name replaces the earlier entry in place.
pub fn object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    object_with(entries, UnknownKeys::Strip)
}

/// [`object`] with [`UnknownKeys::Reject`].
pub fn strict_object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    object_with(entries, UnknownKeys::Reject)
}

/// [`object`] with [`UnknownKeys::Passthrough`].
pub fn loose_object<K, I>(entries: I) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    object_with(entries, UnknownKeys::Passthrough)
}

/// [`object`] with an explicit unknown key policy.
pub fn object_with<K, I>(entries: I, unknown_keys: UnknownKeys) -> Schema
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Schema)>,
{
    let mut list: Vec<(String, Schema)> = Vec::new();
    for (name, schema) in entries {
        let name = name.into();
        match list.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = schema,
            None => list.push((name, schema)),
        }
    }
    Schema::from_node(Node::Object {
        entries: list,
        unknown_keys,
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{SchemaKind, boolean, number, string};

    #[test]
    fn keeps_insertion_order() {
        let schema = object([("name", string()), ("age", number()), ("admin", boolean())]);
        let names: Vec<_> = schema
            .entries()
            .unwrap()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, ["name", "age", "admin"]);
        assert_eq!(schema.unknown_keys(), Some(UnknownKeys::Strip));
    }

    #[test]
    fn repeated_name_replaces_in_place() {
        let schema = object([("a", string()), ("b", string()), ("a", number())]);
        let entries = schema.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "a");
        assert_eq!(entries[0].1.kind(), SchemaKind::Number);
    }

    #[test]
    fn empty_object_is_valid() {
        let schema = strict_object(Vec::<(String, Schema)>::new());
        assert_eq!(schema.entries().map(<[_]>::len), Some(0));
        assert_eq!(schema.unknown_keys(), Some(UnknownKeys::Reject));
    }
}
