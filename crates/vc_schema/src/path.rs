//! Locations of values inside nested records and arrays.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A record key, displayed as `.key` (without the dot at the start of a path).
    Key(String),
    /// An array index, displayed as `[index]`.
    Index(usize),
}

/// The location of a value relative to the root of a parsed input.
///
/// # Syntax
///
/// - Key: `.name`, e.g. `address.city`
/// - Index: `[number]`, e.g. `tags[1]`
///
/// The root path displays as an empty string.
///
/// # Examples
///
/// ```
/// use vc_schema::FieldPath;
///
/// let mut path = FieldPath::root();
/// path.push_key("address");
/// path.push_key("lines");
/// path.push_index(1);
///
/// assert_eq!(path.to_string(), "address.lines[1]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Returns `true` if `self` equals the dotted form `path`, e.g. `"address.city"`.
    pub fn matches(&self, path: &str) -> bool {
        alloc::format!("{self}") == path
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter
                .into_iter()
                .map(|key| PathSegment::Key(key.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::FieldPath;

    #[test]
    fn display_mixed_segments() {
        let mut path = FieldPath::root();
        path.push_index(0);
        path.push_key("name");
        assert_eq!(path.to_string(), "[0].name");
        assert!(path.matches("[0].name"));

        path.pop();
        path.pop();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn collect_keys() {
        let path: FieldPath = ["person", "address", "city"].into_iter().collect();
        assert_eq!(path.to_string(), "person.address.city");
    }
}
