use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::{error, fmt};

use crate::FieldPath;

// -----------------------------------------------------------------------------
// Issue

/// What went wrong at one location of the input.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum IssueKind {
    /// The value has the wrong shape, e.g. a number where a string is expected.
    ///
    /// `received` is `"undefined"` for a missing record key.
    Type {
        expected: Cow<'static, str>,
        received: &'static str,
    },
    /// A record key that the object schema does not declare, under [`UnknownKeys::Reject`].
    ///
    /// [`UnknownKeys::Reject`]: crate::UnknownKeys::Reject
    UnknownKey,
    /// A check of a pipeline rejected the value.
    Check { message: Cow<'static, str> },
    /// A transform of a pipeline failed.
    Transform { message: String },
    /// The rule is a placeholder for something that was never resolved to a schema.
    Unresolved { label: Cow<'static, str> },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { expected, received } => {
                write!(f, "expected {expected}, received {received}")
            }
            Self::UnknownKey => f.write_str("unknown key"),
            Self::Check { message } => f.write_str(message),
            Self::Transform { message } => write!(f, "transform failed: {message}"),
            Self::Unresolved { label } => write!(f, "`{label}` is not a schema"),
        }
    }
}

/// A single validation issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub path: FieldPath,
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            fmt::Display::fmt(&self.kind, f)
        } else {
            write!(f, "`{}`: {}", self.path, self.kind)
        }
    }
}

// -----------------------------------------------------------------------------
// ValidationError

/// The failure of [`parse`](crate::parse): every issue found, in input order.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty(), "validation error without issues");
        Self { issues }
    }

    #[inline]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    #[inline]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Returns the first issue reported at `path` (dotted form, `""` for the root).
    pub fn issue_at(&self, path: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.path.matches(path))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => f.write_str("validation failed"),
            [issue] => write!(f, "validation failed: {issue}"),
            [issue, rest @ ..] => write!(
                f,
                "validation failed: {issue} (and {} more issue(s))",
                rest.len()
            ),
        }
    }
}

impl error::Error for ValidationError {}
