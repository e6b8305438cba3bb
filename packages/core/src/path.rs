//! Path type with validated slash-delimited components.

use std::fmt;

/// Errors related to path parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A path component contains a character that cannot appear in a URL
    /// path segment.
    InvalidComponent {
        component: String,
        position: usize,
        message: String,
    },
    /// The path string is invalid as a whole.
    InvalidPath { message: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidComponent {
                component,
                position,
                message,
            } => {
                write!(
                    f,
                    "invalid path component '{}' at position {}: {}",
                    component, position, message
                )
            }
            PathError::InvalidPath { message } => {
                write!(f, "invalid path: {}", message)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A validated SimpleDB path.
///
/// A path is a non-empty sequence of non-empty components, addressing one
/// location in the store. Intermediate components name folders, the last
/// component names either a folder or a stored value.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    components: Vec<String>,
}

impl Path {
    /// Parse a path string, validating components.
    ///
    /// # Path Syntax
    ///
    /// - Components are separated by `/`
    /// - Empty components are ignored (normalizes `//`, leading and
    ///   trailing `/`)
    /// - At least one component must remain; SimpleDB has no root path
    /// - Components must be usable as a raw URL path segment: no
    ///   whitespace, control characters, `?`, `#` or `%`
    ///
    /// # Examples
    ///
    /// ```rust
    /// use simpledb_core::Path;
    ///
    /// let path = Path::parse("greetings/hello").unwrap();
    /// assert_eq!(path.len(), 2);
    ///
    /// // Trailing slashes are normalized
    /// assert_eq!(Path::parse("foo/bar/").unwrap(), Path::parse("foo/bar").unwrap());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        let components: Vec<String> = s
            .split('/')
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string())
            .collect();

        if components.is_empty() {
            return Err(PathError::InvalidPath {
                message: "a path needs at least one component".to_string(),
            });
        }

        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }

        Ok(Path { components })
    }

    /// Try to create a path from components, validating each.
    pub fn try_from_components(components: Vec<String>) -> Result<Self, PathError> {
        if components.is_empty() {
            return Err(PathError::InvalidPath {
                message: "a path needs at least one component".to_string(),
            });
        }
        for (i, component) in components.iter().enumerate() {
            Self::validate_component(component, i)?;
        }
        Ok(Path { components })
    }

    /// Validate a single path component.
    fn validate_component(component: &str, position: usize) -> Result<(), PathError> {
        if component.is_empty() {
            return Err(PathError::InvalidComponent {
                component: component.to_string(),
                position,
                message: "empty component".to_string(),
            });
        }

        for c in component.chars() {
            if c.is_whitespace() || c.is_control() || matches!(c, '?' | '#' | '%') {
                return Err(PathError::InvalidComponent {
                    component: component.to_string(),
                    position,
                    message: format!(
                        "character '{}' is not allowed in a path segment",
                        c.escape_default()
                    ),
                });
            }
        }

        Ok(())
    }

    /// Get the number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// A parsed path is never empty, so this always returns `false`; kept
    /// for `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over components.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.components.iter()
    }

    /// Join this path with another.
    #[must_use]
    pub fn join(&self, other: &Path) -> Path {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Path { components }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl std::ops::Index<usize> for Path {
    type Output = String;

    fn index(&self, i: usize) -> &Self::Output {
        &self.components[i]
    }
}

impl std::str::FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Macro for creating paths from trusted literals.
///
/// # Example
///
/// ```rust
/// use simpledb_core::path;
///
/// let p = path!("greetings/hello");
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::Path::parse($s).expect("invalid path literal")
    };
}
