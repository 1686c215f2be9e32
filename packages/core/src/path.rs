//! Semantic resource paths.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors related to resource path validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path string was empty.
    #[error("path may not be empty")]
    Empty,

    /// The path does not begin with `/`.
    #[error("path must start with '/': {path}")]
    NotAbsolute { path: String },

    /// The path contains an empty segment (`//`).
    #[error("path may not contain empty segments: {path}")]
    EmptySegment { path: String },

    /// The path contains a `.` or `..` segment.
    #[error("path may not contain '{segment}' segments: {path}")]
    RelativeSegment { path: String, segment: String },

    /// The path contains a NUL character.
    #[error("path may not contain NUL characters: {path:?}")]
    Nul { path: String },
}

/// A validated, store-relative resource path.
///
/// Resource paths are what callers use to name resources independently of
/// where the store keeps them. A path is always absolute within its store
/// and already normalized:
///
/// - it begins with `/`
/// - it has no empty segments (`//`)
/// - it has no `.` or `..` segments
/// - it has no NUL characters
///
/// A single trailing `/` is allowed and is kept as part of the path.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourcePath {
    path: String,
}

impl ResourcePath {
    /// Parse and validate a path string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use semres_core::ResourcePath;
    ///
    /// let path = ResourcePath::parse("/docs/index.html").unwrap();
    /// assert_eq!(path.as_str(), "/docs/index.html");
    ///
    /// assert!(ResourcePath::parse("docs/index.html").is_err());
    /// assert!(ResourcePath::parse("/docs/../secret").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PathError> {
        Self::check(s)?;
        Ok(ResourcePath {
            path: s.to_string(),
        })
    }

    /// The root path, `/`.
    pub fn root() -> Self {
        ResourcePath {
            path: "/".to_string(),
        }
    }

    fn check(s: &str) -> Result<(), PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        if !s.starts_with('/') {
            return Err(PathError::NotAbsolute {
                path: s.to_string(),
            });
        }
        if s.contains('\0') {
            return Err(PathError::Nul {
                path: s.to_string(),
            });
        }

        // Skip the leading slash; a trailing slash leaves one empty segment at the end.
        let body = &s[1..];
        let body = body.strip_suffix('/').unwrap_or(body);
        if body.is_empty() {
            return if s.len() == 1 {
                Ok(())
            } else {
                Err(PathError::EmptySegment {
                    path: s.to_string(),
                })
            };
        }

        for segment in body.split('/') {
            match segment {
                "" => {
                    return Err(PathError::EmptySegment {
                        path: s.to_string(),
                    })
                }
                "." | ".." => {
                    return Err(PathError::RelativeSegment {
                        path: s.to_string(),
                        segment: segment.to_string(),
                    })
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// The path as a string, always beginning with `/`.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Whether this is the root path `/`.
    pub fn is_root(&self) -> bool {
        self.path == "/"
    }

    /// Whether this path ends with `/` (and is not the root).
    pub fn has_trailing_slash(&self) -> bool {
        !self.is_root() && self.path.ends_with('/')
    }

    /// Iterate over the non-empty segments of this path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl std::str::FromStr for ResourcePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourcePath::parse(s)
    }
}

impl Serialize for ResourcePath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.path)
    }
}

impl<'de> Deserialize<'de> for ResourcePath {
    fn deserialize<D>(deserializer: D) -> Result<ResourcePath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        ResourcePath::parse(&s).map_err(D::Error::custom)
    }
}

/// Macro for creating resource paths from literals.
///
/// # Example
///
/// ```rust
/// use semres_core::path;
///
/// let p = path!("/images/logo.png");
/// assert_eq!(p.segments().count(), 2);
/// ```
#[macro_export]
macro_rules! path {
    ($s:expr) => {
        $crate::ResourcePath::parse($s).expect("invalid path literal")
    };
}
