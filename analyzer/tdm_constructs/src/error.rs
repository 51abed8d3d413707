//! Load errors with positional context.
//!
//! Every load failure is fatal. As an error propagates out of nested reads
//! it collects the path to the offending input (`packages[0].values[1].type`),
//! so one message pinpoints the bad node.

use std::fmt;

use tdm_node::NodeError;

use crate::{ConstructId, Kind, Table};

/// One step of an [`ErrorPath`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

/// Location of a failure inside the source document.
///
/// Segments are stored innermost first, in the order context is attached
/// while the error travels outward.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorPath(Vec<PathSegment>);

impl ErrorPath {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments from the document root inward.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter().rev()
    }

    fn push_outer(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in self.segments() {
            match segment {
                PathSegment::Field(name) if first => f.write_str(name)?,
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
            first = false;
        }
        Ok(())
    }
}

/// What went wrong while loading a project.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadErrorKind {
    /// A required field is absent from the document.
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// An index resolved to a construct of the wrong kind.
    #[error("{table} index {index} should refer to a {expected}, found a {actual}")]
    WrongVariant {
        index: i64,
        table: Table,
        expected: &'static str,
        actual: Kind,
    },

    /// A serialized index outside `[1, count]`.
    #[error("{table} index {index} is out of range [1, {count}]")]
    IndexOutOfRange { index: i64, table: Table, count: usize },

    #[error("no {table} entry matches key `{key}`")]
    UnknownKey { key: String, table: Table },

    /// A key without a trailing ordinal.
    #[error("malformed key `{key}`: expected a name followed by an ordinal")]
    MalformedKey { key: String },

    /// Construct data read before `initialize` completed for it.
    #[error("{kind} {construct} was read before it was initialized")]
    UninitializedAccess { construct: ConstructId, kind: Kind },

    #[error("{kind} {construct} was initialized twice")]
    AlreadyInitialized { construct: ConstructId, kind: Kind },

    /// A construct kind appeared in a section that cannot hold it.
    #[error("a {kind} cannot be initialized in this position")]
    Misplaced { kind: Kind },

    /// The document node had the wrong shape.
    #[error(transparent)]
    Malformed(NodeError),
}

impl LoadErrorKind {
    /// Data errors are caused by bad input; the rest are contract violations
    /// inside the loader itself.
    pub fn is_data_error(&self) -> bool {
        !matches!(
            self,
            LoadErrorKind::UninitializedAccess { .. }
                | LoadErrorKind::AlreadyInitialized { .. }
                | LoadErrorKind::Misplaced { .. }
        )
    }
}

/// A fatal load failure and where in the document it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError {
    path: ErrorPath,
    kind: Box<LoadErrorKind>,
}

impl LoadError {
    pub fn kind(&self) -> &LoadErrorKind {
        &self.kind
    }

    pub fn path(&self) -> &ErrorPath {
        &self.path
    }

    /// Attach a field name as the next-outer path segment.
    #[must_use]
    pub fn at_field(mut self, field: &str) -> Self {
        self.path.push_outer(PathSegment::Field(field.to_owned()));
        self
    }

    /// Attach a list position as the next-outer path segment.
    #[must_use]
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push_outer(PathSegment::Index(index));
        self
    }

    /// Attach a whole outer path, given root-first.
    #[must_use]
    pub(crate) fn within(mut self, outer: &[PathSegment]) -> Self {
        for segment in outer.iter().rev() {
            self.path.push_outer(segment.clone());
        }
        self
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.kind)
    }
}

impl From<LoadErrorKind> for LoadError {
    fn from(kind: LoadErrorKind) -> Self {
        LoadError {
            path: ErrorPath::default(),
            kind: Box::new(kind),
        }
    }
}

/// Missing and mistyped fields keep their field name as path context.
impl From<NodeError> for LoadError {
    fn from(err: NodeError) -> Self {
        match err {
            NodeError::MissingField { field } => {
                LoadError::from(LoadErrorKind::MissingField {
                    field: field.clone(),
                })
                .at_field(&field)
            }
            NodeError::WrongType { ref field, .. } => {
                let field = field.clone();
                LoadError::from(LoadErrorKind::Malformed(err)).at_field(&field)
            }
            other => LoadError::from(LoadErrorKind::Malformed(other)),
        }
    }
}

/// Positional context for any fallible read.
pub(crate) trait Context<T> {
    fn at_field(self, field: &str) -> Result<T, LoadError>;

    fn at_index(self, index: usize) -> Result<T, LoadError>;
}

impl<T, E: Into<LoadError>> Context<T> for Result<T, E> {
    #[inline]
    fn at_field(self, field: &str) -> Result<T, LoadError> {
        self.map_err(|err| err.into().at_field(field))
    }

    #[inline]
    fn at_index(self, index: usize) -> Result<T, LoadError> {
        self.map_err(|err| err.into().at_index(index))
    }
}
