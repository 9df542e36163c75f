//! Descriptor error types.

use std::path::{Path, PathBuf};

use projson_tree::Position;

/// What went wrong in a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The document is not JSON, or its root is not an object.
    MalformedDescriptor,
    /// The `version` value is not a valid semantic version.
    MalformedVersion,
    /// The assembly file version override is malformed.
    MalformedFileVersion,
    /// A dependency entry has an empty name.
    EmptyDependencyKey,
    /// A dependency value is neither a string nor an object.
    InvalidDependencyValue,
    /// A dependency `type` token is not recognized.
    InvalidDependencyType,
    /// A dependency version range cannot be parsed.
    MalformedVersionRange,
    /// A `compilationOptions` member has the wrong shape.
    MalformedCompilerOption,
    /// A script entry is neither a string nor an array of strings.
    InvalidScriptValue,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedDescriptor => "MalformedDescriptor",
            ErrorKind::MalformedVersion => "MalformedVersion",
            ErrorKind::MalformedFileVersion => "MalformedFileVersion",
            ErrorKind::EmptyDependencyKey => "EmptyDependencyKey",
            ErrorKind::InvalidDependencyValue => "InvalidDependencyValue",
            ErrorKind::InvalidDependencyType => "InvalidDependencyType",
            ErrorKind::MalformedVersionRange => "MalformedVersionRange",
            ErrorKind::MalformedCompilerOption => "MalformedCompilerOption",
            ErrorKind::InvalidScriptValue => "InvalidScriptValue",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn format_position(position: &Option<Position>) -> String {
    match position {
        Some(p) => format!("({},{})", p.line, p.column),
        None => String::new(),
    }
}

/// A located problem in a descriptor file.
///
/// Renders as `path(line,column): message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{}: {message}", .path.display(), format_position(.position))]
pub struct FileFormatError {
    pub kind: ErrorKind,
    pub message: String,
    pub path: PathBuf,
    pub position: Option<Position>,
    /// The underlying error when this one wraps a problem found deeper in
    /// the descriptor (e.g., inside a framework node).
    #[source]
    pub inner: Option<Box<FileFormatError>>,
}

impl FileFormatError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        path: &Path,
        position: Option<Position>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            path: path.to_path_buf(),
            position,
            inner: None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.position.map(|p| p.line)
    }

    pub fn column(&self) -> Option<usize> {
        self.position.map(|p| p.column)
    }

    /// Re-locate this error at an enclosing node, keeping the original as
    /// the source.
    pub fn wrap(self, context: &str, position: Position) -> Self {
        Self {
            kind: self.kind,
            message: format!("{context}: {}", self.message),
            path: self.path.clone(),
            position: Some(position),
            inner: Some(Box::new(self)),
        }
    }
}

/// Errors that can occur while reading a project.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The descriptor content is malformed.
    #[error(transparent)]
    Format(#[from] FileFormatError),

    /// The descriptor file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    pub(crate) fn format(
        kind: ErrorKind,
        message: impl Into<String>,
        path: &Path,
        position: Option<Position>,
    ) -> Self {
        ProjectError::Format(FileFormatError::new(kind, message, path, position))
    }

    /// The descriptor error kind, or `None` for I/O failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ProjectError::Format(e) => Some(e.kind),
            ProjectError::Io { .. } => None,
        }
    }

    /// Source position of the offending value, when known.
    pub fn position(&self) -> Option<Position> {
        match self {
            ProjectError::Format(e) => e.position,
            ProjectError::Io { .. } => None,
        }
    }

    pub(crate) fn wrap(self, context: &str, position: Position) -> Self {
        match self {
            ProjectError::Format(e) => ProjectError::Format(e.wrap(context, position)),
            other => other,
        }
    }
}

/// Result type alias for project reading.
pub type Result<T> = std::result::Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_position() {
        let err = FileFormatError::new(
            ErrorKind::EmptyDependencyKey,
            "Unable to resolve dependency ''.",
            Path::new("/src/app/project.json"),
            Some(Position::new(4, 9)),
        );
        assert_eq!(
            format!("{err}"),
            "/src/app/project.json(4,9): Unable to resolve dependency ''."
        );
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.column(), Some(9));
    }

    #[test]
    fn display_without_position() {
        let err = FileFormatError::new(
            ErrorKind::MalformedFileVersion,
            "bad",
            Path::new("project.json"),
            None,
        );
        assert_eq!(format!("{err}"), "project.json: bad");
        assert!(err.line().is_none());
    }

    #[test]
    fn wrap_keeps_kind_and_source() {
        let inner = FileFormatError::new(
            ErrorKind::MalformedCompilerOption,
            "bad option",
            Path::new("project.json"),
            Some(Position::new(9, 20)),
        );
        let wrapped = inner.clone().wrap("framework 'net45'", Position::new(7, 14));
        assert_eq!(wrapped.kind, ErrorKind::MalformedCompilerOption);
        assert_eq!(wrapped.position, Some(Position::new(7, 14)));
        assert_eq!(wrapped.inner.as_deref(), Some(&inner));
        assert!(std::error::Error::source(&wrapped).is_some());
    }

    #[test]
    fn project_error_kind() {
        let err = ProjectError::format(ErrorKind::MalformedVersion, "x", Path::new("p"), None);
        assert_eq!(err.kind(), Some(ErrorKind::MalformedVersion));

        let io = ProjectError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(io.kind().is_none());
        assert!(format!("{io}").starts_with("failed to read missing.json"));
    }
}
