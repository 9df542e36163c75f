//! Project descriptor reader.
//!
//! Turns a JSON project descriptor (`project.json`) into a normalized
//! [`Project`] for downstream build tooling:
//! - **Version resolution**: snapshot placeholder substitution, file version
//! - **Dependencies**: shorthand or detailed entries with version ranges
//! - **Compiler options**: default, per-configuration and per-framework sets
//! - **Target frameworks**: per-framework dependencies and define symbols
//!
//! Fatal problems abort the read with a located [`ProjectError`]; recoverable
//! ones (unsupported frameworks) are appended to a caller-owned list of
//! [`Diagnostic`]s.

pub mod compiler_options;
pub mod dependency;
pub mod diagnostic;
pub mod error;
pub mod project;
pub mod props;
pub mod range;
pub mod reader;
pub mod settings;
pub mod target_framework;
pub mod version;

// Re-exports for convenience.
pub use compiler_options::CompilerOptions;
pub use dependency::{LibraryDependencyType, LibraryRange, LibraryType};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticSeverity};
pub use error::{ErrorKind, FileFormatError, ProjectError, Result};
pub use project::Project;
pub use props::{PackagePropsFile, PropsError};
pub use range::{FloatBehavior, RangeError, VersionRange};
pub use reader::{ProjectReader, PROJECT_FILE_NAME};
pub use settings::ReadSettings;
pub use target_framework::{make_framework_define, TargetFrameworkInfo};
pub use version::{FileVersion, Version};

pub use projson_frameworks::Framework;
