//! Project versions: snapshot substitution and assembly file versions.
//!
//! Wraps the `semver` crate. Version cores written with one or two numeric
//! components (`1`, `1.0-beta`) are padded to three before parsing.

use serde::{Serialize, Serializer};

/// A parsed semantic version.
pub type Version = semver::Version;

/// Marker that turns a version into a snapshot placeholder.
const SNAPSHOT_SUFFIX: &str = "-*";

/// Parse a version string like "1.2.3", "1.0" or "2.0.0-beta+sha".
pub fn parse_version(s: &str) -> Result<Version, semver::Error> {
    Version::parse(&pad_version_core(s))
}

/// Pad a short numeric version core (`1`, `1.2`) to three components.
pub(crate) fn pad_version_core(s: &str) -> String {
    let split = s.find(|c: char| c == '-' || c == '+').unwrap_or(s.len());
    let (core, rest) = s.split_at(split);
    let parts: Vec<&str> = core.split('.').collect();
    let numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if !numeric || parts.len() >= 3 {
        return s.to_string();
    }
    let mut padded = core.to_string();
    for _ in parts.len()..3 {
        padded.push_str(".0");
    }
    padded.push_str(rest);
    padded
}

/// Apply a snapshot token to a raw version string.
///
/// `1.0.0-*` becomes `1.0.0` without a token and `1.0.0-<token>` with one.
/// Other strings are returned unchanged.
pub fn specify_snapshot(version: &str, snapshot: Option<&str>) -> String {
    match version.strip_suffix(SNAPSHOT_SUFFIX) {
        Some(release) => match snapshot.filter(|s| !s.is_empty()) {
            Some(token) => format!("{release}-{token}"),
            None => release.to_string(),
        },
        None => version.to_string(),
    }
}

/// Resolve a raw version string (possibly a snapshot placeholder).
pub fn resolve_version(version: &str, snapshot: Option<&str>) -> Result<Version, semver::Error> {
    parse_version(&specify_snapshot(version, snapshot))
}

/// The version used when a descriptor declares none.
pub fn default_version() -> Version {
    Version::new(1, 0, 0)
}

/// A four-part assembly file version (`major.minor.build.revision`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl FileVersion {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self { major, minor, build, revision }
    }

    /// `major.minor.patch.0` of a project version. `None` if a component
    /// does not fit in 32 bits.
    pub fn from_version(version: &Version) -> Option<Self> {
        Some(Self::new(
            u32::try_from(version.major).ok()?,
            u32::try_from(version.minor).ok()?,
            u32::try_from(version.patch).ok()?,
            0,
        ))
    }

    /// Parse exactly four dot-separated integers.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<u32> = s
            .split('.')
            .map(|p| p.trim().parse().ok())
            .collect::<Option<_>>()?;
        match parts.as_slice() {
            [major, minor, build, revision] => Some(Self::new(*major, *minor, *build, *revision)),
            _ => None,
        }
    }

    /// Resolve the file version for a project version and an optional
    /// override. `None` means the override (or the project version) cannot
    /// be expressed as a file version.
    pub fn resolve(version: &Version, file_version: Option<&str>) -> Option<Self> {
        let base = Self::from_version(version)?;
        match file_version {
            None => Some(base),
            Some(text) => base.with_override(text),
        }
    }

    /// Apply an override: a bare integer replaces the revision, a four-part
    /// version is taken as is.
    pub fn with_override(self, text: &str) -> Option<Self> {
        if text.contains('.') {
            return Self::parse(text);
        }
        let revision = text.parse().ok()?;
        Some(Self { revision, ..self })
    }
}

impl std::fmt::Display for FileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.major, self.minor, self.build, self.revision)
    }
}

impl Serialize for FileVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
