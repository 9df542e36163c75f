//! Dependency version ranges.
//!
//! Accepted forms:
//! - `1.2.3`: at least 1.2.3
//! - `[1.0,2.0)`, `(1.0,)`, `[,2.0]`: interval notation
//! - `[1.2.3]`: exactly 1.2.3
//! - `1.0.0-*`, `1.0.0-beta*`, `1.0.0-beta.*`: floating prerelease
//! - `1.*`, `1.2.*`, `*`: floating numeric components

use std::cmp::Ordering;

use serde::{Serialize, Serializer};

use crate::version::{parse_version, Version};

/// Which part of a floating range may move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FloatBehavior {
    /// The prerelease label floats; it must start with the given prefix.
    Prerelease(String),
    /// `1.2.*`
    Patch,
    /// `1.*`
    Minor,
    /// `*`
    Major,
}

/// A constraint over acceptable dependency versions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionRange {
    pub min: Option<Version>,
    pub min_inclusive: bool,
    pub max: Option<Version>,
    pub max_inclusive: bool,
    pub float: Option<FloatBehavior>,
}

/// Why a range string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid version range: {detail}")]
pub struct RangeError {
    pub input: String,
    pub detail: String,
}

fn range_error(input: &str, detail: impl Into<String>) -> RangeError {
    RangeError {
        input: input.to_string(),
        detail: detail.into(),
    }
}

impl VersionRange {
    /// At least `version`, no upper bound.
    pub fn at_least(version: Version) -> Self {
        Self {
            min: Some(version),
            min_inclusive: true,
            max: None,
            max_inclusive: false,
            float: None,
        }
    }

    /// Exactly `version`.
    pub fn exact(version: Version) -> Self {
        Self {
            min: Some(version.clone()),
            min_inclusive: true,
            max: Some(version),
            max_inclusive: true,
            float: None,
        }
    }

    /// Parse a range string.
    pub fn parse(input: &str) -> Result<Self, RangeError> {
        let text = input.trim();
        if text.is_empty() {
            return Err(range_error(input, "empty range"));
        }
        if text.starts_with(['[', '(']) {
            return Self::parse_interval(input, text);
        }
        if text.ends_with(['[', '(', ']', ')']) {
            return Err(range_error(input, "unbalanced brackets"));
        }
        Self::parse_bare(input, text)
    }

    fn parse_bound(input: &str, text: &str) -> Result<Option<Version>, RangeError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        parse_version(text)
            .map(Some)
            .map_err(|e| range_error(input, format!("invalid version '{text}': {e}")))
    }

    fn parse_interval(input: &str, text: &str) -> Result<Self, RangeError> {
        let min_inclusive = text.starts_with('[');
        let max_inclusive = match text.chars().last() {
            Some(']') => true,
            Some(')') => false,
            _ => return Err(range_error(input, "unbalanced brackets")),
        };
        let body = &text[1..text.len() - 1];
        if body.contains(['[', ']', '(', ')']) {
            return Err(range_error(input, "unbalanced brackets"));
        }

        let Some((low, high)) = body.split_once(',') else {
            // A single version is only meaningful as `[x]`.
            if !(min_inclusive && max_inclusive) {
                return Err(range_error(input, "a single-version range must use '[' and ']'"));
            }
            let version = Self::parse_bound(input, body)?
                .ok_or_else(|| range_error(input, "empty range"))?;
            return Ok(Self::exact(version));
        };

        if high.contains(',') {
            return Err(range_error(input, "too many ','"));
        }
        let min = Self::parse_bound(input, low)?;
        let max = Self::parse_bound(input, high)?;
        if min.is_none() && max.is_none() {
            return Err(range_error(input, "range has no bounds"));
        }
        if let (Some(lo), Some(hi)) = (&min, &max) {
            match lo.cmp(hi) {
                Ordering::Greater => {
                    return Err(range_error(input, "minimum is greater than maximum"))
                }
                Ordering::Equal if !(min_inclusive && max_inclusive) => {
                    return Err(range_error(input, "range is empty"))
                }
                _ => {}
            }
        }
        Ok(Self {
            min,
            min_inclusive: min_inclusive && !low.trim().is_empty(),
            max,
            max_inclusive: max_inclusive && !high.trim().is_empty(),
            float: None,
        })
    }

    fn parse_bare(input: &str, text: &str) -> Result<Self, RangeError> {
        if text == "*" {
            return Ok(Self {
                float: Some(FloatBehavior::Major),
                ..Self::at_least(Version::new(0, 0, 0))
            });
        }
        // A '-' before the '*' makes it a prerelease float, even as `-beta.*`.
        if let Some((release, label)) =
            text.strip_suffix('*').and_then(|head| head.split_once('-'))
        {
            let floor_label = label.trim_end_matches(['.', '-']);
            let floor_label = if floor_label.is_empty() { "0" } else { floor_label };
            let floor = Self::parse_bound(input, &format!("{release}-{floor_label}"))?
                .ok_or_else(|| range_error(input, "empty range"))?;
            return Ok(Self {
                float: Some(FloatBehavior::Prerelease(label.to_string())),
                ..Self::at_least(floor)
            });
        }
        if let Some(prefix) = text.strip_suffix(".*") {
            let parts = prefix.split('.').count();
            let float = match parts {
                1 => FloatBehavior::Minor,
                2 => FloatBehavior::Patch,
                _ => return Err(range_error(input, "floating version has too many components")),
            };
            let floor = Self::parse_bound(input, prefix)?
                .ok_or_else(|| range_error(input, "empty range"))?;
            return Ok(Self {
                float: Some(float),
                ..Self::at_least(floor)
            });
        }
        if text.ends_with('*') {
            return Err(range_error(input, "'*' must follow '-' or '.'"));
        }
        let version = Self::parse_bound(input, text)?
            .ok_or_else(|| range_error(input, "empty range"))?;
        Ok(Self::at_least(version))
    }

    /// Whether `version` falls inside the range.
    pub fn satisfies(&self, version: &Version) -> bool {
        if let Some(min) = &self.min {
            match version.cmp(min) {
                Ordering::Less => return false,
                Ordering::Equal if !self.min_inclusive => return false,
                _ => {}
            }
        }
        if let Some(max) = &self.max {
            match version.cmp(max) {
                Ordering::Greater => return false,
                Ordering::Equal if !self.max_inclusive => return false,
                _ => {}
            }
        }
        match (&self.float, &self.min) {
            (Some(FloatBehavior::Minor), Some(min)) => version.major == min.major,
            (Some(FloatBehavior::Patch), Some(min)) => {
                version.major == min.major && version.minor == min.minor
            }
            _ => true,
        }
    }

    /// The lowest version the range admits, if bounded below.
    pub fn min_version(&self) -> Option<&Version> {
        self.min.as_ref()
    }
}

impl std::fmt::Display for VersionRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let (Some(float), Some(min)) = (&self.float, &self.min) {
            return match float {
                FloatBehavior::Major => write!(f, "*"),
                FloatBehavior::Minor => write!(f, "{}.*", min.major),
                FloatBehavior::Patch => write!(f, "{}.{}.*", min.major, min.minor),
                FloatBehavior::Prerelease(label) => {
                    write!(f, "{}.{}.{}-{label}*", min.major, min.minor, min.patch)
                }
            };
        }
        match (&self.min, &self.max) {
            (Some(min), None) if self.min_inclusive => write!(f, "{min}"),
            (Some(min), Some(max)) if min == max && self.min_inclusive && self.max_inclusive => {
                write!(f, "[{min}]")
            }
            (min, max) => {
                let open = if self.min_inclusive { '[' } else { '(' };
                let close = if self.max_inclusive { ']' } else { ')' };
                let lo = min.as_ref().map(Version::to_string).unwrap_or_default();
                let hi = max.as_ref().map(Version::to_string).unwrap_or_default();
                write!(f, "{open}{lo}, {hi}{close}")
            }
        }
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
