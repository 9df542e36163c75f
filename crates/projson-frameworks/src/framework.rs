//! Framework moniker parsing and naming.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FrameworkError;
use crate::identifier::Identifier;

/// A four-part framework version (`4.5.1.0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

impl FrameworkVersion {
    pub fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self { major, minor, build, revision }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Parse the version suffix of a short moniker.
    ///
    /// Dotted text (`1.3`) splits on dots; compact text (`451`) takes one
    /// component per digit. Empty text is version zero.
    fn parse_short(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Self::default());
        }
        let parts: Vec<u32> = if text.contains('.') {
            text.split('.')
                .map(|p| {
                    if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                        None
                    } else {
                        p.parse().ok()
                    }
                })
                .collect::<Option<_>>()?
        } else {
            text.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?
        };
        if parts.is_empty() || parts.len() > 4 {
            return None;
        }
        let at = |i: usize| parts.get(i).copied().unwrap_or(0);
        Some(Self::new(at(0), at(1), at(2), at(3)))
    }

    fn components(&self) -> Vec<u32> {
        let mut parts = vec![self.major, self.minor];
        if self.build > 0 || self.revision > 0 {
            parts.push(self.build);
        }
        if self.revision > 0 {
            parts.push(self.revision);
        }
        parts
    }

    fn dotted(&self) -> String {
        self.components()
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    fn compact(&self) -> String {
        self.components().iter().map(u32::to_string).collect()
    }
}

impl std::fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dotted())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Moniker {
    Specific {
        identifier: Identifier,
        version: FrameworkVersion,
        profile: Option<String>,
    },
    Portable {
        members: Vec<Framework>,
        profile_number: Option<u32>,
    },
    Unsupported,
}

/// A resolved target framework.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Framework {
    moniker: Moniker,
}

impl Framework {
    /// Construct a specific framework.
    pub fn new(identifier: Identifier, version: FrameworkVersion, profile: Option<&str>) -> Self {
        Self {
            moniker: Moniker::Specific {
                identifier,
                version,
                profile: profile.map(str::to_ascii_lowercase),
            },
        }
    }

    /// The framework every unrecognized token resolves to.
    pub fn unsupported() -> Self {
        Self { moniker: Moniker::Unsupported }
    }

    /// Parse a short moniker. Never fails; see [`Framework::is_unsupported`].
    pub fn parse(token: &str) -> Self {
        Self::parse_portable(token)
            .or_else(|| Self::parse_specific(token, true))
            .unwrap_or_else(Self::unsupported)
    }

    fn parse_portable(token: &str) -> Option<Self> {
        let prefix = token.get(..9)?;
        if !prefix.eq_ignore_ascii_case("portable-") {
            return None;
        }
        let rest = &token[9..];
        let profile_digits = rest
            .get(..7)
            .filter(|p| p.eq_ignore_ascii_case("profile"))
            .map(|_| &rest[7..]);
        if let Some(digits) = profile_digits {
            let number = digits.parse().ok().filter(|_| !digits.starts_with('+'));
            // An unparseable profile number still yields Some so that the
            // token is not retried as a specific framework.
            return Some(match number {
                Some(n) => Self {
                    moniker: Moniker::Portable { members: Vec::new(), profile_number: Some(n) },
                },
                None => Self::unsupported(),
            });
        }
        if rest.is_empty() {
            return Some(Self::unsupported());
        }
        let members: Option<Vec<Framework>> = rest
            .split('+')
            .map(|member| Self::parse_specific(member, false))
            .collect();
        Some(match members {
            Some(members) => Self {
                moniker: Moniker::Portable { members, profile_number: None },
            },
            None => Self::unsupported(),
        })
    }

    fn parse_specific(token: &str, allow_profile: bool) -> Option<Self> {
        let (base, profile) = match token.split_once('-') {
            Some((base, profile)) if allow_profile => (base, Some(profile)),
            Some(_) => return None,
            None => (token, None),
        };
        if let Some(profile) = profile {
            if profile.is_empty() || !profile.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
        }
        let split = base
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(base.len());
        let (name, version_text) = base.split_at(split);
        let identifier = Identifier::from_short_name(name)?;
        let version = FrameworkVersion::parse_short(version_text)?;
        Some(Self::new(identifier, version, profile))
    }

    /// Whether the token could not be resolved to a known framework.
    pub fn is_unsupported(&self) -> bool {
        matches!(self.moniker, Moniker::Unsupported)
    }

    /// Whether this is a portable class library target.
    pub fn is_pcl(&self) -> bool {
        matches!(self.moniker, Moniker::Portable { .. })
    }

    /// The framework family, for specific frameworks.
    pub fn identifier(&self) -> Option<Identifier> {
        match &self.moniker {
            Moniker::Specific { identifier, .. } => Some(*identifier),
            _ => None,
        }
    }

    /// The framework version; zero for portable and unsupported frameworks.
    pub fn version(&self) -> FrameworkVersion {
        match &self.moniker {
            Moniker::Specific { version, .. } => *version,
            _ => FrameworkVersion::default(),
        }
    }

    pub fn profile(&self) -> Option<&str> {
        match &self.moniker {
            Moniker::Specific { profile, .. } => profile.as_deref(),
            _ => None,
        }
    }

    /// Members of a portable framework, empty otherwise.
    pub fn portable_members(&self) -> &[Framework] {
        match &self.moniker {
            Moniker::Portable { members, .. } => members,
            _ => &[],
        }
    }

    /// The two-digit short folder name (`net45`, `net40-client`,
    /// `netstandard1.3`, `portable-net45+win8`).
    pub fn short_folder_name(&self) -> String {
        match &self.moniker {
            Moniker::Specific { identifier, version, profile } => {
                let mut name = identifier.short_name().to_string();
                if !version.is_zero() {
                    let compact_fits = version.components().iter().all(|c| *c < 10);
                    if identifier.uses_dotted_version() || !compact_fits {
                        name.push_str(&version.dotted());
                    } else {
                        name.push_str(&version.compact());
                    }
                }
                if let Some(profile) = profile {
                    name.push('-');
                    name.push_str(profile);
                }
                name
            }
            Moniker::Portable { members, profile_number } => match profile_number {
                Some(n) => format!("portable-Profile{n}"),
                None => {
                    let names: Vec<String> =
                        members.iter().map(Framework::short_folder_name).collect();
                    format!("portable-{}", names.join("+"))
                }
            },
            Moniker::Unsupported => "unsupported".to_string(),
        }
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.moniker {
            Moniker::Specific { identifier, version, profile } => {
                write!(f, "{},Version=v{version}", identifier.full_name())?;
                if let Some(profile) = profile {
                    let mut chars = profile.chars();
                    let capitalized: String = chars
                        .next()
                        .map(|c| c.to_ascii_uppercase())
                        .into_iter()
                        .chain(chars)
                        .collect();
                    write!(f, ",Profile={capitalized}")?;
                }
                Ok(())
            }
            Moniker::Portable { profile_number: Some(n), .. } => {
                write!(f, ".NETPortable,Version=v0.0,Profile=Profile{n}")
            }
            Moniker::Portable { members, .. } => {
                let names: Vec<String> = members.iter().map(Framework::short_folder_name).collect();
                write!(f, ".NETPortable,Version=v0.0,Profile={}", names.join("+"))
            }
            Moniker::Unsupported => write!(f, "Unsupported,Version=v0.0"),
        }
    }
}

impl FromStr for Framework {
    type Err = FrameworkError;

    /// Strict parse: unsupported tokens are an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let framework = Self::parse(s);
        if framework.is_unsupported() {
            Err(FrameworkError::Unsupported { token: s.to_string() })
        } else {
            Ok(framework)
        }
    }
}

impl Serialize for Framework {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.short_folder_name())
    }
}

impl<'de> Deserialize<'de> for Framework {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::parse(&token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_net45() {
        let fw = Framework::parse("net45");
        assert_eq!(fw.identifier(), Some(Identifier::NetFramework));
        assert_eq!(fw.version(), FrameworkVersion::new(4, 5, 0, 0));
        assert_eq!(fw.short_folder_name(), "net45");
        assert_eq!(fw.to_string(), ".NETFramework,Version=v4.5");
    }

    #[test]
    fn parse_profile() {
        let fw = Framework::parse("net40-client");
        assert_eq!(fw.profile(), Some("client"));
        assert_eq!(fw.short_folder_name(), "net40-client");
        assert_eq!(fw.to_string(), ".NETFramework,Version=v4.0,Profile=Client");
    }

    #[test]
    fn two_digit_folder_names() {
        assert_eq!(Framework::parse("net4").short_folder_name(), "net40");
        assert_eq!(Framework::parse("dnxcore5").short_folder_name(), "dnxcore50");
        assert_eq!(Framework::parse("net451").short_folder_name(), "net451");
        assert_eq!(Framework::parse("NET45").short_folder_name(), "net45");
        assert_eq!(Framework::parse("dnx").short_folder_name(), "dnx");
    }

    #[test]
    fn dotted_versions() {
        let fw = Framework::parse("netstandard1.3");
        assert_eq!(fw.version(), FrameworkVersion::new(1, 3, 0, 0));
        assert_eq!(fw.short_folder_name(), "netstandard1.3");
        assert_eq!(Framework::parse("uap10.0").short_folder_name(), "uap10.0");
        assert_eq!(Framework::parse("net4.5").short_folder_name(), "net45");
    }

    #[test]
    fn portable_frameworks() {
        let fw = Framework::parse("portable-net45+win8");
        assert!(fw.is_pcl());
        assert!(!fw.is_unsupported());
        assert_eq!(fw.portable_members().len(), 2);
        assert_eq!(fw.short_folder_name(), "portable-net45+win8");

        let profile = Framework::parse("portable-Profile259");
        assert!(profile.is_pcl());
        assert_eq!(profile.short_folder_name(), "portable-Profile259");
    }

    #[test]
    fn unsupported_tokens() {
        for token in [
            "", "foo", "net45-", "net4x", "net45-cli ent", "###", "portable-",
            "portable-net45+bogus", "portable-Profilexyz", "net12345",
        ] {
            assert!(Framework::parse(token).is_unsupported(), "{token:?} should be unsupported");
        }
    }

    #[test]
    fn from_str_rejects_unsupported() {
        assert!("net45".parse::<Framework>().is_ok());
        let err = "nope".parse::<Framework>().unwrap_err();
        assert_eq!(err.to_string(), "'nope' is an unsupported framework");
    }

    #[test]
    fn equal_tokens_compare_equal() {
        assert_eq!(Framework::parse("net45"), Framework::parse("NET4.5"));
        assert_ne!(Framework::parse("net45"), Framework::parse("net451"));
    }

    #[test]
    fn serializes_as_short_name() {
        let json = serde_json::to_string(&Framework::parse("net40-client")).unwrap();
        assert_eq!(json, "\"net40-client\"");
        let back: Framework = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Framework::parse("net40-client"));
    }
}
