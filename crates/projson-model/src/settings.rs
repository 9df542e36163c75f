//! Inputs that come from the build environment rather than the descriptor.

/// Environment variable holding the snapshot token for `-*` versions.
pub const BUILD_VERSION_ENV: &str = "DOTNET_BUILD_VERSION";

/// Environment variable holding the assembly file version override.
pub const ASSEMBLY_FILE_VERSION_ENV: &str = "DOTNET_ASSEMBLY_FILE_VERSION";

/// Settings for a single descriptor read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadSettings {
    /// Token substituted for the trailing `*` of a `-*` version.
    pub build_version: Option<String>,
    /// Assembly file version override (`7` or `1.2.3.7`).
    pub assembly_file_version: Option<String>,
}

impl ReadSettings {
    /// Read both settings from the process environment.
    pub fn from_env() -> Self {
        Self {
            build_version: std::env::var(BUILD_VERSION_ENV).ok(),
            assembly_file_version: std::env::var(ASSEMBLY_FILE_VERSION_ENV).ok(),
        }
    }

    pub fn with_build_version(mut self, token: impl Into<String>) -> Self {
        self.build_version = Some(token.into());
        self
    }

    pub fn with_assembly_file_version(mut self, version: impl Into<String>) -> Self {
        self.assembly_file_version = Some(version.into());
        self
    }

    /// The snapshot token, treating an empty value as absent.
    pub fn snapshot(&self) -> Option<&str> {
        self.build_version.as_deref().filter(|s| !s.is_empty())
    }

    /// The file version override, treating blank values as absent.
    pub fn file_version_override(&self) -> Option<&str> {
        self.assembly_file_version
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_absent() {
        let settings = ReadSettings::default()
            .with_build_version("")
            .with_assembly_file_version("   ");
        assert!(settings.snapshot().is_none());
        assert!(settings.file_version_override().is_none());
    }

    #[test]
    fn values_pass_through() {
        let settings = ReadSettings::default()
            .with_build_version("build123")
            .with_assembly_file_version(" 42 ");
        assert_eq!(settings.snapshot(), Some("build123"));
        assert_eq!(settings.file_version_override(), Some("42"));
    }

    #[test]
    fn reads_conventional_variables() {
        std::env::set_var(BUILD_VERSION_ENV, "t-100");
        std::env::set_var(ASSEMBLY_FILE_VERSION_ENV, "5");
        let settings = ReadSettings::from_env();
        std::env::remove_var(BUILD_VERSION_ENV);
        std::env::remove_var(ASSEMBLY_FILE_VERSION_ENV);

        assert_eq!(settings.snapshot(), Some("t-100"));
        assert_eq!(settings.file_version_override(), Some("5"));
    }
}
