//! Known framework identifiers and their short/full spellings.

/// A framework family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    NetFramework,
    NetCore,
    Windows,
    WindowsPhone,
    WindowsPhoneApp,
    Silverlight,
    Dnx,
    DnxCore,
    NetStandard,
    NetStandardApp,
    NetCoreApp,
    Uap,
    MonoAndroid,
    MonoTouch,
    XamarinIos,
    XamarinMac,
}

struct IdentifierInfo {
    identifier: Identifier,
    short: &'static str,
    full: &'static str,
    dotted: bool,
}

const IDENTIFIERS: &[IdentifierInfo] = &[
    IdentifierInfo { identifier: Identifier::NetFramework, short: "net", full: ".NETFramework", dotted: false },
    IdentifierInfo { identifier: Identifier::NetCore, short: "netcore", full: ".NETCore", dotted: false },
    IdentifierInfo { identifier: Identifier::Windows, short: "win", full: "Windows", dotted: false },
    IdentifierInfo { identifier: Identifier::WindowsPhone, short: "wp", full: "WindowsPhone", dotted: false },
    IdentifierInfo { identifier: Identifier::WindowsPhoneApp, short: "wpa", full: "WindowsPhoneApp", dotted: false },
    IdentifierInfo { identifier: Identifier::Silverlight, short: "sl", full: "Silverlight", dotted: false },
    IdentifierInfo { identifier: Identifier::Dnx, short: "dnx", full: "DNX", dotted: false },
    IdentifierInfo { identifier: Identifier::DnxCore, short: "dnxcore", full: "DNXCore", dotted: false },
    IdentifierInfo { identifier: Identifier::NetStandard, short: "netstandard", full: ".NETStandard", dotted: true },
    IdentifierInfo { identifier: Identifier::NetStandardApp, short: "netstandardapp", full: ".NETStandardApp", dotted: true },
    IdentifierInfo { identifier: Identifier::NetCoreApp, short: "netcoreapp", full: ".NETCoreApp", dotted: true },
    IdentifierInfo { identifier: Identifier::Uap, short: "uap", full: "UAP", dotted: true },
    IdentifierInfo { identifier: Identifier::MonoAndroid, short: "monoandroid", full: "MonoAndroid", dotted: false },
    IdentifierInfo { identifier: Identifier::MonoTouch, short: "monotouch", full: "MonoTouch", dotted: false },
    IdentifierInfo { identifier: Identifier::XamarinIos, short: "xamarinios", full: "Xamarin.iOS", dotted: false },
    IdentifierInfo { identifier: Identifier::XamarinMac, short: "xamarinmac", full: "Xamarin.Mac", dotted: false },
];

impl Identifier {
    fn info(self) -> &'static IdentifierInfo {
        IDENTIFIERS
            .iter()
            .find(|info| info.identifier == self)
            .unwrap_or(&IDENTIFIERS[0])
    }

    /// Look up an identifier by its short spelling (case-insensitive).
    pub fn from_short_name(name: &str) -> Option<Self> {
        IDENTIFIERS
            .iter()
            .find(|info| info.short.eq_ignore_ascii_case(name))
            .map(|info| info.identifier)
    }

    /// The short spelling used in folder names (e.g., "net").
    pub fn short_name(self) -> &'static str {
        self.info().short
    }

    /// The full spelling used in framework names (e.g., ".NETFramework").
    pub fn full_name(self) -> &'static str {
        self.info().full
    }

    /// Whether versions for this family are written with dots
    /// (`netstandard1.3`) rather than compact digits (`net451`).
    pub fn uses_dotted_version(self) -> bool {
        self.info().dotted
    }
}

/// List all known identifiers as (short name, full name) pairs.
pub fn known_identifiers() -> Vec<(&'static str, &'static str)> {
    IDENTIFIERS.iter().map(|info| (info.short, info.full)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Identifier::from_short_name("NET"), Some(Identifier::NetFramework));
        assert_eq!(Identifier::from_short_name("DnxCore"), Some(Identifier::DnxCore));
        assert_eq!(Identifier::from_short_name("bogus"), None);
    }

    #[test]
    fn every_identifier_round_trips() {
        for (short, full) in known_identifiers() {
            let id = Identifier::from_short_name(short).unwrap();
            assert_eq!(id.short_name(), short);
            assert_eq!(id.full_name(), full);
        }
    }

    #[test]
    fn dotted_families() {
        assert!(Identifier::NetStandard.uses_dotted_version());
        assert!(!Identifier::NetFramework.uses_dotted_version());
    }
}
