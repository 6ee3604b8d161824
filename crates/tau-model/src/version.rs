//! Semantic version values for version-bearing record fields.
//!
//! `SoftwareVersion`, `PanelDataArchiveVersion` and `PreProcessingVersion` are
//! carried as [`Version`] rather than plain strings so that they compare by
//! semantic-version precedence. The textual form is preserved exactly:
//! `text.parse::<Version>()?.to_string() == text` for every accepted input.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Why a version string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum VersionErrorReason {
    #[error("empty version string")]
    Empty,
    #[error("expected MAJOR.MINOR.PATCH, found {0} component(s)")]
    ComponentCount(usize),
    #[error("{0} component is not a non-negative integer")]
    InvalidNumber(&'static str),
    #[error("numeric identifier '{0}' has a leading zero")]
    LeadingZero(String),
    #[error("empty {0} identifier")]
    EmptyIdentifier(&'static str),
    #[error("invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A version string that does not follow semantic-version grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid version '{input}': {reason}")]
pub struct VersionError {
    pub input: String,
    pub reason: VersionErrorReason,
}

impl VersionError {
    fn new(input: &str, reason: VersionErrorReason) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A dot-separated pre-release identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Digits only, compared numerically. Limited to `u64`.
    Numeric(u64),
    /// Contains at least one letter or hyphen, compared in ASCII order.
    AlphaNumeric(String),
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
            (Identifier::Numeric(_), Identifier::AlphaNumeric(_)) => Ordering::Less,
            (Identifier::AlphaNumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
            (Identifier::AlphaNumeric(a), Identifier::AlphaNumeric(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::AlphaNumeric(s) => f.write_str(s),
        }
    }
}

/// A semantic version: `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]`.
///
/// Numeric components and numeric pre-release identifiers are held as `u64`,
/// so a value above `u64::MAX` (more than 20 digits) is rejected with
/// [`VersionErrorReason::InvalidNumber`] even though the grammar itself sets
/// no width limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Pre-release identifiers; empty for a release.
    pub pre: Vec<Identifier>,
    /// Build metadata identifiers; ignored for precedence.
    pub build: Vec<String>,
}

impl Version {
    /// Create a release version without pre-release or build metadata.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Check if this version carries pre-release identifiers.
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// Compare by semantic-version precedence, ignoring build metadata.
    ///
    /// `1.0.0+a` and `1.0.0+b` have equal precedence even though they are not
    /// equal values.
    #[must_use]
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // A pre-release sorts below the release it precedes.
                (false, true) => Ordering::Less,
                (true, false) => Ordering::Greater,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Build metadata only breaks ties so that Ord stays consistent with Eq.
        self.cmp_precedence(other)
            .then_with(|| self.build.cmp(&other.build))
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionError::new(s, VersionErrorReason::Empty));
        }

        let (rest, build) = match s.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (s, None),
        };
        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (rest, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::new(
                s,
                VersionErrorReason::ComponentCount(parts.len()),
            ));
        }
        let major = parse_component(s, parts[0], "major")?;
        let minor = parse_component(s, parts[1], "minor")?;
        let patch = parse_component(s, parts[2], "patch")?;

        let pre = match pre {
            Some(pre) => pre
                .split('.')
                .map(|ident| parse_pre_identifier(s, ident))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };
        let build = match build {
            Some(build) => build
                .split('.')
                .map(|ident| check_identifier(s, ident, "build").map(|()| ident.to_string()))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre,
            build,
        })
    }
}

fn parse_component(input: &str, part: &str, name: &'static str) -> Result<u64, VersionError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::new(
            input,
            VersionErrorReason::InvalidNumber(name),
        ));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(VersionError::new(
            input,
            VersionErrorReason::LeadingZero(part.to_string()),
        ));
    }
    part.parse()
        .map_err(|_| VersionError::new(input, VersionErrorReason::InvalidNumber(name)))
}

fn check_identifier(input: &str, ident: &str, kind: &'static str) -> Result<(), VersionError> {
    if ident.is_empty() {
        return Err(VersionError::new(
            input,
            VersionErrorReason::EmptyIdentifier(kind),
        ));
    }
    if let Some(ch) = ident
        .chars()
        .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-'))
    {
        return Err(VersionError::new(
            input,
            VersionErrorReason::InvalidCharacter(ch),
        ));
    }
    Ok(())
}

fn parse_pre_identifier(input: &str, ident: &str) -> Result<Identifier, VersionError> {
    check_identifier(input, ident, "pre-release")?;
    if !ident.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(Identifier::AlphaNumeric(ident.to_string()));
    }
    if ident.len() > 1 && ident.starts_with('0') {
        return Err(VersionError::new(
            input,
            VersionErrorReason::LeadingZero(ident.to_string()),
        ));
    }
    ident
        .parse()
        .map(Identifier::Numeric)
        .map_err(|_| VersionError::new(input, VersionErrorReason::InvalidNumber("pre-release")))
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            f.write_str("-")?;
            for (idx, ident) in self.pre.iter().enumerate() {
                if idx > 0 {
                    f.write_str(".")?;
                }
                write!(f, "{ident}")?;
            }
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        text.parse().unwrap()
    }

    #[test]
    fn test_parse_release() {
        let version = v("1.2.3");
        assert_eq!(version, Version::new(1, 2, 3));
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_prerelease_and_build() {
        let version = v("1.0.0-alpha.1+build.5");
        assert_eq!(
            version.pre,
            vec![
                Identifier::AlphaNumeric("alpha".to_string()),
                Identifier::Numeric(1)
            ]
        );
        assert_eq!(version.build, vec!["build", "5"]);
        assert!(version.is_prerelease());
    }

    #[test]
    fn test_hyphen_inside_prerelease() {
        let version = v("2.0.0-rc-1");
        assert_eq!(
            version.pre,
            vec![Identifier::AlphaNumeric("rc-1".to_string())]
        );
        assert_eq!(version.to_string(), "2.0.0-rc-1");
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["0.0.0", "4.1.2", "1.0.0-beta", "1.0.0-x.7.z.92", "1.0.0+001", "3.2.1-0.3.7+sha.5114f85"] {
            assert_eq!(v(text).to_string(), text);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(
            "".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::Empty
        );
        assert_eq!(
            "1.2".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::ComponentCount(2)
        );
        assert_eq!(
            "1.2.x".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::InvalidNumber("patch")
        );
        assert_eq!(
            "01.2.3".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::LeadingZero("01".to_string())
        );
        assert_eq!(
            "1.2.3-".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::EmptyIdentifier("pre-release")
        );
        assert_eq!(
            "1.2.3-a_b".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::InvalidCharacter('_')
        );
        assert_eq!(
            "1.2.3-184467440737095516160".parse::<Version>().unwrap_err().reason,
            VersionErrorReason::InvalidNumber("pre-release")
        );
        assert!("v1.2.3".parse::<Version>().is_err());
        assert!(" 1.2.3".parse::<Version>().is_err());
    }

    #[test]
    fn test_precedence_chain() {
        let chain = [
            "1.0.0-alpha",
            "1.0.0-alpha.1",
            "1.0.0-alpha.beta",
            "1.0.0-beta",
            "1.0.0-beta.2",
            "1.0.0-beta.11",
            "1.0.0-rc.1",
            "1.0.0",
            "1.0.1",
            "1.1.0",
            "2.0.0",
        ];
        for pair in chain.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_build_metadata_ignored_for_precedence() {
        let a = v("1.0.0+a");
        let b = v("1.0.0+b");
        assert_eq!(a.cmp_precedence(&b), Ordering::Equal);
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_serde_as_string() {
        let version = v("1.4.0-rc.2");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"1.4.0-rc.2\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, version);
        assert!(serde_json::from_str::<Version>("\"1.4\"").is_err());
    }
}
