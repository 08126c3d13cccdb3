use crate::error::{CheckerError, Result};
use std::cmp::Ordering;

/// A strict `MAJOR.MINOR.PATCH` version.
///
/// Anything that is not exactly three dot-separated non-negative integers is
/// rejected, including pre-release (`-rc.1`) and build (`+meta`) suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub fn parse(version: &str) -> Result<Self> {
        let pieces: Vec<&str> = version.splitn(3, '.').collect();
        if pieces.len() != 3 {
            return Err(parse_error(version, "not in the form X.Y.Z".to_string()));
        }

        let component = |label: &str, piece: &str| {
            piece.parse::<u64>().map_err(|e| {
                parse_error(version, format!("bad {label} version '{piece}': {e}"))
            })
        };

        Ok(Self {
            major: component("major", pieces[0])?,
            minor: component("minor", pieces[1])?,
            patch: component("patch", pieces[2])?,
        })
    }

    /// Versions carrying a hyphen are pre-releases (alpha, beta, rc, ...).
    pub fn is_prerelease(version: &str) -> bool {
        version.contains('-')
    }
}

fn parse_error(version: &str, reason: String) -> CheckerError {
    CheckerError::VersionParse {
        version: version.to_string(),
        reason,
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Compare two version strings numerically, component by component.
    pub fn compare(a: &str, b: &str) -> Result<Ordering> {
        Ok(Version::parse(a)?.cmp(&Version::parse(b)?))
    }

    /// Pick the highest stable version from a list.
    ///
    /// Pre-releases are dropped before comparison. Returns `Ok(None)` when no
    /// stable version remains, and fails if any remaining entry is not a
    /// valid `X.Y.Z` version.
    pub fn get_latest(versions: &[String]) -> Result<Option<String>> {
        let mut latest: Option<&String> = None;

        for candidate in versions.iter().filter(|v| !Version::is_prerelease(v)) {
            latest = match latest {
                None => {
                    Version::parse(candidate)?;
                    Some(candidate)
                }
                Some(current) if Self::compare(candidate, current)? == Ordering::Greater => {
                    Some(candidate)
                }
                keep => keep,
            };
        }

        Ok(latest.cloned())
    }
}
