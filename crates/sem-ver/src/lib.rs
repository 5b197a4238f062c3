use std::{cmp::Ordering, convert::Infallible, str::FromStr};

use num_bigint::BigUint;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::{debug, trace};

static SEM_VER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\Av?([0-9]+)\.([0-9]+)\.([0-9]+)(?:-([A-Za-z0-9_]+))?\z").unwrap()
});

/// Returned when a version that doesn't match the grammar takes part in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid version: {version}")]
pub struct InvalidVersion {
    pub version: String,
}

/// Where a version sits relative to the other versions sharing its
/// major.minor.patch. A release outranks every prerelease of the same triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PrereleaseRank<'a> {
    Prerelease(&'a [u8]),
    Release,
}

type SortKey<'a> = (&'a BigUint, &'a BigUint, &'a BigUint, PrereleaseRank<'a>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Parts {
    major: BigUint,
    minor: BigUint,
    patch: BigUint,
    prerelease: Option<String>,
}

impl Parts {
    fn parse(spec: &str) -> Option<Self> {
        let captures = SEM_VER_REGEX.captures(spec)?;
        let number = |group: usize| -> Option<BigUint> {
            BigUint::parse_bytes(captures.get(group)?.as_str().as_bytes(), 10)
        };

        Some(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            prerelease: captures.get(4).map(|m| m.as_str().to_owned()),
        })
    }

    fn sort_key(&self) -> SortKey<'_> {
        let rank = match &self.prerelease {
            Some(prerelease) => PrereleaseRank::Prerelease(prerelease.as_bytes()),
            None => PrereleaseRank::Release,
        };
        (&self.major, &self.minor, &self.patch, rank)
    }
}

/// A version string of the form `[v]MAJOR.MINOR.PATCH[-PRERELEASE]`.
///
/// Construction never fails. The input is matched against the grammar the
/// first time any accessor needs it, and the result is cached for the
/// lifetime of the value. Invalid versions still render and describe
/// themselves, but refuse to be compared.
#[derive(Clone)]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub struct SemVer {
    spec: String,
    parts: OnceCell<Option<Parts>>,
}

impl SemVer {
    pub fn new(spec: impl Into<String>) -> Self {
        Self {
            spec: spec.into(),
            parts: OnceCell::new(),
        }
    }

    pub fn parse(spec: impl Into<String>) -> Self {
        Self::new(spec)
    }

    /// Like [`SemVer::new`], but rejects input that doesn't match the grammar.
    pub fn parse_valid(spec: impl Into<String>) -> Result<Self, InvalidVersion> {
        let version = Self::new(spec);
        version.valid_parts()?;
        Ok(version)
    }

    fn parts(&self) -> Option<&Parts> {
        self.parts
            .get_or_init(|| {
                let parts = Parts::parse(&self.spec);
                if parts.is_none() {
                    trace!(spec = %self.spec, "version does not match the grammar");
                }
                parts
            })
            .as_ref()
    }

    fn valid_parts(&self) -> Result<&Parts, InvalidVersion> {
        self.parts().ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> InvalidVersion {
        debug!(spec = %self.spec, "refusing to order an invalid version");
        InvalidVersion {
            version: self.to_string(),
        }
    }

    fn sort_key(&self) -> Option<SortKey<'_>> {
        self.parts().map(Parts::sort_key)
    }

    /// The text this version was created from, untouched.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    pub fn is_valid(&self) -> bool {
        self.parts().is_some()
    }

    pub fn major(&self) -> Option<&BigUint> {
        self.parts().map(|p| &p.major)
    }

    pub fn minor(&self) -> Option<&BigUint> {
        self.parts().map(|p| &p.minor)
    }

    pub fn patch(&self) -> Option<&BigUint> {
        self.parts().map(|p| &p.patch)
    }

    pub fn prerelease(&self) -> Option<&str> {
        self.parts().and_then(|p| p.prerelease.as_deref())
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease().is_some()
    }

    /// Orders two valid versions by major, minor, patch and then prerelease.
    ///
    /// Prerelease tags compare byte by byte, so `rc15` sorts before `rc2`,
    /// and a version without a tag sorts after every tagged version with
    /// the same numbers. Fails if either side is invalid, reporting `self`
    /// first.
    pub fn compare(&self, other: &Self) -> Result<Ordering, InvalidVersion> {
        let ours = self.valid_parts()?;
        let theirs = other.valid_parts()?;
        Ok(ours.sort_key().cmp(&theirs.sort_key()))
    }

    pub fn lt(&self, other: &Self) -> Result<bool, InvalidVersion> {
        self.compare(other).map(Ordering::is_lt)
    }

    pub fn le(&self, other: &Self) -> Result<bool, InvalidVersion> {
        self.compare(other).map(Ordering::is_le)
    }

    pub fn gt(&self, other: &Self) -> Result<bool, InvalidVersion> {
        self.compare(other).map(Ordering::is_gt)
    }

    pub fn ge(&self, other: &Self) -> Result<bool, InvalidVersion> {
        self.compare(other).map(Ordering::is_ge)
    }

    pub fn eq_version(&self, other: &Self) -> Result<bool, InvalidVersion> {
        self.compare(other).map(Ordering::is_eq)
    }

    pub fn ne_version(&self, other: &Self) -> Result<bool, InvalidVersion> {
        self.compare(other).map(Ordering::is_ne)
    }

    /// Sorts versions in ascending order. Nothing is reordered if any of
    /// them is invalid.
    pub fn sort(versions: &mut [SemVer]) -> Result<(), InvalidVersion> {
        if let Some(invalid) = versions.iter().find(|v| !v.is_valid()) {
            return Err(invalid.invalid());
        }
        versions.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(())
    }

    /// The greatest of `versions`, or `None` if there are none. When several
    /// compare equal, the first one wins.
    pub fn max<'a>(
        versions: impl IntoIterator<Item = &'a SemVer>,
    ) -> Result<Option<&'a SemVer>, InvalidVersion> {
        let mut best: Option<&'a SemVer> = None;
        for version in versions {
            match best {
                Some(current) if current.compare(version)?.is_ge() => {}
                _ => {
                    version.valid_parts()?;
                    best = Some(version);
                }
            }
        }
        Ok(best)
    }

    pub fn describe(&self) -> String {
        if self.is_valid() {
            format!("<Version: {self}>")
        } else {
            format!("<InvalidVersion: {self}>")
        }
    }
}

impl std::fmt::Display for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(parts) = self.parts() else {
            return f.write_str(&self.spec);
        };

        write!(f, "{}.{}.{}", parts.major, parts.minor, parts.patch)?;
        if let Some(prerelease) = &parts.prerelease {
            write!(f, "-{prerelease}")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for SemVer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

impl FromStr for SemVer {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SemVer::new(s))
    }
}

impl From<&str> for SemVer {
    fn from(spec: &str) -> Self {
        SemVer::new(spec)
    }
}

impl From<String> for SemVer {
    fn from(spec: String) -> Self {
        SemVer::new(spec)
    }
}
