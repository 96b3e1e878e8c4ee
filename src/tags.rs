//! Centralized release-tag parsing.
//!
//! Release hosts tag versions as `vMAJOR.MINOR.PATCH` (`v2.4.7`), sometimes
//! without the `v` prefix. Branch names (`main`, `feat-docs`) flow through the
//! same display paths as tags, so parsing is lenient: anything that is not a
//! semantic version is still a valid name, it just carries no version.
//!
//! ## Display Titles
//!
//! - `v2.4.7` → version `2.4.7`, displayed as `v2.4.7 (2.4.7)`
//! - `2.4.7`  → version `2.4.7`, displayed as `2.4.7`
//! - `main`   → no version, displayed as `main`

use semver::Version;

/// Result of parsing a release tag or branch name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTag {
    /// The tag exactly as the release API returned it.
    pub raw: String,
    /// Semantic version, if the tag is one (with or without a `v` prefix).
    pub version: Option<Version>,
}

impl ParsedTag {
    /// Display form: the raw tag, with the parsed version appended when the
    /// raw form hides it behind a `v` prefix.
    pub fn display_title(&self) -> String {
        match &self.version {
            Some(v) if self.raw != v.to_string() => format!("{} ({})", self.raw, v),
            _ => self.raw.clone(),
        }
    }
}

/// Parse a tag or branch name.
///
/// Strips a single leading `v` before attempting a semver parse, mirroring
/// the `v2.4.7` tagging convention. Never fails: non-version names come back
/// with `version: None`.
pub fn parse_tag(raw: &str) -> ParsedTag {
    let candidate = raw.strip_prefix('v').unwrap_or(raw);
    ParsedTag {
        raw: raw.to_string(),
        version: Version::parse(candidate).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v_prefixed_tag() {
        let p = parse_tag("v2.4.7");
        assert_eq!(p.raw, "v2.4.7");
        assert_eq!(p.version, Some(Version::new(2, 4, 7)));
        assert_eq!(p.display_title(), "v2.4.7 (2.4.7)");
    }

    #[test]
    fn bare_version_tag() {
        let p = parse_tag("2.4.7");
        assert_eq!(p.version, Some(Version::new(2, 4, 7)));
        assert_eq!(p.display_title(), "2.4.7");
    }

    #[test]
    fn prerelease_tag() {
        let p = parse_tag("v3.0.0-rc.1");
        let version = p.version.expect("prerelease should parse");
        assert_eq!(version.major, 3);
        assert_eq!(version.pre.as_str(), "rc.1");
    }

    #[test]
    fn branch_name_has_no_version() {
        let p = parse_tag("main");
        assert_eq!(p.version, None);
        assert_eq!(p.display_title(), "main");
    }

    #[test]
    fn double_v_is_not_a_version() {
        let p = parse_tag("vv1.0.0");
        assert_eq!(p.version, None);
    }
}
