//! Version requirement classification and precedence.
//!
//! A declared version is either *soft* (`1.2.3`, advisory and overridden by a
//! dependency-management entry) or *hard* (`[1.2.4]`, `[1.0,2.0)`, used
//! verbatim with its outer delimiters stripped).

/// A classified version expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequirement {
    /// No version declared; the management table must supply one.
    Unspecified,
    Soft(String),
    Hard(String),
}

impl VersionRequirement {
    /// Classify an (already interpolated) version expression.
    pub fn parse(expr: Option<&str>) -> Self {
        let Some(expr) = expr.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Unspecified;
        };
        match strip_range_delimiters(expr) {
            Some(inner) => Self::Hard(inner.to_string()),
            None => Self::Soft(expr.to_string()),
        }
    }

    /// Compute the final version given the managed version for the same GA.
    ///
    /// Hard requirements always win; soft ones yield to management; an
    /// unspecified version is only resolvable through management.
    pub fn resolve(&self, managed: Option<&str>) -> Option<String> {
        let managed = managed.map(|m| strip_range_delimiters(m).unwrap_or(m).to_string());
        match self {
            Self::Hard(v) => Some(v.clone()),
            Self::Soft(v) => Some(managed.unwrap_or_else(|| v.clone())),
            Self::Unspecified => managed,
        }
    }
}

/// Return the inside of `[...]`, `(...]`, `[...)` or `(...)`.
fn strip_range_delimiters(expr: &str) -> Option<&str> {
    let opens = expr.starts_with('[') || expr.starts_with('(');
    let closes = expr.ends_with(']') || expr.ends_with(')');
    if expr.len() >= 2 && opens && closes {
        Some(expr[1..expr.len() - 1].trim())
    } else {
        None
    }
}

/// Whether a resolved version still describes a range rather than one release.
pub fn is_range(version: &str) -> bool {
    version.contains(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_soft_and_hard() {
        assert_eq!(
            VersionRequirement::parse(Some("1.2.3")),
            VersionRequirement::Soft("1.2.3".into())
        );
        assert_eq!(
            VersionRequirement::parse(Some("[1.2.4]")),
            VersionRequirement::Hard("1.2.4".into())
        );
        assert_eq!(
            VersionRequirement::parse(Some("[1.0,2.0)")),
            VersionRequirement::Hard("1.0,2.0".into())
        );
        assert_eq!(VersionRequirement::parse(None), VersionRequirement::Unspecified);
        assert_eq!(
            VersionRequirement::parse(Some("  ")),
            VersionRequirement::Unspecified
        );
    }

    #[test]
    fn half_bracketed_is_soft() {
        assert_eq!(
            VersionRequirement::parse(Some("[1.0")),
            VersionRequirement::Soft("[1.0".into())
        );
    }

    #[test]
    fn management_overrides_soft() {
        let soft = VersionRequirement::Soft("1.2.3".into());
        assert_eq!(soft.resolve(Some("1.7.30")).as_deref(), Some("1.7.30"));
        assert_eq!(soft.resolve(None).as_deref(), Some("1.2.3"));
    }

    #[test]
    fn hard_beats_management() {
        let hard = VersionRequirement::Hard("2.0.0".into());
        assert_eq!(hard.resolve(Some("1.7.30")).as_deref(), Some("2.0.0"));
    }

    #[test]
    fn unspecified_needs_management() {
        let none = VersionRequirement::Unspecified;
        assert_eq!(none.resolve(Some("1.7.30")).as_deref(), Some("1.7.30"));
        assert_eq!(none.resolve(Some("[3.0.0]")).as_deref(), Some("3.0.0"));
        assert_eq!(none.resolve(None), None);
    }

    #[test]
    fn range_detection() {
        assert!(is_range("1.0,2.0"));
        assert!(!is_range("1.2.4"));
    }
}
