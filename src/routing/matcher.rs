//! Path pattern matching.
//!
//! # Responsibilities
//! - Compile matcher patterns such as `/admin/:path*`
//! - Match request paths against the compiled patterns
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Segment-aware: `/admin/:path*` matches `/admin` and `/admin/x` but not `/administrator`
//! - A named parameter may only appear as the final segment
//! - No regex to guarantee O(n) matching

use thiserror::Error;

/// Error produced when a matcher pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("pattern '{0}': parameter segment must be last")]
    ParamNotLast(String),

    #[error("pattern '{pattern}': unsupported segment '{segment}'")]
    UnsupportedSegment { pattern: String, segment: String },
}

/// How many trailing segments a pattern accepts after its literal base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// No parameter: the path must equal the base.
    None,
    /// `:name`: exactly one segment.
    One,
    /// `:name+`: one or more segments.
    OneOrMore,
    /// `:name*`: zero or more segments.
    ZeroOrMore,
}

/// A single compiled matcher pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// Literal part without a trailing slash; empty for the root.
    base: String,
    tail: Tail,
}

impl PathPattern {
    /// Compile a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let segments: Vec<&str> = pattern[1..].split('/').filter(|s| !s.is_empty()).collect();
        let mut base = String::new();
        let mut tail = Tail::None;

        for (i, segment) in segments.iter().enumerate() {
            if let Some(param) = segment.strip_prefix(':') {
                if i != segments.len() - 1 {
                    return Err(PatternError::ParamNotLast(pattern.to_string()));
                }
                let (name, kind) = match param.as_bytes().last() {
                    Some(b'*') => (&param[..param.len() - 1], Tail::ZeroOrMore),
                    Some(b'+') => (&param[..param.len() - 1], Tail::OneOrMore),
                    _ => (param, Tail::One),
                };
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                    return Err(PatternError::UnsupportedSegment {
                        pattern: pattern.to_string(),
                        segment: segment.to_string(),
                    });
                }
                tail = kind;
            } else if segment.contains(['*', '+', '?', '(', ')']) {
                return Err(PatternError::UnsupportedSegment {
                    pattern: pattern.to_string(),
                    segment: segment.to_string(),
                });
            } else {
                base.push('/');
                base.push_str(segment);
            }
        }

        Ok(Self { base, tail })
    }

    /// Returns true if the path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        if self.tail == Tail::None {
            let base = if self.base.is_empty() { "/" } else { &self.base };
            return path == base;
        }

        let Some(rest) = path.strip_prefix(self.base.as_str()) else {
            return false;
        };

        match self.tail {
            Tail::None | Tail::ZeroOrMore => rest.is_empty() || rest.starts_with('/'),
            Tail::OneOrMore => rest.len() > 1 && rest.starts_with('/'),
            Tail::One => rest.len() > 1 && rest.starts_with('/') && !rest[1..].contains('/'),
        }
    }
}

/// The set of patterns that route requests through the guard.
#[derive(Debug, Clone, Default)]
pub struct GuardMatcher {
    patterns: Vec<PathPattern>,
}

impl GuardMatcher {
    /// Compile all patterns, failing on the first invalid one.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches. An empty matcher matches nothing.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_or_more() {
        let pattern = PathPattern::parse("/admin/:path*").unwrap();
        assert!(pattern.matches("/admin"));
        assert!(pattern.matches("/admin/"));
        assert!(pattern.matches("/admin/login"));
        assert!(pattern.matches("/admin/users/42/edit"));
        assert!(!pattern.matches("/administrator"));
        assert!(!pattern.matches("/"));
        assert!(!pattern.matches("/api/admin"));
    }

    #[test]
    fn test_one_or_more() {
        let pattern = PathPattern::parse("/admin/:path+").unwrap();
        assert!(!pattern.matches("/admin"));
        assert!(!pattern.matches("/admin/"));
        assert!(pattern.matches("/admin/dashboard"));
        assert!(pattern.matches("/admin/a/b"));
    }

    #[test]
    fn test_single_segment() {
        let pattern = PathPattern::parse("/admin/:page").unwrap();
        assert!(pattern.matches("/admin/settings"));
        assert!(!pattern.matches("/admin/settings/theme"));
        assert!(!pattern.matches("/admin"));
    }

    #[test]
    fn test_exact() {
        let pattern = PathPattern::parse("/admin").unwrap();
        assert!(pattern.matches("/admin"));
        assert!(pattern.matches("/admin/"));
        assert!(!pattern.matches("/admin/login"));

        let root = PathPattern::parse("/").unwrap();
        assert!(root.matches("/"));
        assert!(!root.matches("/admin"));
    }

    #[test]
    fn test_root_catch_all() {
        let pattern = PathPattern::parse("/:path*").unwrap();
        assert!(pattern.matches("/"));
        assert!(pattern.matches("/anything/at/all"));
    }

    #[test]
    fn test_case_sensitive() {
        let pattern = PathPattern::parse("/admin/:path*").unwrap();
        assert!(!pattern.matches("/Admin/dashboard"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            PathPattern::parse("admin/:path*"),
            Err(PatternError::NotAbsolute("admin/:path*".into()))
        );
        assert_eq!(
            PathPattern::parse("/:section/edit"),
            Err(PatternError::ParamNotLast("/:section/edit".into()))
        );
        assert!(matches!(
            PathPattern::parse("/admin/*"),
            Err(PatternError::UnsupportedSegment { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/admin/:*"),
            Err(PatternError::UnsupportedSegment { .. })
        ));
    }

    #[test]
    fn test_guard_matcher_any() {
        let matcher = GuardMatcher::from_patterns(&["/admin/:path*", "/customize/:path+"]).unwrap();
        assert!(matcher.matches("/admin"));
        assert!(matcher.matches("/customize/theme"));
        assert!(!matcher.matches("/customize"));
        assert!(!matcher.matches("/"));

        let empty = GuardMatcher::from_patterns::<&str>(&[]).unwrap();
        assert!(!empty.matches("/admin/dashboard"));
    }
}
