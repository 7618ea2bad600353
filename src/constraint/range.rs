//! Composer version constraint parsing.
//!
//! Supports the constraint syntax found in `require.php` entries:
//! - `8.1`, `8.1.0`, `=8.1`, `==8.1` - exact match (partial versions zero-padded)
//! - `^7.4` - next significant release (>=7.4.0 <8.0.0, 0.x special cased)
//! - `~7.4` - last given component may grow (>=7.4.0 <8.0.0; `~7.4.1` <7.5.0)
//! - `>=`, `>`, `<=`, `<`, `!=` - comparison operators
//! - `8.*`, `8.1.x`, `*` - wildcards
//! - `7.0 - 8.1` - inclusive hyphen range, partial upper bounds act as wildcards
//! - `A B` / `A,B` - AND; `A || B` / `A | B` - OR
//!
//! Stability flags (`@dev`, `-beta`) are accepted and ignored.

use regex::Regex;
use semver::Version;
use std::sync::LazyLock;

static VERSION_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?(\d+)(?:\.(\d+|[*xX]))?(?:\.(\d+|[*xX]))?(?:\.\d+)?(?:[-@+].*)?$")
        .expect("version token regex is valid")
});

static HYPHEN_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+-\s+(\S+)$").expect("hyphen range regex is valid")
});

/// Parse a full or partial version string into a [`Version`], padding missing
/// components with zeros.
///
/// - "8" -> 8.0.0
/// - "8.1" -> 8.1.0
/// - "v8.1.3" -> 8.1.3
pub fn parse_version(version: &str) -> Option<Version> {
    let partial = Partial::parse(version.trim())?;
    if partial.wildcard {
        return None;
    }
    Some(partial.floor())
}

/// A version as written, remembering how many components were given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Partial {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
    /// A `*`/`x` component ended the token.
    wildcard: bool,
}

impl Partial {
    fn parse(token: &str) -> Option<Self> {
        let caps = VERSION_TOKEN.captures(token)?;
        let major = caps.get(1)?.as_str().parse().ok()?;

        let mut wildcard = false;
        let mut component = |idx: usize| -> Option<Option<u64>> {
            match caps.get(idx).map(|m| m.as_str()) {
                None => Some(None),
                Some(s) if s == "*" || s.eq_ignore_ascii_case("x") => {
                    wildcard = true;
                    Some(None)
                }
                Some(s) => {
                    if wildcard {
                        // 8.*.1 is not a valid constraint
                        return None;
                    }
                    s.parse().ok().map(Some)
                }
            }
        };

        let minor = component(2)?;
        let patch = component(3)?;
        if minor.is_none() && patch.is_some() {
            return None;
        }

        Some(Self {
            major,
            minor,
            patch,
            wildcard,
        })
    }

    /// Lowest version matching this partial.
    fn floor(&self) -> Version {
        Version::new(
            self.major,
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        )
    }

    /// First version past the last component that was given.
    fn bump_last(&self) -> Version {
        match (self.minor, self.patch) {
            (Some(minor), Some(patch)) => Version::new(self.major, minor, patch + 1),
            (Some(minor), None) => Version::new(self.major, minor + 1, 0),
            _ => Version::new(self.major + 1, 0, 0),
        }
    }

    fn is_complete(&self) -> bool {
        self.patch.is_some()
    }
}

/// A single comparison against one version.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Range {
    Exact(Version),
    NotEqual(Version),
    Gte(Version),
    Gt(Version),
    Lte(Version),
    Lt(Version),
    /// `from <= v < to`
    HalfOpen { from: Version, to: Version },
    /// `from <= v <= to`
    Closed { from: Version, to: Version },
    Any,
}

impl Range {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text == "*" || text.eq_ignore_ascii_case("x") {
            return Some(Range::Any);
        }

        if let Some(caps) = HYPHEN_RANGE.captures(text) {
            let from = Partial::parse(&caps[1])?;
            let to = Partial::parse(&caps[2])?;
            return Some(if to.is_complete() && !to.wildcard {
                Range::Closed {
                    from: from.floor(),
                    to: to.floor(),
                }
            } else {
                Range::HalfOpen {
                    from: from.floor(),
                    to: to.bump_last(),
                }
            });
        }

        let (op, rest) = split_operator(text);
        let partial = Partial::parse(rest.trim())?;

        if partial.wildcard {
            // Wildcards only make sense without an operator.
            if !op.is_empty() && op != "=" && op != "==" {
                return None;
            }
            return Some(Range::HalfOpen {
                from: partial.floor(),
                to: partial.bump_last(),
            });
        }

        let floor = partial.floor();
        let range = match op {
            "" | "=" | "==" => Range::Exact(floor),
            "!=" | "<>" => Range::NotEqual(floor),
            ">=" => Range::Gte(floor),
            ">" => Range::Gt(floor),
            "<=" => Range::Lte(floor),
            "<" => Range::Lt(floor),
            "^" => Range::HalfOpen {
                to: caret_upper(&partial),
                from: floor,
            },
            "~" => Range::HalfOpen {
                to: tilde_upper(&partial),
                from: floor,
            },
            _ => return None,
        };
        Some(range)
    }

    fn satisfies(&self, version: &Version) -> bool {
        match self {
            Range::Exact(v) => version == v,
            Range::NotEqual(v) => version != v,
            Range::Gte(v) => version >= v,
            Range::Gt(v) => version > v,
            Range::Lte(v) => version <= v,
            Range::Lt(v) => version < v,
            Range::HalfOpen { from, to } => version >= from && version < to,
            Range::Closed { from, to } => version >= from && version <= to,
            Range::Any => true,
        }
    }
}

/// `^1.2.3` -> <2.0.0, `^0.3` -> <0.4.0, `^0.0.3` -> <0.0.4
fn caret_upper(p: &Partial) -> Version {
    if p.major > 0 {
        return Version::new(p.major + 1, 0, 0);
    }
    match (p.minor, p.patch) {
        (Some(minor), _) if minor > 0 => Version::new(0, minor + 1, 0),
        (Some(_), Some(patch)) => Version::new(0, 0, patch + 1),
        (Some(_), None) => Version::new(0, 1, 0),
        _ => Version::new(1, 0, 0),
    }
}

/// `~1.2` -> <2.0.0, `~1.2.3` -> <1.3.0, `~1` -> <2.0.0
fn tilde_upper(p: &Partial) -> Version {
    match (p.minor, p.patch) {
        (Some(minor), Some(_)) => Version::new(p.major, minor + 1, 0),
        _ => Version::new(p.major + 1, 0, 0),
    }
}

fn split_operator(text: &str) -> (&str, &str) {
    for op in [">=", "<=", "!=", "<>", "==", ">", "<", "=", "^", "~"] {
        if let Some(rest) = text.strip_prefix(op) {
            return (op, rest);
        }
    }
    ("", text)
}

/// A parsed Composer constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Disjunction of conjunctions.
    alternatives: Vec<Vec<Range>>,
}

impl Constraint {
    /// Parse a constraint string. Returns `None` when any part is malformed.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let alternatives = text
            .split("||")
            .flat_map(|part| part.split('|'))
            .map(parse_conjunction)
            .collect::<Option<Vec<_>>>()?;

        Some(Self { alternatives })
    }

    /// Check whether `version` satisfies any alternative.
    pub fn satisfies(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|ranges| ranges.iter().all(|r| r.satisfies(version)))
    }
}

fn parse_conjunction(part: &str) -> Option<Vec<Range>> {
    let part = part.trim();
    if part.is_empty() {
        return None;
    }

    if HYPHEN_RANGE.is_match(part) {
        return Range::parse(part).map(|r| vec![r]);
    }

    // Glue dangling operators (">= 8.0") back onto their version.
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for raw in part.split([',', ' ', '\t']).filter(|t| !t.is_empty()) {
        if raw.chars().all(|c| "<>=!^~".contains(c)) {
            pending_op.push_str(raw);
            continue;
        }
        tokens.push(format!("{}{}", std::mem::take(&mut pending_op), raw));
    }
    if !pending_op.is_empty() || tokens.is_empty() {
        return None;
    }

    tokens.iter().map(|t| Range::parse(t)).collect()
}
