//! Permissive version ordering
//!
//! Version strings in recipes are free-form ("2023a", "1.2.3-rc1", "9",
//! "r4.2"). [`LooseVersion`] splits them into runs of digits and runs of
//! letters (anything else is a separator) and compares those components left
//! to right:
//!
//! - two numeric components compare numerically, so `9 < 10`
//! - two alphabetic components compare lexicographically
//! - an alphabetic component sorts before a numeric one, so `1.0rc1 < 1.0.1`
//! - a missing component sorts before any present one, so `1.0 < 1.0.1`
//!
//! Versions whose components are all equal fall back to comparing the
//! original strings, which keeps the order total (`1.01` vs `1.1`).

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Component {
    Alpha(String),
    Num(u64),
}

#[derive(Debug, Clone)]
pub struct LooseVersion {
    original: String,
    components: Vec<Component>,
}

impl LooseVersion {
    pub fn new(version: &str) -> Self {
        Self {
            original: version.to_string(),
            components: tokenize(version),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

fn tokenize(version: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut current = String::new();
    let mut digits = false;

    let flush = |current: &mut String, digits: bool, components: &mut Vec<Component>| {
        if current.is_empty() {
            return;
        }
        let component = if digits {
            current
                .parse::<u64>()
                .map(Component::Num)
                .unwrap_or_else(|_| Component::Alpha(current.clone()))
        } else {
            Component::Alpha(current.clone())
        };
        components.push(component);
        current.clear();
    };

    for c in version.chars() {
        if c.is_ascii_digit() {
            if !digits {
                flush(&mut current, digits, &mut components);
                digits = true;
            }
            current.push(c);
        } else if c.is_alphabetic() {
            if digits {
                flush(&mut current, digits, &mut components);
                digits = false;
            }
            current.push(c);
        } else {
            flush(&mut current, digits, &mut components);
        }
    }
    flush(&mut current, digits, &mut components);

    components
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // Alpha is declared before Num, so the derived order puts letters first
        self.components
            .cmp(&other.components)
            .then_with(|| self.original.cmp(&other.original))
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.original == other.original
    }
}

impl Eq for LooseVersion {}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(versions: &[&str]) -> Vec<String> {
        let mut v: Vec<LooseVersion> = versions.iter().map(|s| LooseVersion::new(s)).collect();
        v.sort();
        v.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert_eq!(sorted(&["10.0", "2.0", "9"]), vec!["2.0", "9", "10.0"]);
    }

    #[test]
    fn test_shorter_version_sorts_first() {
        assert!(LooseVersion::new("1.0") < LooseVersion::new("1.0.1"));
    }

    #[test]
    fn test_prerelease_sorts_before_next_patch() {
        assert!(LooseVersion::new("1.0rc1") < LooseVersion::new("1.0.1"));
        assert!(LooseVersion::new("1.0.0") < LooseVersion::new("1.0.0.1"));
    }

    #[test]
    fn test_toolchain_style_versions() {
        assert_eq!(
            sorted(&["2023b", "2022a", "2023a"]),
            vec!["2022a", "2023a", "2023b"]
        );
    }

    #[test]
    fn test_order_is_total_for_equivalent_components() {
        let a = LooseVersion::new("1.01");
        let b = LooseVersion::new("1.1");
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_does_not_panic() {
        let v = sorted(&["", "---", "abc", "1"]);
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn test_huge_numbers_fall_back_to_text() {
        let v = LooseVersion::new("99999999999999999999999");
        assert_eq!(v.as_str(), "99999999999999999999999");
    }
}
