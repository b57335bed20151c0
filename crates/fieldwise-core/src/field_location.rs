//! Location of a node in the compared graphs.
//!
//! A location keeps its decomposed path (`friends`, `[2]`, `name`). Rules
//! match on the path without element segments (`friends.name`) while reports
//! show the full path (`friends.[2].name`).

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

const FIELD_SEPARATOR: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLocation {
    decomposed_path: Vec<String>,
    path_in_rules: String,
    // leaf to root, so regexes try the longest path first
    hierarchy: Vec<String>,
}

impl FieldLocation {
    pub fn new(decomposed_path: Vec<String>) -> Self {
        let path_in_rules = decomposed_path
            .iter()
            .filter(|segment| !segment.starts_with('['))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(FIELD_SEPARATOR);
        let hierarchy = hierarchy_of(&path_in_rules);
        Self {
            decomposed_path,
            path_in_rules,
            hierarchy,
        }
    }

    pub fn root() -> Self {
        Self::new(Vec::new())
    }

    /// Parse a dotted path such as `address.street`
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self::new(path.split(FIELD_SEPARATOR).map(str::to_string).collect())
    }

    /// Location of a child of this location
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut path = self.decomposed_path.clone();
        path.push(name.into());
        Self::new(path)
    }

    /// Location of the element at `index` of the collection at this location
    pub fn element(&self, index: usize) -> Self {
        self.field(format!("[{}]", index))
    }

    pub fn decomposed_path(&self) -> &[String] {
        &self.decomposed_path
    }

    pub fn path_in_rules(&self) -> &str {
        &self.path_in_rules
    }

    pub fn path_in_report(&self) -> String {
        self.decomposed_path.join(FIELD_SEPARATOR)
    }

    /// Last segment of the path, empty for the root
    pub fn field_name(&self) -> &str {
        self.decomposed_path.last().map(String::as_str).unwrap_or("")
    }

    /// The root, or an element of a root collection
    pub fn is_root(&self) -> bool {
        self.path_in_rules.is_empty()
    }

    pub fn is_top_level_field(&self) -> bool {
        !self.is_root() && !self.path_in_rules.contains(FIELD_SEPARATOR)
    }

    pub fn exactly_matches(&self, path: &str) -> bool {
        self.path_in_rules == path
    }

    pub fn exactly_matches_location(&self, other: &FieldLocation) -> bool {
        self.path_in_rules == other.path_in_rules
    }

    /// `name.first` has parent `name`; `names` does not
    pub fn has_parent(&self, parent: &FieldLocation) -> bool {
        self.path_in_rules
            .strip_prefix(parent.path_in_rules.as_str())
            .is_some_and(|rest| rest.starts_with(FIELD_SEPARATOR))
    }

    pub fn has_child(&self, child: &FieldLocation) -> bool {
        child.has_parent(self)
    }

    /// True when this path or one of its parents equals `path`
    pub fn hierarchy_matches(&self, path: &str) -> bool {
        self.hierarchy.iter().any(|p| p == path)
    }

    pub fn hierarchy_matches_regex(&self, pattern: &PathPattern) -> bool {
        self.hierarchy.iter().any(|p| pattern.matches(p))
    }
}

/// A regex that must match a whole path or type name
#[derive(Debug, Clone)]
pub struct PathPattern {
    pattern: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            pattern: pattern.to_string(),
            regex: Regex::new(&format!("^(?:{})$", pattern))?,
        })
    }

    pub fn matches(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }

    /// The pattern as registered
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn hierarchy_of(path_in_rules: &str) -> Vec<String> {
    let mut hierarchy = Vec::new();
    let mut current = path_in_rules;
    while !current.is_empty() {
        hierarchy.push(current.to_string());
        current = match current.rfind(FIELD_SEPARATOR) {
            Some(last_dot) => &current[..last_dot],
            None => "",
        };
    }
    hierarchy
}

impl Ord for FieldLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path_in_rules
            .cmp(&other.path_in_rules)
            .then_with(|| self.decomposed_path.cmp(&other.decomposed_path))
    }
}

impl PartialOrd for FieldLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.path_in_rules)
    }
}
