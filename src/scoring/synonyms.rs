//! Skill synonym expansion
//!
//! A table maps a broad category (e.g. "databases") to its member terms
//! ("sql", "mysql", ...). Expansion goes one hop in both directions: a category
//! pulls in its members and a member pulls in its category. It never follows
//! chains further than that.

use std::collections::{BTreeMap, BTreeSet};

const BUILT_IN: &[(&str, &[&str])] = &[
    (
        "databases",
        &["sql", "mysql", "postgresql", "nosql", "database management", "database"],
    ),
    (
        "web development",
        &[
            "html", "css", "javascript", "react", "angular", "vue", "node.js", "django", "flask",
            "spring boot", "web dev", "frontend", "backend",
        ],
    ),
    (
        "cloud",
        &["aws", "azure", "gcp", "google cloud", "amazon web services", "cloud computing"],
    ),
    (
        "machine learning",
        &["ml", "deep learning", "tensorflow", "pytorch", "scikit-learn", "ai"],
    ),
    (
        "artificial intelligence",
        &["ai", "ml", "deep learning", "nlp", "computer vision"],
    ),
    (
        "cybersecurity",
        &[
            "security", "network security", "penetration testing", "pen testing",
            "risk assessment", "vulnerability assessment", "infosec",
        ],
    ),
    ("python", &["python3"]),
    ("java", &["java se", "java ee"]),
];

/// Immutable category → members lookup used to widen job skill sets.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl SynonymTable {
    pub fn new(entries: BTreeMap<String, BTreeSet<String>>) -> Self {
        Self { entries }
    }

    pub fn from_pairs(pairs: &[(&str, &[&str])]) -> Self {
        let entries = pairs
            .iter()
            .map(|(category, members)| {
                let members = members.iter().map(|m| m.to_string()).collect();
                (category.to_string(), members)
            })
            .collect();
        Self { entries }
    }

    /// Widen `terms` with their synonyms. The result always contains `terms`.
    pub fn expand(&self, terms: &BTreeSet<String>) -> BTreeSet<String> {
        let mut expanded = terms.clone();

        for term in terms {
            if let Some(members) = self.entries.get(term) {
                expanded.extend(members.iter().cloned());
            }
            for (category, members) in &self.entries {
                if members.contains(term) {
                    expanded.insert(category.clone());
                }
            }
        }

        expanded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::from_pairs(BUILT_IN)
    }
}
