//! Normalized configuration tree.
//!
//! A [`Config`] maps section keyword → section name → [`Section`], and a
//! section maps directive name → argument list. Maps are ordered so that
//! anything derived from the tree (reports, JSON dumps) is deterministic.

use std::collections::BTreeMap;

use serde::Serialize;

/// Keywords that open a new section.
pub const SECTION_KEYWORDS: &[&str] = &[
    "global", "defaults", "listen", "frontend", "backend", "cache", "userlist", "peers",
];

/// Directives whose argument lists are compared without regard to order.
pub const SORTED_DIRECTIVES: &[&str] = &["timeout", "acl", "bind", "server", "option", "stats"];

pub fn is_section_keyword(keyword: &str) -> bool {
    SECTION_KEYWORDS.contains(&keyword)
}

pub fn is_sorted_directive(name: &str) -> bool {
    SORTED_DIRECTIVES.contains(&name)
}

/// Directives of one section, each with its arguments in occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Section {
    directives: BTreeMap<String, Vec<String>>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence of `name` with the raw argument text.
    pub fn push(&mut self, name: impl Into<String>, args: impl Into<String>) {
        self.directives
            .entry(name.into())
            .or_default()
            .push(args.into());
    }

    pub fn directive(&self, name: &str) -> Option<&[String]> {
        self.directives.get(name).map(Vec::as_slice)
    }

    pub fn directives(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.directives
            .iter()
            .map(|(name, args)| (name.as_str(), args.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Sort the order-insensitive directive lists in place.
    pub fn finalize(&mut self) {
        for (name, args) in self.directives.iter_mut() {
            if is_sorted_directive(name) {
                args.sort();
            }
        }
    }
}

/// A whole parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Config {
    sections: BTreeMap<String, BTreeMap<String, Section>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `section` under `(keyword, name)`, returning the section it replaced.
    pub fn insert(
        &mut self,
        keyword: impl Into<String>,
        name: impl Into<String>,
        section: Section,
    ) -> Option<Section> {
        self.sections
            .entry(keyword.into())
            .or_default()
            .insert(name.into(), section)
    }

    pub fn section(&self, keyword: &str, name: &str) -> Option<&Section> {
        self.sections.get(keyword)?.get(name)
    }

    /// Section names grouped under `keyword`.
    pub fn sections_of(&self, keyword: &str) -> Option<&BTreeMap<String, Section>> {
        self.sections.get(keyword)
    }

    /// All sections as `(keyword, name, section)`, ordered by keyword then name.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &str, &Section)> {
        self.sections.iter().flat_map(|(keyword, named)| {
            named
                .iter()
                .map(move |(name, section)| (keyword.as_str(), name.as_str(), section))
        })
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn section_count(&self) -> usize {
        self.sections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
