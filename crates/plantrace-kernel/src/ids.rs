//! Identifier extraction and normalization.
//!
//! Planning documents spell identifiers many ways (`REQ-1`, `REQUIREMENT-1`,
//! `1. Foo`, `R1`, `Risk 1`, `RISK-1`). Every spelling collapses to one
//! canonical form per domain: `REQ-<n>` for requirements, `R-<n>` for risks.
//! Normalization is idempotent.

use crate::rules::IdPatterns;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

const WARNING_PREVIEW_CHARS: usize = 60;

/// Which identifier family a document is being read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdDomain {
    Requirement,
    Risk,
}

impl IdDomain {
    pub fn canonical_prefix(self) -> &'static str {
        match self {
            Self::Requirement => "REQ-",
            Self::Risk => "R-",
        }
    }
}

/// One identifier discovered in a document, with best-effort description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identified {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub items: Vec<Identified>,
    pub parse_warnings: Vec<String>,
}

impl Extraction {
    /// Membership set of canonical IDs, used as the coverage universe.
    pub fn universe(&self) -> BTreeSet<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

/// Insertion-ordered set: first occurrence wins, later duplicates are dropped.
#[derive(Debug, Clone, Default)]
pub struct OrderedIds<T> {
    order: Vec<T>,
    slots: HashMap<String, usize>,
}

impl<T> OrderedIds<T> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Inserts `value` under `key` unless the key was already seen.
    pub fn insert(&mut self, key: String, value: T) -> bool {
        if self.slots.contains_key(&key) {
            return false;
        }
        self.slots.insert(key, self.order.len());
        self.order.push(value);
        true
    }

    /// Overwrites the value stored under `key`, keeping its position.
    pub fn replace(&mut self, key: &str, value: T) -> bool {
        match self.slots.get(key).and_then(|&slot| self.order.get_mut(slot)) {
            Some(stored) => {
                *stored = value;
                true
            }
            None => false,
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        self.order
    }
}

/// Canonical form of any identifier spelling in `domain`.
///
/// The first run of digits becomes the number; a token without digits is
/// upper-cased unchanged.
pub fn normalize(patterns: &IdPatterns, domain: IdDomain, raw: &str) -> String {
    match patterns.digits.find(raw) {
        Some(digits) => format!("{}{}", domain.canonical_prefix(), digits.as_str()),
        None => raw.trim().to_uppercase(),
    }
}

/// Every canonical ID of `domain` mentioned anywhere in `text`, in first
/// occurrence order, restricted to `universe` when one is given.
pub fn find_references(
    patterns: &IdPatterns,
    domain: IdDomain,
    text: &str,
    universe: Option<&BTreeSet<String>>,
) -> Vec<String> {
    let inline = match domain {
        IdDomain::Requirement => &patterns.requirement_inline,
        IdDomain::Risk => &patterns.risk_inline,
    };
    let mut refs = OrderedIds::new();
    for found in inline.find_iter(text) {
        let id = normalize(patterns, domain, found.as_str());
        if universe.is_some_and(|known| !known.contains(&id)) {
            continue;
        }
        refs.insert(id.clone(), id);
    }
    refs.into_vec()
}

pub fn extract(patterns: &IdPatterns, domain: IdDomain, text: &str) -> Extraction {
    match domain {
        IdDomain::Requirement => extract_requirements(patterns, text),
        IdDomain::Risk => extract_risks(patterns, text),
    }
}

/// Requirements, one line at a time: heading form, then inline IDs, then a
/// bare numbered item. The first form that matches a line wins.
///
/// A heading numbered without an ID (`## 1. Overview`) holds its slot only
/// until a later line names the same requirement explicitly, which then
/// takes over the description.
pub fn extract_requirements(patterns: &IdPatterns, text: &str) -> Extraction {
    let domain = IdDomain::Requirement;
    let mut items = OrderedIds::new();
    let mut numbered_headings = HashSet::new();
    let mut parse_warnings = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if let Some(caps) = patterns.requirement_heading.captures(line) {
            let description = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            match (caps.get(1), caps.get(2)) {
                (Some(token), _) => {
                    let id = normalize(patterns, domain, token.as_str());
                    claim(&mut items, &mut numbered_headings, id, description);
                }
                (None, Some(number)) => {
                    let id = format!("{}{}", domain.canonical_prefix(), number.as_str());
                    if push_identified(&mut items, id.clone(), description) {
                        numbered_headings.insert(id);
                    }
                }
                (None, None) => {}
            }
            continue;
        }

        let inline = patterns
            .requirement_inline
            .find_iter(line)
            .collect::<Vec<_>>();
        if !inline.is_empty() {
            for found in inline {
                let id = normalize(patterns, domain, found.as_str());
                let description = description_after(&line[found.end()..]);
                claim(&mut items, &mut numbered_headings, id, description);
            }
            continue;
        }

        if let Some(caps) = patterns.numbered_item.captures(line) {
            let id = format!("{}{}", domain.canonical_prefix(), &caps[1]);
            claim(&mut items, &mut numbered_headings, id, caps[2].trim().to_string());
            continue;
        }

        if !is_heading(line) && patterns.requirement_like.is_match(line) {
            parse_warnings.push(format!(
                "line {}: unrecognized requirement-like text: {}",
                index + 1,
                preview(line.trim())
            ));
        }
    }

    if !parse_warnings.is_empty() {
        tracing::debug!(
            count = parse_warnings.len(),
            "requirement-like lines did not match any identifier form"
        );
    }

    Extraction {
        items: items.into_vec(),
        parse_warnings,
    }
}

/// Risks, read only inside "Risk Analysis" / "Potential Risks" sections.
///
/// A section runs from its heading to the next heading whose level is less
/// than or equal to the section heading's level.
pub fn extract_risks(patterns: &IdPatterns, text: &str) -> Extraction {
    let domain = IdDomain::Risk;
    let mut items = OrderedIds::new();
    let mut section_level: Option<usize> = None;

    for line in text.lines() {
        if patterns.risk_section.is_match(line) {
            section_level = Some(heading_level(line));
            continue;
        }

        let Some(level) = section_level else {
            continue;
        };
        if is_heading(line) && heading_level(line) <= level {
            section_level = None;
            continue;
        }

        if let Some(caps) = patterns.risk_table_row.captures(line) {
            let id = normalize(patterns, domain, &caps[1]);
            push_identified(&mut items, id, caps[2].trim().to_string());
            continue;
        }

        if let Some(caps) = patterns.risk_list_item.captures(line) {
            let id = normalize(patterns, domain, &caps[1]);
            push_identified(&mut items, id, caps[2].trim().to_string());
            continue;
        }

        for found in patterns.risk_inline.find_iter(line) {
            let id = normalize(patterns, domain, found.as_str());
            let description = description_after(&line[found.end()..]);
            push_identified(&mut items, id, description);
        }
    }

    Extraction {
        items: items.into_vec(),
        parse_warnings: Vec::new(),
    }
}

fn push_identified(items: &mut OrderedIds<Identified>, id: String, description: String) -> bool {
    items.insert(id.clone(), Identified { id, description })
}

/// An explicit claim: takes over a slot held only by a numbered heading.
fn claim(
    items: &mut OrderedIds<Identified>,
    numbered_headings: &mut HashSet<String>,
    id: String,
    description: String,
) {
    if numbered_headings.remove(&id) {
        let key = id.clone();
        items.replace(&key, Identified { id, description });
    } else {
        push_identified(items, id, description);
    }
}

fn description_after(rest: &str) -> String {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let rest = rest.strip_prefix('-').unwrap_or(rest);
    rest.trim().to_string()
}

fn is_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn heading_level(line: &str) -> usize {
    line.trim_start().chars().take_while(|c| *c == '#').count()
}

fn preview(line: &str) -> String {
    if line.chars().count() <= WARNING_PREVIEW_CHARS {
        return line.to_string();
    }
    let cut: String = line.chars().take(WARNING_PREVIEW_CHARS).collect();
    format!("{cut}...")
}
