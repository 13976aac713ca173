//! FINDINGS / IMPRESSION section detection in report text
//!
//! Reports are split on single spaces into word tokens; a section starts at
//! its header words followed by a `:` token and runs until the next run of
//! upper-case header words followed by `:`. Entity spans index into the same
//! token sequence.

use radgraph_core::{Entity, TokenSpan};
use std::ops::Range;

const FINDINGS: &[&str] = &["FINDINGS"];
const COMBINED: &[&str] = &["FINDINGS", "AND", "IMPRESSION"];
const IMPRESSION_ALIASES: &[&[&str]] = &[&["IMPRESSION"], &["CONCLUSION"], &["SUMMARY"]];

/// Report section an entity or component belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Findings,
    Impression,
    /// No distinct sections could be told apart
    FindingsAndImpression,
}

impl Section {
    pub fn header(&self) -> &'static str {
        match self {
            Section::Findings => "FINDINGS",
            Section::Impression => "IMPRESSION",
            Section::FindingsAndImpression => "FINDINGS AND IMPRESSION",
        }
    }
}

/// Token ranges of the sections found in one report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    findings: Option<Range<usize>>,
    impression: Option<Range<usize>>,
    unified: bool,
}

impl SectionLayout {
    pub fn locate(text: &str) -> Self {
        let tokens: Vec<&str> = text.split(' ').collect();

        if let Some(start) = section_start(&tokens, COMBINED) {
            let range = start..section_end(&tokens, start, COMBINED.len());
            return Self {
                findings: Some(range.clone()),
                impression: Some(range),
                unified: true,
            };
        }

        let findings = section_start(&tokens, FINDINGS)
            .map(|start| start..section_end(&tokens, start, FINDINGS.len()));
        let impression = IMPRESSION_ALIASES.iter().find_map(|header| {
            section_start(&tokens, header).map(|start| start..section_end(&tokens, start, header.len()))
        });

        let unified = match (&findings, &impression) {
            (None, None) => true,
            (Some(f), Some(i)) => f.start == i.start,
            _ => false,
        };

        Self {
            findings,
            impression,
            unified,
        }
    }

    pub fn findings(&self) -> Option<Range<usize>> {
        self.findings.clone()
    }

    pub fn impression(&self) -> Option<Range<usize>> {
        self.impression.clone()
    }

    pub fn is_unified(&self) -> bool {
        self.unified
    }

    /// Section of a single entity, by its span
    pub fn categorize_entity(&self, entity: &Entity) -> Section {
        if self.unified {
            return Section::FindingsAndImpression;
        }

        match (&self.findings, &self.impression) {
            (None, Some(impression)) if within(impression, entity.span) => Section::Impression,
            (None, _) => Section::Findings,
            (Some(findings), _) if within(findings, entity.span) => Section::Findings,
            (Some(_), _) => Section::Impression,
        }
    }

    /// FINDINGS only when every member is; mixed groups go to IMPRESSION
    pub fn categorize(&self, members: &[&Entity]) -> Section {
        if self.unified {
            return Section::FindingsAndImpression;
        }

        if members
            .iter()
            .all(|entity| self.categorize_entity(entity) == Section::Findings)
        {
            Section::Findings
        } else {
            Section::Impression
        }
    }
}

fn within(range: &Range<usize>, span: Option<TokenSpan>) -> bool {
    span.is_some_and(|span| span.start >= range.start && span.end < range.end)
}

/// Index of the header's first word, where the header words are followed by `:`
fn section_start(tokens: &[&str], header: &[&str]) -> Option<usize> {
    let width = header.len() + 1;
    (0..tokens.len()).find(|&ix| {
        ix + width < tokens.len() && tokens[ix..ix + header.len()] == *header && tokens[ix + header.len()] == ":"
    })
}

/// Index where the section opened at `start` stops: the first word of the
/// next header, or the end of the report
fn section_end(tokens: &[&str], start: usize, header_words: usize) -> usize {
    let content_start = start + header_words + 1;

    for ix in content_start..tokens.len() {
        if tokens[ix] != ":" || !is_header_word(tokens[ix - 1]) {
            continue;
        }

        let mut end = ix;
        while end >= 1 && is_header_word(tokens[end - 1]) {
            end -= 1;
        }
        // a header run glued to this section's own colon is not a new section
        if end != start + header_words + 1 {
            return end;
        }
    }

    tokens.len()
}

/// Upper-case word without punctuation, e.g. `IMPRESSION` or `PA`; rules out
/// times like `10:30` and sentence ends
fn is_header_word(word: &str) -> bool {
    if word.contains(['_', '!', ',', '.']) {
        return false;
    }
    word.chars().any(char::is_uppercase) && !word.chars().any(char::is_lowercase)
}
