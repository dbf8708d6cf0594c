use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{TopicNode, TopicTree};

use super::extract::DocumentText;

pub const SUMMARY_TOPIC: &str = "Document Summary";

// Optional "1." / "2 " numbering, then a capitalized line with no sentence punctuation.
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+[.\s]+)?([A-Z][^.!?]*?)$").unwrap());

/// Thresholds for turning raw text into sections and key points. Lengths are in
/// characters and the ranges are exclusive.
#[derive(Debug, Clone)]
pub struct OutlineRules {
    pub max_heading_chars: usize,
    pub key_point_chars: (usize, usize),
    pub max_key_points: usize,
    pub key_sentence_chars: (usize, usize),
    pub max_key_sentences: usize,
}

impl Default for OutlineRules {
    fn default() -> Self {
        Self {
            max_heading_chars: 100,
            key_point_chars: (20, 150),
            max_key_points: 5,
            key_sentence_chars: (20, 200),
            max_key_sentences: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

pub fn generate_hierarchy(documents: &[DocumentText]) -> TopicTree {
    generate_hierarchy_with(documents, &OutlineRules::default())
}

/// One main topic per document. Sections become subtopics carrying their key points;
/// a document without headings lists its key sentences instead.
pub fn generate_hierarchy_with(documents: &[DocumentText], rules: &OutlineRules) -> TopicTree {
    let mut tree = TopicTree::new(SUMMARY_TOPIC);
    for (idx, doc) in documents.iter().enumerate() {
        let mut main = TopicNode::new(format!("Document {}: {}", idx + 1, doc.file_name()));
        let text = doc.text.joined();
        let sections = extract_sections(&text, rules);

        if sections.is_empty() {
            for sentence in key_sentences(&text, rules) {
                main.push(TopicNode::new(sentence));
            }
        } else {
            for section in sections {
                let points = key_points(&section.body, rules)
                    .into_iter()
                    .map(TopicNode::new)
                    .collect();
                main.push(TopicNode::with_children(section.title, points));
            }
        }
        tracing::info!(
            document = %doc.path.display(),
            subtopics = main.children.len(),
            "analyzed document"
        );
        tree.push_main_topic(main);
    }
    tree
}

pub fn is_heading(line: &str, rules: &OutlineRules) -> bool {
    line.chars().count() < rules.max_heading_chars && HEADING_RE.is_match(line)
}

/// Split text into heading-led sections. Text before the first heading is dropped and
/// a repeated heading replaces the earlier section's body in place.
pub fn extract_sections(text: &str, rules: &OutlineRules) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if is_heading(line, rules) {
            if let Some((title, body)) = current.take() {
                upsert_section(&mut sections, title, body.join("\n"));
            }
            current = Some((line.to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((title, body)) = current {
        upsert_section(&mut sections, title, body.join("\n"));
    }
    sections
}

fn upsert_section(sections: &mut Vec<Section>, title: String, body: String) {
    match sections.iter_mut().find(|section| section.title == title) {
        Some(existing) => existing.body = body,
        None => sections.push(Section { title, body }),
    }
}

pub fn key_points(section_body: &str, rules: &OutlineRules) -> Vec<String> {
    pick_sentences(section_body, rules.key_point_chars, rules.max_key_points)
}

pub fn key_sentences(text: &str, rules: &OutlineRules) -> Vec<String> {
    pick_sentences(text, rules.key_sentence_chars, rules.max_key_sentences)
}

fn pick_sentences(text: &str, (min, max): (usize, usize), limit: usize) -> Vec<String> {
    split_sentences(text)
        .into_iter()
        .filter(|sentence| {
            let len = sentence.chars().count();
            min < len && len < max
        })
        .take(limit)
        .collect()
}

/// Sentence boundaries: `.`, `!` or `?` (plus trailing quotes/brackets) followed by
/// whitespace and a capital, digit or opening quote, or by the end of the text.
/// Whitespace inside each sentence is collapsed to single spaces.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        if !matches!(chars[i], '.' | '!' | '?') {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < chars.len() && matches!(chars[end], '.' | '!' | '?') {
            end += 1;
        }
        while end < chars.len() && is_closing(chars[end]) {
            end += 1;
        }
        let mut next = end;
        while next < chars.len() && chars[next].is_whitespace() {
            next += 1;
        }
        let at_boundary = next == chars.len()
            || (next > end && starts_sentence(chars[next]));
        if at_boundary {
            push_sentence(&mut sentences, &chars[start..end]);
            start = next;
            i = next;
        } else {
            i = end;
        }
    }
    if start < chars.len() {
        push_sentence(&mut sentences, &chars[start..]);
    }
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, chars: &[char]) {
    let raw: String = chars.iter().collect();
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if !normalized.is_empty() {
        sentences.push(normalized);
    }
}

fn is_closing(ch: char) -> bool {
    matches!(ch, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}' | '\u{BB}')
}

fn starts_sentence(ch: char) -> bool {
    ch.is_uppercase()
        || ch.is_ascii_digit()
        || matches!(ch, '"' | '\'' | '(' | '[' | '\u{201C}' | '\u{2018}' | '\u{AB}')
}
