//! Persistence-ready word record derived from a validated model response.

use crate::record::{Category, EntryType, Level, LlmRecord, Meaning};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Stored in place of an empty examples list.
pub const EXAMPLES_PLACEHOLDER: &str = "Examples not found";
/// Stored in place of an empty synonym list.
pub const SYNONYMS_PLACEHOLDER: &str = "No synonyms found";

/// Every field is always populated; empty derived fields hold placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedWordInfo {
    pub word: String,
    pub rank: i64,
    pub rank_range: String,
    pub translation: String,
    pub category: Category,
    pub level: Level,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub frequency: i64,
    pub frequency_group: String,
    /// Newline-joined, `(pos) example` per line.
    pub examples: String,
    pub is_phrasal: bool,
    pub is_idiom: bool,
    /// Comma-joined synonym list.
    pub synonyms: String,
}

impl From<LlmRecord> for EnrichedWordInfo {
    fn from(record: LlmRecord) -> Self {
        let examples = build_examples(&record.meanings);
        let synonyms = format_synonyms(&record.synonyms);
        Self {
            word: record.word,
            rank: record.rank,
            rank_range: record.rank_range,
            translation: record.translation,
            category: record.category,
            level: record.level,
            entry_type: record.entry_type,
            frequency: record.frequency,
            frequency_group: record.frequency_group,
            examples,
            is_phrasal: record.is_phrasal,
            is_idiom: record.is_idiom,
            synonyms,
        }
    }
}

/// Flattens every definition's example in encounter order, dropping exact
/// duplicates.
#[must_use]
pub fn build_examples(meanings: &[Meaning]) -> String {
    let mut seen = HashSet::new();
    let mut lines = Vec::new();

    for meaning in meanings {
        let pos = meaning.part_of_speech.as_deref().unwrap_or_default();
        for definition in &meaning.definitions {
            let Some(example) = definition.example.as_deref().filter(|e| !e.is_empty()) else {
                continue;
            };
            let line = if pos.is_empty() {
                example.to_string()
            } else {
                format!("({pos}) {example}")
            };
            if seen.insert(line.clone()) {
                lines.push(line);
            }
        }
    }

    if lines.is_empty() {
        EXAMPLES_PLACEHOLDER.to_string()
    } else {
        lines.join("\n")
    }
}

#[must_use]
pub fn format_synonyms(synonyms: &[String]) -> String {
    if synonyms.is_empty() {
        SYNONYMS_PLACEHOLDER.to_string()
    } else {
        synonyms.join(", ")
    }
}
