//! The structured record a model must return, and the rules that validate
//! and normalize it.
//!
//! Level and entry type are closed sets and an unknown value is a hard
//! failure. Category is also closed but degrades to [`Category::General`]
//! instead of failing.

use crate::error::ValidationError;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// CEFR proficiency tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl Level {
    pub const ALL: [Self; 6] = [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1, Self::C2];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }
}

impl FromStr for Level {
    type Err = ValidationError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidLevel(raw.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the entry is a single word or a multi-word phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Word,
    Phrase,
}

impl EntryType {
    pub const ALL: [Self; 2] = [Self::Word, Self::Phrase];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Phrase => "phrase",
        }
    }
}

impl FromStr for EntryType {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ValidationError::InvalidType(raw.to_string()))
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping tag shown in the vocabulary list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Phrases,
    Verbs,
    Nouns,
    Adverbs,
    Adjectives,
    Idioms,
    General,
}

impl Category {
    pub const ALL: [Self; 7] = [
        Self::Phrases,
        Self::Verbs,
        Self::Nouns,
        Self::Adverbs,
        Self::Adjectives,
        Self::Idioms,
        Self::General,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Phrases => "Phrases",
            Self::Verbs => "Verbs",
            Self::Nouns => "Nouns",
            Self::Adverbs => "Adverbs",
            Self::Adjectives => "Adjectives",
            Self::Idioms => "Idioms",
            Self::General => "General",
        }
    }

    /// Exact (case-sensitive) match after trimming; anything else is `General`.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == trimmed)
            .unwrap_or(Self::General)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(rename = "partOfSpeech", default)]
    pub part_of_speech: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub definitions: Vec<Definition>,
}

/// A model response that passed validation, with every field normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmRecord {
    pub word: String,
    pub level: Level,
    pub entry_type: EntryType,
    pub is_phrasal: bool,
    pub is_idiom: bool,
    pub frequency: i64,
    pub rank: i64,
    pub rank_range: String,
    pub frequency_group: String,
    pub translation: String,
    pub category: Category,
    pub synonyms: Vec<String>,
    pub meanings: Vec<Meaning>,
}

/// Wire shape before validation. Absent optional fields take their defaults.
#[derive(Debug, Deserialize)]
struct RawRecord {
    word: String,
    level: String,
    #[serde(rename = "type")]
    entry_type: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    is_phrasal: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    is_idiom: bool,
    #[serde(default, deserialize_with = "lenient_int")]
    frequency: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    rank: Option<i64>,
    #[serde(default)]
    rank_range: Option<String>,
    #[serde(default)]
    frequency_group: Option<String>,
    #[serde(default)]
    translation: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default, deserialize_with = "synonym_list")]
    synonyms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    meanings: Vec<Meaning>,
}

impl LlmRecord {
    /// Validates an already-parsed JSON document.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a wrong shape, an unknown level or
    /// type, a frequency outside 1-10, a supplied rank below 1, or an empty
    /// word or definition.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let raw: RawRecord = serde_json::from_value(value).map_err(ValidationError::Shape)?;
        Self::validate(raw)
    }

    fn validate(raw: RawRecord) -> Result<Self, ValidationError> {
        if raw.word.trim().is_empty() {
            return Err(ValidationError::EmptyWord);
        }

        let level = raw.level.parse::<Level>()?;
        let entry_type = raw.entry_type.parse::<EntryType>()?;

        // Only supplied values are range-checked; absent ones take defaults.
        let frequency = match raw.frequency {
            Some(f) if !(1..=10).contains(&f) => return Err(ValidationError::FrequencyOutOfRange(f)),
            Some(f) => f,
            None => 1,
        };
        let rank = match raw.rank {
            Some(r) if r < 1 => return Err(ValidationError::NonPositiveRank(r)),
            Some(r) => r,
            None => 0,
        };

        for (m, meaning) in raw.meanings.iter().enumerate() {
            for (d, definition) in meaning.definitions.iter().enumerate() {
                if definition.definition.is_empty() {
                    return Err(ValidationError::EmptyDefinition {
                        meaning: m,
                        definition: d,
                    });
                }
            }
        }

        Ok(Self {
            word: raw.word,
            level,
            entry_type,
            is_phrasal: raw.is_phrasal,
            is_idiom: raw.is_idiom,
            frequency,
            rank,
            rank_range: raw.rank_range.unwrap_or_else(|| "-".to_string()),
            frequency_group: raw.frequency_group.unwrap_or_else(|| "Unknown".to_string()),
            translation: raw.translation.unwrap_or_default(),
            category: raw
                .category
                .as_deref()
                .map_or(Category::General, Category::coerce),
            synonyms: raw.synonyms,
            meanings: raw.meanings,
        })
    }
}

/// Accepts a list, a comma-separated string, or nothing at all.
#[must_use]
pub fn normalize_synonyms(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(ToString::to_string)
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.trim().to_string()),
                other => Some(other.to_string()),
            })
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn synonym_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_synonyms(&value))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integers may arrive as integral floats (`3.0`) or numeric strings (`"3"`).
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got {s:?}"))),
        Some(other) => Err(de::Error::custom(format!("expected an integer, got {other}"))),
    }
}

/// Booleans may arrive as `0`/`1` or as common yes/no spellings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(b),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::custom(format!("expected a boolean, got {n}"))),
        },
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Ok(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Ok(false),
            _ => Err(de::Error::custom(format!("expected a boolean, got {s:?}"))),
        },
        Some(other) => Err(de::Error::custom(format!("expected a boolean, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "word": "house",
            "level": "A1",
            "type": "word",
            "is_phrasal": false,
            "is_idiom": false,
            "frequency": 3,
            "rank": 150,
            "rank_range": "1-500",
            "frequency_group": "Core 500",
            "translation": "будинок",
            "category": "Nouns",
            "synonyms": ["home", "dwelling"],
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{"definition": "A building.", "example": "A house is big."}]
            }]
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut p = payload();
        p[field] = value;
        p
    }

    fn without(field: &str) -> Value {
        let mut p = payload();
        p.as_object_mut().unwrap().remove(field);
        p
    }

    #[test]
    fn test_valid_payload() {
        let record = LlmRecord::from_value(payload()).unwrap();
        assert_eq!(record.word, "house");
        assert_eq!(record.level, Level::A1);
        assert_eq!(record.entry_type, EntryType::Word);
        assert_eq!(record.frequency, 3);
        assert_eq!(record.rank, 150);
        assert_eq!(record.category, Category::Nouns);
        assert_eq!(record.synonyms, vec!["home", "dwelling"]);
        assert_eq!(record.meanings[0].part_of_speech.as_deref(), Some("noun"));
    }

    #[test]
    fn test_level_normalized_to_uppercase() {
        let record = LlmRecord::from_value(with("level", json!(" b1 "))).unwrap();
        assert_eq!(record.level, Level::B1);
    }

    #[test]
    fn test_unknown_level_fails() {
        let err = LlmRecord::from_value(with("level", json!("Z9"))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLevel(ref l) if l == "Z9"));
    }

    #[test]
    fn test_type_normalized_to_lowercase() {
        let record = LlmRecord::from_value(with("type", json!("Phrase"))).unwrap();
        assert_eq!(record.entry_type, EntryType::Phrase);

        let err = LlmRecord::from_value(with("type", json!("sentence"))).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidType(_)));
    }

    #[test]
    fn test_frequency_bounds() {
        for bad in [0, 11, -3] {
            let err = LlmRecord::from_value(with("frequency", json!(bad))).unwrap_err();
            assert!(matches!(err, ValidationError::FrequencyOutOfRange(f) if f == bad));
        }
        for good in [1, 5, 10] {
            let record = LlmRecord::from_value(with("frequency", json!(good))).unwrap();
            assert_eq!(record.frequency, good);
        }
    }

    #[test]
    fn test_rank_must_be_positive() {
        let err = LlmRecord::from_value(with("rank", json!(0))).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveRank(0)));
        let err = LlmRecord::from_value(with("rank", json!(-10))).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveRank(-10)));
    }

    #[test]
    fn test_numeric_strings_and_integral_floats_accepted() {
        let record = LlmRecord::from_value(with("rank", json!("1200"))).unwrap();
        assert_eq!(record.rank, 1200);
        let record = LlmRecord::from_value(with("frequency", json!(4.0))).unwrap();
        assert_eq!(record.frequency, 4);

        let err = LlmRecord::from_value(with("frequency", json!(4.5))).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
        let err = LlmRecord::from_value(with("rank", json!("lots"))).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn test_category_falls_back_to_general() {
        let record = LlmRecord::from_value(with("category", json!("Sports"))).unwrap();
        assert_eq!(record.category, Category::General);

        let record = LlmRecord::from_value(with("category", json!("Idioms"))).unwrap();
        assert_eq!(record.category, Category::Idioms);

        let record = LlmRecord::from_value(with("category", json!(null))).unwrap();
        assert_eq!(record.category, Category::General);
    }

    #[test]
    fn test_synonym_string_matches_list() {
        let from_string = LlmRecord::from_value(with("synonyms", json!("home, dwelling"))).unwrap();
        let from_list = LlmRecord::from_value(with("synonyms", json!(["home", "dwelling"]))).unwrap();
        assert_eq!(from_string.synonyms, from_list.synonyms);
    }

    #[test]
    fn test_synonyms_absent_null_or_odd() {
        assert!(LlmRecord::from_value(without("synonyms")).unwrap().synonyms.is_empty());
        assert!(LlmRecord::from_value(with("synonyms", json!(null))).unwrap().synonyms.is_empty());
        assert!(LlmRecord::from_value(with("synonyms", json!(42))).unwrap().synonyms.is_empty());
        assert_eq!(
            normalize_synonyms(&json!([" abode ", "", null, 7])),
            vec!["abode", "7"]
        );
        assert_eq!(normalize_synonyms(&json!(" , ,home,")), vec!["home"]);
    }

    #[test]
    fn test_defaults_for_absent_fields() {
        let minimal = json!({"word": "house", "level": "a2", "type": "WORD"});
        let record = LlmRecord::from_value(minimal).unwrap();
        assert!(!record.is_phrasal);
        assert!(!record.is_idiom);
        assert_eq!(record.frequency, 1);
        assert_eq!(record.rank, 0);
        assert_eq!(record.rank_range, "-");
        assert_eq!(record.frequency_group, "Unknown");
        assert_eq!(record.translation, "");
        assert_eq!(record.category, Category::General);
        assert!(record.meanings.is_empty());
    }

    #[test]
    fn test_lenient_booleans() {
        let record = LlmRecord::from_value(with("is_idiom", json!("true"))).unwrap();
        assert!(record.is_idiom);
        let record = LlmRecord::from_value(with("is_phrasal", json!(1))).unwrap();
        assert!(record.is_phrasal);
        let err = LlmRecord::from_value(with("is_phrasal", json!("maybe"))).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["word", "level", "type"] {
            let err = LlmRecord::from_value(without(field)).unwrap_err();
            assert!(matches!(err, ValidationError::Shape(_)), "{field}");
        }
        let err = LlmRecord::from_value(with("word", json!(""))).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyWord));
    }

    #[test]
    fn test_empty_definition_fails() {
        let meanings = json!([{"partOfSpeech": "noun", "definitions": [{"definition": ""}]}]);
        let err = LlmRecord::from_value(with("meanings", meanings)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::EmptyDefinition { meaning: 0, definition: 0 }
        ));
    }

    #[test]
    fn test_non_object_payload_fails() {
        let err = LlmRecord::from_value(json!(["house"])).unwrap_err();
        assert!(matches!(err, ValidationError::Shape(_)));
    }
}
