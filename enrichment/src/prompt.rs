//! Deterministic prompt construction.
//!
//! The system instructions are rendered from the same closed sets the
//! validator enforces ([`Level::ALL`], [`Category::ALL`]) plus the frequency
//! band tables and calibration anchors below, so the prompt cannot drift
//! from the contract.

use crate::record::{Category, EntryType, Level};
use easyvocab_openrouter::ChatRequest;
use std::fmt::Write;

/// Template for the variable part of the prompt.
pub const USER_TEMPLATE: &str = "Input: ";

/// A rank interval and the frequency group the model should report for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyBand {
    /// Inclusive upper rank, `None` for the open-ended last band.
    pub upper: Option<u32>,
    pub label: &'static str,
}

const fn band(upper: u32, label: &'static str) -> FrequencyBand {
    FrequencyBand {
        upper: Some(upper),
        label,
    }
}

const fn open_band(label: &'static str) -> FrequencyBand {
    FrequencyBand { upper: None, label }
}

pub const WORD_BANDS: [FrequencyBand; 10] = [
    band(500, "Core 500"),
    band(1000, "Core 1000"),
    band(2000, "Core Plus"),
    band(3000, "Active Basic"),
    band(5000, "Active Extended"),
    band(7000, "Fluent Core"),
    band(10_000, "Advanced"),
    band(15_000, "Academic"),
    band(25_000, "Rare"),
    open_band("Obscure"),
];

pub const PHRASE_BANDS: [FrequencyBand; 5] = [
    band(500, "Very Common"),
    band(2000, "Common"),
    band(5000, "Less Common"),
    band(10_000, "Rare"),
    open_band("Very Rare"),
];

#[must_use]
pub const fn bands_for(kind: EntryType) -> &'static [FrequencyBand] {
    match kind {
        EntryType::Word => &WORD_BANDS,
        EntryType::Phrase => &PHRASE_BANDS,
    }
}

/// Band index containing `rank`; ranks past the last threshold land in the
/// open-ended band.
#[must_use]
pub fn band_index(bands: &[FrequencyBand], rank: u32) -> usize {
    bands
        .iter()
        .position(|b| b.upper.is_none_or(|upper| rank <= upper))
        .unwrap_or(bands.len().saturating_sub(1))
}

/// Renders band `index` as `"1001-2000"` or, for the open band, `"25000+"`.
fn range_label(bands: &[FrequencyBand], index: usize, dash: char) -> String {
    let lower = index
        .checked_sub(1)
        .and_then(|prev| bands[prev].upper)
        .map_or(1, |u| u + 1);
    match bands[index].upper {
        Some(upper) => format!("{lower}{dash}{upper}"),
        None => format!("{}+", lower - 1),
    }
}

/// Worked example embedded in the prompt to steady the model's numbers.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationAnchor {
    pub text: &'static str,
    pub kind: EntryType,
    pub level: Level,
    pub rank: u32,
}

pub const CALIBRATION_ANCHORS: [CalibrationAnchor; 6] = [
    CalibrationAnchor { text: "House", kind: EntryType::Word, level: Level::A1, rank: 150 },
    CalibrationAnchor { text: "Challenge", kind: EntryType::Word, level: Level::B1, rank: 1200 },
    CalibrationAnchor { text: "Inevitable", kind: EntryType::Word, level: Level::B2, rank: 4500 },
    CalibrationAnchor { text: "Pragmatic", kind: EntryType::Word, level: Level::C1, rank: 8500 },
    CalibrationAnchor { text: "Take care", kind: EntryType::Phrase, level: Level::A1, rank: 300 },
    CalibrationAnchor { text: "Once in a blue moon", kind: EntryType::Phrase, level: Level::C1, rank: 12_000 },
];

const RESPONSE_FORMAT: &str = r#"{
    "word": "",
    "level": "B2",
    "type": "word | phrase",
    "is_phrasal": true | false,
    "is_idiom": true | false,
    "frequency": 1-10,
    "rank": 1234,
    "rank_range": "1001-2000",
    "frequency_group": "...",
    "translation": "",
    "category": "",
    "synonyms": ["syn1", "syn2", "syn3"],
    "meanings": [
        {
            "partOfSpeech": "",
            "definitions": [{"definition": "", "example": ""}]
        }
    ]
}"#;

/// The instruction pair sent to a chat model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single-string form for completion APIs without a system role.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }

    #[must_use]
    pub fn to_chat_request(&self, model: &str, temperature: f32, max_tokens: u32) -> ChatRequest {
        ChatRequest::new(model)
            .system(self.system.clone())
            .user(self.user.clone())
            .temperature(temperature)
            .max_tokens(max_tokens)
    }
}

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
}

impl PromptBuilder {
    /// Renders the fixed instructions once for the given target language.
    #[must_use]
    pub fn new(translation_language: &str) -> Self {
        Self {
            system: system_instructions(translation_language),
        }
    }

    #[must_use]
    pub fn system_instructions(&self) -> &str {
        &self.system
    }

    /// The input is lower-cased before insertion.
    #[must_use]
    pub fn build(&self, word: &str) -> Prompt {
        Prompt {
            system: self.system.clone(),
            user: format!("{USER_TEMPLATE}{}", word.to_lowercase()),
        }
    }
}

fn system_instructions(translation_language: &str) -> String {
    let mut out = String::from(
        "You are an English lexicography and corpus linguistics expert.\n\
         I am learning English words and phrases. Provide usage examples, translations, and linguistic data.\n\n\
         ### REFERENCE EXAMPLES FOR STABILITY:\n",
    );

    for anchor in &CALIBRATION_ANCHORS {
        let bands = bands_for(anchor.kind);
        let index = band_index(bands, anchor.rank);
        let kind = match anchor.kind {
            EntryType::Word => "Word",
            EntryType::Phrase => "Phrase",
        };
        let _ = writeln!(
            out,
            "- \"{}\" ({kind}) → Level: {}, Rank: {}, Group: {}, Range: {}",
            anchor.text,
            anchor.level,
            anchor.rank,
            bands[index].label,
            range_label(bands, index, '-'),
        );
    }

    let levels: Vec<&str> = Level::ALL.iter().map(|l| l.as_str()).collect();
    let level_list = match levels.split_last() {
        Some((last, rest)) => format!("{}, or {last}", rest.join(", ")),
        None => String::new(),
    };
    let categories: Vec<&str> = Category::ALL
        .iter()
        .filter(|c| **c != Category::General)
        .map(|c| c.as_str())
        .collect();

    let _ = write!(
        out,
        "\n### INSTRUCTIONS:\n\
         1. Provide \"level\" strictly as a single value ({level_list}).\n\
         2. Provide \"rank\" as a realistic estimated frequency number. Be consistent with the Reference Examples above.\n\
         3. For \"synonyms\":\n   \
            - Return them as a LIST of strings.\n   \
            - For words: provide 3-5 single-word synonyms.\n   \
            - For phrases: provide 2-3 alternative phrases.\n\
         4. \"translation\": {translation_language} language, comma-separated if multiple.\n\
         5. \"category\": Choose from [{}]. Use \"{}\" if no match.\n",
        categories.join(", "),
        Category::General,
    );

    let _ = write!(
        out,
        "\n### FREQUENCY RULES:\n- WORDS: {}.\n- PHRASES: {}.\n",
        band_rule(&WORD_BANDS),
        band_rule(&PHRASE_BANDS),
    );

    let _ = write!(out, "\n### RESPONSE FORMAT (JSON only):\n{RESPONSE_FORMAT}\n");
    out
}

fn band_rule(bands: &[FrequencyBand]) -> String {
    bands
        .iter()
        .enumerate()
        .map(|(i, b)| format!("{} ({})", range_label(bands, i, '–'), b.label))
        .collect::<Vec<_>>()
        .join(", ")
}
