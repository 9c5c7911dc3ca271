//! Recovering a JSON document from free-form model output.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// A leading ```` ```json ```` marker or a trailing ```` ``` ```` on any line.
#[allow(clippy::expect_used)]
static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```json\s*|```$").expect("code fence pattern is valid"));

/// Removes Markdown code-fence markers from trimmed model output.
#[must_use]
pub fn strip_code_fences(content: &str) -> String {
    CODE_FENCE.replace_all(content.trim(), "").into_owned()
}

/// Parses model output into JSON, tolerating fences and surrounding prose.
///
/// The fence-stripped text is parsed directly first. If that fails, the span
/// from the first `{` to the last `}` is parsed instead.
///
/// # Errors
/// Returns the direct parse error when no brace-delimited span exists, or
/// the span's own parse error when it is not valid JSON either.
pub fn extract_json(content: &str) -> Result<Value, serde_json::Error> {
    let cleaned = strip_code_fences(content);

    match serde_json::from_str(&cleaned) {
        Ok(value) => Ok(value),
        Err(err) => match (cleaned.find('{'), cleaned.rfind('}')) {
            (Some(start), Some(end)) if end > start => serde_json::from_str(&cleaned[start..=end]),
            _ => Err(err),
        },
    }
}
