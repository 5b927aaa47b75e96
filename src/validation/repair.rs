use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::CONTROL_CHARACTER_SIGNATURE;
use crate::error::Result;

/// `"content":"` up to the final quote, optionally followed by the closing
/// brace, at the very end of the text. Only the last field can be recovered
/// this way, and a content value containing the literal key breaks it.
static CONTENT_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)("content":\s*")(.*?)("(?:\s*\})?)\z"#).expect("static regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStrategy {
    /// Escape the whole `content` span located by textual anchors.
    ContentSpan,
    /// Escape each control character at the offset the parser reports.
    ParserOffset,
}

impl std::fmt::Display for RepairStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentSpan => write!(f, "content span"),
            Self::ParserOffset => write!(f, "parser offset"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repair {
    /// The input already parses.
    NotNeeded,
    Repaired {
        text: String,
        strategy: RepairStrategy,
    },
    /// Nothing produced parseable JSON; callers keep the original text.
    Failed { reason: String },
}

impl Repair {
    pub fn is_repaired(&self) -> bool {
        matches!(self, Self::Repaired { .. })
    }

    /// Repaired text, or the original when no repair applied.
    pub fn into_text(self, original: &str) -> String {
        match self {
            Self::Repaired { text, .. } => text,
            Self::NotNeeded | Self::Failed { .. } => original.to_string(),
        }
    }
}

/// Best-effort repair of a JSON object broken by unescaped characters.
///
/// The content-span strategy escapes every backslash and quote in the span,
/// including sequences that were already escaped. A content value mixing
/// `\n` escapes with raw line breaks comes back with those escapes as
/// literal backslash text.
pub fn repair_json(raw: &str) -> Repair {
    let first_error = match serde_json::from_str::<Value>(raw) {
        Ok(_) => return Repair::NotNeeded,
        Err(e) => e,
    };
    debug!(error = %first_error, "JSON needs repair");

    let anchored = repair_content_span(raw);
    match serde_json::from_str::<Value>(&anchored) {
        Ok(_) => {
            return Repair::Repaired {
                text: anchored,
                strategy: RepairStrategy::ContentSpan,
            };
        }
        Err(e) => debug!(error = %e, "Content span repair did not parse"),
    }

    match repair_at_parser_offsets(raw) {
        Some(text) => Repair::Repaired {
            text,
            strategy: RepairStrategy::ParserOffset,
        },
        None => Repair::Failed {
            reason: first_error.to_string(),
        },
    }
}

/// Apply [`repair_json`] to a `.json` file in place.
///
/// Other extensions are left alone. An unrepairable file keeps its original
/// text so that validation reports the real parse error.
pub async fn repair_file(path: &Path) -> Result<Repair> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Ok(Repair::NotNeeded);
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let repair = repair_json(&raw);
    match &repair {
        Repair::NotNeeded => debug!(path = %path.display(), "JSON already valid"),
        Repair::Repaired { text, strategy } => {
            tokio::fs::write(path, text).await?;
            info!(path = %path.display(), %strategy, "JSON repaired");
        }
        Repair::Failed { reason } => {
            warn!(path = %path.display(), reason = %reason, "JSON repair failed, keeping original");
        }
    }
    Ok(repair)
}

fn escape_span(span: &str) -> String {
    span.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn repair_content_span(raw: &str) -> String {
    let trimmed = raw.trim_end();
    let replaced = CONTENT_SPAN.replace(trimmed, |caps: &regex::Captures<'_>| {
        format!("{}{}{}", &caps[1], escape_span(&caps[2]), &caps[3])
    });

    let mut text = replaced.trim().to_string();
    if !text.ends_with('}') {
        text.push_str("\n}");
    }
    text
}

fn repair_at_parser_offsets(raw: &str) -> Option<String> {
    let budget = raw.bytes().filter(|b| *b < 0x20).count();
    let mut text = raw.to_string();

    for _ in 0..=budget {
        let err = match serde_json::from_str::<Value>(&text) {
            Ok(_) => return Some(text),
            Err(e) => e,
        };
        if !err.to_string().contains(CONTROL_CHARACTER_SIGNATURE) {
            return None;
        }
        let offset = control_byte_near(&text, error_offset(&text, err.line(), err.column()))?;
        let escaped = escape_control_byte(text.as_bytes()[offset]);
        text.replace_range(offset..=offset, &escaped);
    }
    None
}

/// Byte offset of the last byte the parser consumed before failing.
///
/// Lines are 1-based. Columns count bytes from the line start, so a failure
/// on a consumed newline reports column 0 of the following line.
pub(crate) fn error_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start = text
        .match_indices('\n')
        .nth(line.saturating_sub(2))
        .map(|(i, _)| i + 1)
        .filter(|_| line > 1)
        .unwrap_or(0);

    if column == 0 {
        line_start.saturating_sub(1)
    } else {
        (line_start + column - 1).min(text.len().saturating_sub(1))
    }
}

fn control_byte_near(text: &str, offset: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    [offset, offset.saturating_sub(1), offset + 1]
        .into_iter()
        .find(|&i| bytes.get(i).is_some_and(|b| *b < 0x20))
}

fn escape_control_byte(byte: u8) -> String {
    match byte {
        b'\n' => "\\n".to_string(),
        b'\r' => "\\r".to_string(),
        b'\t' => "\\t".to_string(),
        other => format!("\\u{:04x}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"title":"Hola","slug":"hola","content":"texto\nlinea"}"#;

    #[test]
    fn test_valid_json_is_not_touched() {
        assert_eq!(repair_json(VALID), Repair::NotNeeded);
        assert_eq!(repair_json(VALID).into_text(VALID), VALID);
    }

    #[test]
    fn test_raw_newlines_in_content_are_escaped() {
        let raw = "{\"title\":\"Hola\",\"content\":\"# Titulo\n\nParrafo\tuno\"}";
        let repair = repair_json(raw);

        let Repair::Repaired { text, strategy } = repair else {
            panic!("expected repair, got {repair:?}");
        };
        assert_eq!(strategy, RepairStrategy::ContentSpan);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["content"], "# Titulo\n\nParrafo\tuno");
    }

    #[test]
    fn test_content_span_keeps_existing_escapes_literal() {
        let raw = "{\"slug\":\"a\",\"content\":\"uno\\ndos\ntres\"}";
        let repair = repair_json(raw);

        let Repair::Repaired { text, strategy } = repair else {
            panic!("expected repair, got {repair:?}");
        };
        assert_eq!(strategy, RepairStrategy::ContentSpan);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["content"], "uno\\ndos\ntres");
    }

    #[test]
    fn test_unescaped_quotes_in_content_are_escaped() {
        let raw = "{\"slug\":\"a\",\"content\":\"dijo \"hola\" y\nse fue\"}";
        let text = repair_json(raw).into_text(raw);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["content"], "dijo \"hola\" y\nse fue");
    }

    #[test]
    fn test_missing_closing_brace_is_appended() {
        let raw = "{\"slug\":\"a\",\"content\":\"uno\ndos\"\n";
        let text = repair_json(raw).into_text(raw);
        assert!(text.ends_with("\n}"));
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["content"], "uno\ndos");
    }

    #[test]
    fn test_control_characters_outside_content_use_parser_offsets() {
        let raw = "{\"title\":\"uno\ndos\",\"content\":\"ok\",\"slug\":\"x\"}";
        let repair = repair_json(raw);

        let Repair::Repaired { text, strategy } = repair else {
            panic!("expected repair, got {repair:?}");
        };
        assert_eq!(strategy, RepairStrategy::ParserOffset);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["title"], "uno\ndos");
    }

    #[test]
    fn test_unrepairable_input_keeps_original() {
        let raw = "{\"title\": \"unterminated, \"slug\": }";
        let repair = repair_json(raw);
        assert!(matches!(repair, Repair::Failed { .. }));
        assert_eq!(repair.into_text(raw), raw);
    }

    #[test]
    fn test_error_offset_points_at_consumed_byte() {
        let text = "ab\ncd";
        assert_eq!(error_offset(text, 1, 2), 1);
        assert_eq!(error_offset(text, 2, 0), 2);
        assert_eq!(error_offset(text, 2, 1), 3);
    }

    #[tokio::test]
    async fn test_repair_file_rewrites_json_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let json = dir.path().join("post.json");
        let txt = dir.path().join("post.txt");
        let raw = "{\"slug\":\"a\",\"content\":\"uno\ndos\"}";
        tokio::fs::write(&json, raw).await.unwrap();
        tokio::fs::write(&txt, raw).await.unwrap();

        assert!(repair_file(&json).await.unwrap().is_repaired());
        assert_eq!(repair_file(&txt).await.unwrap(), Repair::NotNeeded);

        let fixed = tokio::fs::read_to_string(&json).await.unwrap();
        assert!(serde_json::from_str::<Value>(&fixed).is_ok());
        assert_eq!(tokio::fs::read_to_string(&txt).await.unwrap(), raw);
    }
}
