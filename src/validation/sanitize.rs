use std::borrow::Cow;

#[inline]
fn is_whitelisted(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\t')
}

/// Remove characters below U+0020 other than `\n`, `\r` and `\t`.
///
/// Every other character, including DEL and non-ASCII text, is left intact.
/// Borrows when nothing needs to be removed.
pub fn sanitize(raw: &str) -> Cow<'_, str> {
    strip(raw, |c| (c as u32) >= 0x20 || is_whitelisted(c))
}

/// Keep only printable characters plus `\n`, `\r` and `\t`.
///
/// Drops every Unicode control character (C0, DEL, C1). Only used as the
/// fallback when a control-character parse failure survived [`sanitize`].
pub fn sanitize_aggressive(raw: &str) -> Cow<'_, str> {
    strip(raw, |c| !c.is_control() || is_whitelisted(c))
}

fn strip(raw: &str, keep: impl Fn(char) -> bool) -> Cow<'_, str> {
    if raw.chars().all(&keep) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(raw.chars().filter(|&c| keep(c)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_clean_text_borrowed() {
        let text = "{\"a\":\"línea\\n\"}\n";
        assert!(matches!(sanitize(text), Cow::Borrowed(_)));
    }

    #[test]
    fn test_sanitize_strips_c0_except_whitespace() {
        let text = "a\u{0}b\u{1b}c\u{8}\n\r\td";
        assert_eq!(sanitize(text), "abc\n\r\td");
    }

    #[test]
    fn test_sanitize_keeps_del_and_unicode() {
        let text = "ñ\u{7f}é\u{85}😀";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "",
            "plain",
            "\u{0}\u{1}\u{2}",
            "mixed\u{b}\u{c}\nlines\r\n\ttabs\u{1f}",
            "{\"content\":\"hola\u{7}\nmundo\"}",
        ];
        for s in samples {
            let once = sanitize(s).into_owned();
            assert_eq!(sanitize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_aggressive_drops_all_controls() {
        let text = "año\u{7f}\u{85}\u{b}\u{c}x\n\r\t";
        assert_eq!(sanitize_aggressive(text), "añox\n\r\t");
    }

    #[test]
    fn test_aggressive_is_superset_of_sanitize() {
        let text = "a\u{0}\u{7f}b";
        let aggressive = sanitize_aggressive(text);
        assert_eq!(sanitize_aggressive(&sanitize(text)), aggressive);
    }
}
