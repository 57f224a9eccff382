//! Markup stripping for result snippets.
//!
//! Upstream bodies arrive as HTML fragments. [`normalize`] turns them into a
//! single line of plain text bounded to a character limit, suitable for a
//! result preview.

/// Returned when the input carries no visible text.
pub const EMPTY_PREVIEW: &str = "No preview available";

/// Appended when the text was cut.
pub const ELLIPSIS: &str = "...";

/// Snippet length used by the help-center adapters.
pub const SNIPPET_LENGTH: usize = 200;

/// Fraction of `max_length` past which a word boundary is preferred as the
/// cut point.
const WORD_BREAK_THRESHOLD: f64 = 0.7;

/// Entities decoded by [`decode_entities`]. Anything else passes through.
const ENTITIES: &[(&str, char)] = &[
    ("&nbsp;", ' '),
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&#039;", '\''),
    ("&apos;", '\''),
];

/// Normalize an HTML fragment into a bounded plain-text preview.
///
/// Tags are replaced by a space, a fixed set of entities is decoded,
/// whitespace runs collapse to one space, and the result is trimmed. Text
/// longer than `max_length` characters is cut (at the last space when that
/// space falls beyond 70% of the limit) and suffixed with `...`.
///
/// Never fails: input without visible text yields [`EMPTY_PREVIEW`].
pub fn normalize(html: &str, max_length: usize) -> String {
    let stripped = strip_tags(html);
    let decoded = decode_entities(&stripped);
    let text = collapse_whitespace(&decoded);

    if text.is_empty() {
        return EMPTY_PREVIEW.to_owned();
    }

    truncate_at_word(&text, max_length)
}

/// Replace every `<...>` run with a single space. A `<` with no closing `>`
/// is kept as text.
fn strip_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        result.push_str(&rest[..open]);
        result.push(' ');
        rest = &rest[open + close + 1..];
    }

    result.push_str(rest);
    result
}

/// Single-pass entity decoding, so `&amp;lt;` becomes `&lt;` and not `<`.
fn decode_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| candidate.starts_with(entity))
        {
            Some((entity, ch)) => {
                result.push(*ch);
                rest = &candidate[entity.len()..];
            }
            None => {
                result.push('&');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_at_word(text: &str, max_length: usize) -> String {
    let Some((end, _)) = text.char_indices().nth(max_length) else {
        return text.to_owned();
    };

    let truncated = &text[..end];
    let threshold = max_length as f64 * WORD_BREAK_THRESHOLD;

    let cut = match truncated.rfind(' ') {
        Some(space) if truncated[..space].chars().count() as f64 > threshold => {
            &truncated[..space]
        }
        _ => truncated,
    };

    format!("{cut}{ELLIPSIS}")
}
