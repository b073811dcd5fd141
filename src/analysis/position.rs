//! Syntactic classification of a cursor offset from raw text.
//!
//! Works on the text up to the offset only, with no tree walk, so it stays
//! cheap even when the cached parse is stale. The classification is
//! heuristic by design and carries two documented limitations:
//!
//! - a `#` inside a quoted string still marks the rest of the line as a
//!   comment (the line scan does not track quote state);
//! - style-block detection counts raw `{`/`}` after the last `style:` or
//!   `style.` and ignores braces inside quoted values.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static AFTER_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\w*$").unwrap());
static AFTER_COLON: Lazy<Regex> = Lazy::new(|| Regex::new(r":\s*$").unwrap());
static CONNECTION_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-<>]+\s*$").unwrap());
static CONNECTION_PARTIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-<>]+\s+\w*$").unwrap());
static SHAPE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+").unwrap());
static CURRENT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zA-Z0-9_\-\s]+)$").unwrap());
static PROPERTY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\s*:\s*(\w*)$").unwrap());
static CONTAINER_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\n:{};#]+):\s*$").unwrap());

/// Syntactic context at one cursor offset. Computed fresh per query.
#[derive(Debug, Clone, Default)]
pub struct PositionContext {
    pub in_string: bool,
    pub in_comment: bool,
    pub in_style: bool,
    pub after_dot: bool,
    pub after_colon: bool,
    pub in_connection: bool,
    pub in_shape: bool,
    /// Raw text of the current line up to the offset.
    pub line_prefix: String,
    /// Dot-joined path of the nearest enclosing container, if the
    /// brace-tracking scan can derive one.
    pub parent_shape: Option<String>,
}

impl PositionContext {
    /// Classify the context at `offset` (clamped to the text length).
    pub fn at(text: &str, offset: usize) -> Self {
        let offset = clamp_to_char_boundary(text, offset);
        let before = &text[..offset];
        let line_prefix = match before.rfind('\n') {
            Some(nl) => &before[nl + 1..],
            None => before,
        };
        let trimmed = line_prefix.trim();

        let in_string = is_in_string(before);
        let in_comment = line_prefix.contains('#');
        let after_dot = AFTER_DOT.is_match(line_prefix);
        let after_colon = AFTER_COLON.is_match(trimmed);
        let in_style = is_in_style_block(before);
        let in_connection =
            CONNECTION_TAIL.is_match(trimmed) || CONNECTION_PARTIAL.is_match(trimmed);
        let in_shape = !in_connection && !in_style && SHAPE_START.is_match(trimmed);
        let parent_shape = enclosing_container_path(before);

        let ctx = Self {
            in_string,
            in_comment,
            in_style,
            after_dot,
            after_colon,
            in_connection,
            in_shape,
            line_prefix: line_prefix.to_string(),
            parent_shape,
        };
        debug!(
            offset,
            in_string = ctx.in_string,
            in_comment = ctx.in_comment,
            in_style = ctx.in_style,
            after_dot = ctx.after_dot,
            after_colon = ctx.after_colon,
            in_connection = ctx.in_connection,
            "classified position"
        );
        ctx
    }

    /// Partially-typed word at the end of the line prefix. May contain
    /// embedded spaces (multi-word identifiers); trimmed.
    pub fn current_word(&self) -> String {
        CURRENT_WORD
            .captures(&self.line_prefix)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }

    /// Property name and partial value when the line prefix looks like
    /// `name: partial`.
    pub fn property_prefix(&self) -> Option<(String, String)> {
        PROPERTY_PREFIX.captures(&self.line_prefix).map(|c| {
            (
                c.get(1).map_or(String::new(), |m| m.as_str().to_string()),
                c.get(2).map_or(String::new(), |m| m.as_str().to_string()),
            )
        })
    }
}

fn clamp_to_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Quote-toggle scan from the start of the text; `\` escapes the next
/// character. Single and double quotes each only close themselves.
fn is_in_string(before: &str) -> bool {
    let mut in_string = false;
    let mut string_char = '"';
    let mut escaped = false;
    for ch in before.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if !in_string && (ch == '"' || ch == '\'') {
            in_string = true;
            string_char = ch;
        } else if in_string && ch == string_char {
            in_string = false;
        }
    }
    in_string
}

/// True when the brace depth is positive between the last `style:` or
/// `style.` marker and the offset.
fn is_in_style_block(before: &str) -> bool {
    let last_style = match (before.rfind("style:"), before.rfind("style.")) {
        (Some(a), Some(b)) => a.max(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return false,
    };
    let after_style = &before[last_style..];
    let opens = after_style.matches('{').count();
    let closes = after_style.matches('}').count();
    opens > closes
}

/// Brace-tracking scan for the enclosing container path. Pushes the
/// identifier preceding each unmatched `{`, pops on `}`. Quoted braces
/// desynchronize this scan, same as container parsing.
fn enclosing_container_path(before: &str) -> Option<String> {
    let mut stack: Vec<String> = Vec::new();
    let mut statement_start = 0usize;
    for (idx, ch) in before.char_indices() {
        match ch {
            '{' => {
                let head = before[statement_start..idx].trim_end();
                let name = CONTAINER_OPEN
                    .captures(head)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().trim().trim_matches(['"', '\'']).to_string());
                stack.push(name.unwrap_or_default());
                statement_start = idx + 1;
            }
            '}' => {
                stack.pop();
                statement_start = idx + 1;
            }
            '\n' | ';' => statement_start = idx + 1,
            _ => {}
        }
    }
    let path: Vec<String> = stack.into_iter().filter(|s| !s.is_empty()).collect();
    if path.is_empty() {
        None
    } else {
        Some(path.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn ctx_at_end(text: &str) -> PositionContext {
        PositionContext::at(text, text.len())
    }

    #[test]
    fn classifies_connection_tail() {
        let ctx = ctx_at_end("client -> ");
        assert!(ctx.in_connection);
        assert!(!ctx.in_shape);
    }

    #[test]
    fn classifies_connection_with_partial_target() {
        let ctx = ctx_at_end("client -> ser");
        assert!(ctx.in_connection);
        assert_eq!(ctx.current_word(), "ser");
    }

    #[test]
    fn classifies_after_colon_and_property() {
        let ctx = ctx_at_end("shape: ");
        assert!(ctx.after_colon);
        let ctx = ctx_at_end("shape: cyl");
        assert_eq!(
            ctx.property_prefix(),
            Some(("shape".to_string(), "cyl".to_string()))
        );
    }

    #[test]
    fn classifies_after_dot() {
        assert!(ctx_at_end("server.").after_dot);
        assert!(ctx_at_end("server.sty").after_dot);
        assert!(!ctx_at_end("server").after_dot);
    }

    #[test]
    fn classifies_style_block_by_brace_depth() {
        let open = indoc! {"
            server: {
              style: {
                fill: "};
        assert!(ctx_at_end(open).in_style);

        let closed = indoc! {"
            server: {
              style: {
                fill: blue
              }
              "};
        assert!(!ctx_at_end(closed).in_style);
    }

    #[test]
    fn string_scan_respects_escapes() {
        assert!(ctx_at_end(r#"server: "web "#).in_string);
        assert!(ctx_at_end(r#"server: "web \" still "#).in_string);
        assert!(!ctx_at_end(r#"server: "web" "#).in_string);
    }

    #[test]
    fn hash_marks_rest_of_line_as_comment() {
        assert!(ctx_at_end("# server").in_comment);
        // Known limitation: a '#' inside a string still reads as a comment.
        assert!(ctx_at_end(r##"label: "#1 service"##).in_comment);
        assert!(!ctx_at_end("# done\nserver").in_comment);
    }

    #[test]
    fn multi_word_current_word() {
        let ctx = ctx_at_end("database ser");
        assert_eq!(ctx.current_word(), "database ser");
    }

    #[test]
    fn enclosing_container_path_tracks_braces() {
        let text = indoc! {"
            outer: {
              inner: {
                "};
        let ctx = ctx_at_end(text);
        assert_eq!(ctx.parent_shape.as_deref(), Some("outer.inner"));

        let text = indoc! {"
            outer: {
              inner: {
              }
              "};
        let ctx = ctx_at_end(text);
        assert_eq!(ctx.parent_shape.as_deref(), Some("outer"));
    }

    #[test]
    fn offset_clamped_into_text() {
        let ctx = PositionContext::at("ab", 99);
        assert_eq!(ctx.line_prefix, "ab");
    }
}
