/// An inline element of markdown text.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Code(String),
    Link { text: Vec<Inline>, url: String },
}

/// Parse inline markup: `**bold**`, `*italic*` / `_italic_`, `` `code` ``
/// and `[text](url)`. Unclosed markers are kept as literal text.
pub fn parse(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some((inline, consumed)) = match_token(rest) {
            if !plain.is_empty() {
                out.push(Inline::Text(std::mem::take(&mut plain)));
            }
            out.push(inline);
            rest = &rest[consumed..];
        } else {
            let ch = rest.chars().next().unwrap();
            plain.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    if !plain.is_empty() {
        out.push(Inline::Text(plain));
    }
    out
}

/// Try to match one inline token at the start of `rest`. Returns the parsed
/// element and the number of bytes it spans.
fn match_token(rest: &str) -> Option<(Inline, usize)> {
    if let Some(inner) = rest.strip_prefix("**") {
        if let Some(end) = inner.find("**") {
            if end > 0 {
                return Some((Inline::Bold(parse(&inner[..end])), end + 4));
            }
        }
    }

    for marker in ['*', '_'] {
        if let Some(inner) = rest.strip_prefix(marker) {
            if let Some(end) = inner.find(marker) {
                if end > 0 {
                    return Some((Inline::Italic(parse(&inner[..end])), end + 2));
                }
            }
        }
    }

    if let Some(inner) = rest.strip_prefix('`') {
        if let Some(end) = inner.find('`') {
            return Some((Inline::Code(inner[..end].to_string()), end + 2));
        }
    }

    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(text_end) = inner.find("](") {
            let after = &inner[text_end + 2..];
            if let Some(url_end) = after.find(')') {
                return Some((
                    Inline::Link {
                        text: parse(&inner[..text_end]),
                        url: after[..url_end].to_string(),
                    },
                    text_end + url_end + 4,
                ));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(parse("hello"), vec![Inline::Text("hello".to_string())]);
    }

    #[test]
    fn test_bold() {
        assert_eq!(
            parse("a **b** c"),
            vec![
                Inline::Text("a ".to_string()),
                Inline::Bold(vec![Inline::Text("b".to_string())]),
                Inline::Text(" c".to_string()),
            ]
        );
    }

    #[test]
    fn test_italic_both_markers() {
        assert_eq!(
            parse("*a*"),
            vec![Inline::Italic(vec![Inline::Text("a".to_string())])]
        );
        assert_eq!(
            parse("_a_"),
            vec![Inline::Italic(vec![Inline::Text("a".to_string())])]
        );
    }

    #[test]
    fn test_bold_wins_over_italic() {
        assert_eq!(
            parse("**ab**"),
            vec![Inline::Bold(vec![Inline::Text("ab".to_string())])]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        assert_eq!(
            parse("**a *b* c**"),
            vec![Inline::Bold(vec![
                Inline::Text("a ".to_string()),
                Inline::Italic(vec![Inline::Text("b".to_string())]),
                Inline::Text(" c".to_string()),
            ])]
        );
    }

    #[test]
    fn test_code_span_is_verbatim() {
        assert_eq!(
            parse("`**not bold**`"),
            vec![Inline::Code("**not bold**".to_string())]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse("see [docs](https://example.com)!"),
            vec![
                Inline::Text("see ".to_string()),
                Inline::Link {
                    text: vec![Inline::Text("docs".to_string())],
                    url: "https://example.com".to_string(),
                },
                Inline::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_unclosed_markers_stay_literal() {
        assert_eq!(parse("a * b"), vec![Inline::Text("a * b".to_string())]);
        assert_eq!(
            parse("[no url]"),
            vec![Inline::Text("[no url]".to_string())]
        );
    }

}
