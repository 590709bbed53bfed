pub mod inline;

pub use inline::Inline;

/// A block-level element of a content slide's markdown body.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph { inlines: Vec<Inline> },
    List { ordered: bool, items: Vec<Vec<Inline>> },
    CodeBlock { language: Option<String>, code: String },
}

/// Parse a markdown body into blocks: ATX headings, unordered and ordered
/// lists, fenced code blocks, and paragraphs. Consecutive non-blank prose
/// lines merge into one paragraph.
pub fn parse(body: &str) -> Vec<Block> {
    let lines: Vec<&str> = body.lines().collect();
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let trimmed = lines[i].trim();

        if trimmed.starts_with("```") {
            flush_paragraph(&mut blocks, &mut paragraph);
            let language = trimmed.trim_start_matches('`').trim();
            let language = (!language.is_empty()).then(|| language.to_string());
            let mut code: Vec<&str> = Vec::new();
            i += 1;
            while i < lines.len() && !lines[i].trim().starts_with("```") {
                code.push(lines[i]);
                i += 1;
            }
            // Skip the closing fence when present
            i += 1;
            blocks.push(Block::CodeBlock {
                language,
                code: code.join("\n"),
            });
            continue;
        }

        if let Some((level, rest)) = heading_marker(trimmed) {
            flush_paragraph(&mut blocks, &mut paragraph);
            blocks.push(Block::Heading {
                level,
                inlines: inline::parse(rest),
            });
            i += 1;
            continue;
        }

        if list_item(trimmed).is_some() {
            flush_paragraph(&mut blocks, &mut paragraph);
            let mut items: Vec<Vec<Inline>> = Vec::new();
            let mut ordered = false;
            while i < lines.len() {
                match list_item(lines[i].trim()) {
                    Some((is_ordered, text)) => {
                        if items.is_empty() {
                            ordered = is_ordered;
                        } else if is_ordered != ordered {
                            break;
                        }
                        items.push(inline::parse(text));
                        i += 1;
                    }
                    None => break,
                }
            }
            blocks.push(Block::List { ordered, items });
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut blocks, &mut paragraph);
        } else {
            paragraph.push(trimmed);
        }
        i += 1;
    }

    flush_paragraph(&mut blocks, &mut paragraph);
    blocks
}

fn flush_paragraph(blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    let text = paragraph.join(" ");
    paragraph.clear();
    blocks.push(Block::Paragraph {
        inlines: inline::parse(&text),
    });
}

/// `### Heading` → `(3, "Heading")`. Up to six levels; the marker must be
/// followed by a space or end the line.
fn heading_marker(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if rest.is_empty() {
        Some((level as u8, ""))
    } else {
        rest.strip_prefix(' ').map(|r| (level as u8, r.trim()))
    }
}

/// Returns `(ordered, item_text)` when the line is a list item.
fn list_item(line: &str) -> Option<(bool, &str)> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some((false, rest.trim()));
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some((true, rest.trim()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        let blocks = parse("# Top\n\n### Deep");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                inlines: vec![Inline::Text("Top".to_string())]
            }
        );
        assert!(matches!(blocks[1], Block::Heading { level: 3, .. }));
    }

    #[test]
    fn test_hash_without_space_is_not_heading() {
        let blocks = parse("#hashtag");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_paragraph_lines_merge() {
        let blocks = parse("first line\nsecond line\n\nnew paragraph");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Paragraph {
                inlines: vec![Inline::Text("first line second line".to_string())]
            }
        );
    }

    #[test]
    fn test_unordered_list() {
        let blocks = parse("- one\n- two\n* three");
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            Block::List { ordered, items } => {
                assert!(!ordered);
                assert_eq!(items.len(), 3);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_ordered_list() {
        let blocks = parse("1. first\n2. second\n10. tenth");
        match &blocks[0] {
            Block::List { ordered, items } => {
                assert!(ordered);
                assert_eq!(items.len(), 3);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_markers_split_lists() {
        let blocks = parse("- bullet\n1. number");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::List { ordered: false, .. }));
        assert!(matches!(blocks[1], Block::List { ordered: true, .. }));
    }

    #[test]
    fn test_code_fence() {
        let blocks = parse("```rust\nfn main() {}\n```\nafter");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::CodeBlock {
                language: Some("rust".to_string()),
                code: "fn main() {}".to_string()
            }
        );
    }

    #[test]
    fn test_unterminated_code_fence_runs_to_end() {
        let blocks = parse("```\ncode here");
        assert_eq!(
            blocks[0],
            Block::CodeBlock {
                language: None,
                code: "code here".to_string()
            }
        );
    }

    #[test]
    fn test_list_markers_inside_code_fence_are_code() {
        let blocks = parse("```\n- not a list\n```");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::CodeBlock { .. }));
    }

    #[test]
    fn test_heading_then_list() {
        let blocks = parse("## Agenda\n- a\n- b");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Heading { level: 2, .. }));
        assert!(matches!(blocks[1], Block::List { .. }));
    }
}
