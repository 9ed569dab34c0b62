//! Locating tracker code blocks inside a Markdown document.
//!
//! Scanning is line-based. Fences of other languages are skipped as a whole,
//! so a tracker block quoted inside another code block is not picked up.

/// Info string that marks a fenced code block as a tracker.
pub const TRACKER_LANGUAGE: &str = "simple-time-tracker";

/// Position of a tracker block, in zero-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerBlock {
    /// Line holding the opening fence.
    pub open_line: usize,
    /// Line holding the closing fence, or the line count if the block is
    /// never closed.
    pub close_line: usize,
    /// The opening fence marker, e.g. "```".
    pub fence: String,
    /// Text between the fences.
    pub body: String,
}

impl TrackerBlock {
    pub const fn is_closed(&self, line_count: usize) -> bool {
        self.close_line < line_count
    }
}

/// Splits a fence line into its marker and info string.
fn parse_fence(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    let marker_char = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let marker_len = trimmed.chars().take_while(|c| *c == marker_char).count();
    if marker_len < 3 {
        return None;
    }
    // Fence characters are ASCII, so char count equals byte length
    let (marker, info) = trimmed.split_at(marker_len);
    Some((marker, info.trim()))
}

fn closes(line: &str, fence: &str) -> bool {
    let trimmed = line.trim();
    let Some(first) = fence.chars().next() else {
        return false;
    };
    trimmed.len() >= fence.len() && trimmed.chars().all(|c| c == first)
}

/// Finds every tracker block in document order.
pub fn find_blocks(text: &str) -> Vec<TrackerBlock> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let Some((fence, info)) = parse_fence(lines[index]) else {
            index += 1;
            continue;
        };
        let is_tracker = info.split_whitespace().next() == Some(TRACKER_LANGUAGE);

        let close_line = (index + 1..lines.len())
            .find(|&line| closes(lines[line], fence))
            .unwrap_or(lines.len());

        if is_tracker {
            blocks.push(TrackerBlock {
                open_line: index,
                close_line,
                fence: fence.to_string(),
                body: lines[index + 1..close_line].join("\n"),
            });
        }
        index = close_line + 1;
    }

    blocks
}

/// Replaces the body of `block` with `body`, leaving every other line of
/// `text` untouched.
///
/// An unclosed block gains a closing fence.
pub fn replace_block(text: &str, block: &TrackerBlock, body: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let open = block.open_line.min(lines.len().saturating_sub(1));

    let mut output = lines[..=open].join("\n");
    output.push('\n');
    output.push_str(body);
    output.push('\n');
    if block.is_closed(lines.len()) {
        output.push_str(&lines[block.close_line..].join("\n"));
    } else {
        output.push_str(&block.fence);
    }
    output
}

/// Appends a new tracker block holding `body` to the end of `text`.
pub fn append_block(text: &str, body: &str) -> String {
    let mut output = text.to_string();
    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }
    if !output.is_empty() {
        output.push('\n');
    }
    output.push_str("```");
    output.push_str(TRACKER_LANGUAGE);
    output.push('\n');
    output.push_str(body);
    output.push_str("\n```\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Notes\n\nSome text.\n\n```simple-time-tracker\n{\"entries\":[]}\n```\n\nAfter.\n";

    #[test]
    fn finds_tracker_block() {
        let blocks = find_blocks(DOC);
        assert_eq!(
            blocks,
            vec![TrackerBlock {
                open_line: 4,
                close_line: 6,
                fence: "```".to_string(),
                body: "{\"entries\":[]}".to_string(),
            }]
        );
    }

    #[test]
    fn skips_other_code_blocks() {
        let doc = "````markdown\n```simple-time-tracker\n{}\n```\n````\n\n~~~ simple-time-tracker\n{\"entries\":[]}\n~~~\n";
        let blocks = find_blocks(doc);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].open_line, 6);
        assert_eq!(blocks[0].fence, "~~~");
    }

    #[test]
    fn finds_multiple_blocks_in_order() {
        let doc = "```simple-time-tracker\na\n```\ntext\n```simple-time-tracker\nb\n```";
        let bodies: Vec<String> = find_blocks(doc).into_iter().map(|b| b.body).collect();
        assert_eq!(bodies, vec!["a", "b"]);
    }

    #[test]
    fn multi_line_body() {
        let doc = "```simple-time-tracker\n{\n  \"entries\": []\n}\n```\n";
        assert_eq!(find_blocks(doc)[0].body, "{\n  \"entries\": []\n}");
    }

    #[test]
    fn replace_block_leaves_surroundings_identical() {
        let block = &find_blocks(DOC)[0];
        let replaced = replace_block(DOC, block, "{\"entries\":[{\"name\":\"A\"}]}");
        assert_eq!(
            replaced,
            "# Notes\n\nSome text.\n\n```simple-time-tracker\n{\"entries\":[{\"name\":\"A\"}]}\n```\n\nAfter.\n"
        );
    }

    #[test]
    fn replace_block_collapses_multi_line_body() {
        let doc = "before\n```simple-time-tracker\n{\n}\n```\nafter";
        let block = &find_blocks(doc)[0];
        assert_eq!(
            replace_block(doc, block, "{}"),
            "before\n```simple-time-tracker\n{}\n```\nafter"
        );
    }

    #[test]
    fn replace_unclosed_block_adds_fence() {
        let doc = "intro\n```simple-time-tracker\n{}";
        let block = &find_blocks(doc)[0];
        assert_eq!(block.close_line, 3);
        assert_eq!(
            replace_block(doc, block, "{\"entries\":[]}"),
            "intro\n```simple-time-tracker\n{\"entries\":[]}\n```"
        );
    }

    #[test]
    fn preserves_crlf_outside_block() {
        let doc = "a\r\n```simple-time-tracker\r\n{}\r\n```\r\nb\r\n";
        let block = &find_blocks(doc)[0];
        let replaced = replace_block(doc, block, "{\"entries\":[]}");
        assert!(replaced.starts_with("a\r\n```simple-time-tracker\r\n"));
        assert!(replaced.ends_with("```\r\nb\r\n"));
    }

    #[test]
    fn append_block_to_existing_text() {
        assert_eq!(
            append_block("# Day", "{\"entries\":[]}"),
            "# Day\n\n```simple-time-tracker\n{\"entries\":[]}\n```\n"
        );
        assert_eq!(
            append_block("", "{}"),
            "```simple-time-tracker\n{}\n```\n"
        );
    }
}
