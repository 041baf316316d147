//! Pending documentation comments and their normalization.

/// Comments waiting to be claimed by the next declaration.
#[derive(Debug, Default)]
pub(super) struct CommentBuffer {
    pending: Vec<String>,
}

impl CommentBuffer {
    pub(super) fn push(&mut self, comment: String) {
        self.pending.push(comment);
    }

    /// The most recently pushed comment, if any. Older comments are
    /// dropped.
    pub(super) fn claim(&mut self) -> Option<String> {
        let latest = self.pending.pop();
        self.pending.clear();
        latest
    }

    /// Drop every pending comment.
    pub(super) fn clear(&mut self) {
        self.pending.clear();
    }

    pub(super) fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Turn a raw comment into plain text.
///
/// Line comments lose their `//`. Block and doc comments lose their markers
/// and `*` gutters; their lines are joined into paragraphs separated by a
/// blank line, with `<p>` tags starting a new paragraph. With `width` set,
/// each paragraph is wrapped at that many characters.
pub fn normalize_comment(raw: &str, width: Option<usize>) -> String {
    let raw = raw.trim();
    let paragraphs = if let Some(body) = raw.strip_prefix("//") {
        vec![body.trim_start_matches('/').trim().to_owned()]
    } else {
        let body = raw
            .strip_prefix("/**")
            .or_else(|| raw.strip_prefix("/*"))
            .unwrap_or(raw);
        let body = body.strip_suffix("*/").unwrap_or(body);
        paragraphs(body)
    };

    paragraphs
        .iter()
        .map(|p| match width {
            Some(w) if w > 0 => wrap(p, w),
            _ => p.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn paragraphs(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for line in body.lines() {
        let line = line.trim_start();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.is_empty() {
            flush(&mut current, &mut out);
            continue;
        }
        let line = line
            .replace("</p>", "<p>")
            .replace("<P>", "<p>")
            .replace("</P>", "<p>");
        for (i, piece) in line.split("<p>").enumerate() {
            if i > 0 {
                flush(&mut current, &mut out);
            }
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(piece);
        }
    }
    flush(&mut current, &mut out);
    out
}

fn flush(current: &mut String, out: &mut Vec<String>) {
    if !current.is_empty() {
        out.push(std::mem::take(current));
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
fn wrap(paragraph: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in paragraph.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_comment_loses_marker() {
        assert_eq!(normalize_comment("//   hello there  ", None), "hello there");
        assert_eq!(normalize_comment("/// triple", None), "triple");
    }

    #[test]
    fn doc_comment_becomes_paragraphs() {
        let raw = "/**\n * Computes the area\n * of a shape.\n *\n * Never negative.\n */";
        assert_eq!(
            normalize_comment(raw, None),
            "Computes the area of a shape.\n\nNever negative."
        );
    }

    #[test]
    fn paragraph_tags_split_paragraphs() {
        let raw = "/** First part.<p>Second part. */";
        assert_eq!(normalize_comment(raw, None), "First part.\n\nSecond part.");
    }

    #[test]
    fn single_line_block_comment() {
        assert_eq!(normalize_comment("/* note */", None), "note");
    }

    #[test]
    fn width_wraps_each_paragraph() {
        let raw = "/** one two three four\n *\n * five six */";
        assert_eq!(
            normalize_comment(raw, Some(9)),
            "one two\nthree\nfour\n\nfive six"
        );
    }

    #[test]
    fn claim_takes_most_recent_and_drops_the_rest() {
        let mut buf = CommentBuffer::default();
        buf.push("a".into());
        buf.push("b".into());
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.claim().as_deref(), Some("b"));
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.claim(), None);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut buf = CommentBuffer::default();
        buf.push("a".into());
        buf.clear();
        assert_eq!(buf.claim(), None);
    }
}
