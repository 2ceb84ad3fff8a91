use serde::{Deserialize, Serialize};

/// Half-open byte span `[start, end)` into a text snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span of `len` bytes starting at `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self { start, end: start + len }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Clamp a host-supplied offset into `text`, rounding down to a char boundary.
pub fn clamp_offset(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Text from the start of the line containing `offset` up to `offset`.
pub fn line_prefix(text: &str, offset: usize) -> &str {
    let offset = clamp_offset(text, offset);
    let line_start = text[..offset].rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    &text[line_start..offset]
}

/// Span of the identifier touching `offset`, if any.
pub fn word_at(text: &str, offset: usize) -> Option<TextRange> {
    let offset = clamp_offset(text, offset);

    let start = text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(offset);

    let end = text[offset..]
        .char_indices()
        .find(|(_, c)| !is_identifier_char(*c))
        .map(|(idx, _)| offset + idx)
        .unwrap_or(text.len());

    (start < end).then(|| TextRange::new(start, end))
}

/// Maps byte offsets to zero-indexed line numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let newlines = text
            .bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(idx, _)| idx)
            .collect();
        Self { newlines }
    }

    /// Number of newline characters strictly before `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&newline| newline < offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_offset() {
        assert_eq!(clamp_offset("abc", 10), 3);
        assert_eq!(clamp_offset("abc", 1), 1);
        // 'é' is two bytes wide
        assert_eq!(clamp_offset("é", 1), 0);
    }

    #[test]
    fn test_line_prefix() {
        let text = "start {\n    say(";
        assert_eq!(line_prefix(text, text.len()), "    say(");
        assert_eq!(line_prefix(text, 5), "start");
        assert_eq!(line_prefix("", 0), "");
    }

    #[test]
    fn test_word_at() {
        let text = "say(Alice, \"hi\");";
        assert_eq!(word_at(text, 6).map(|r| r.slice(text)), Some("Alice"));
        assert_eq!(word_at(text, 4).map(|r| r.slice(text)), Some("Alice"));
        assert_eq!(word_at(text, 9).map(|r| r.slice(text)), Some("Alice"));
        assert_eq!(word_at(text, 10), None);
        assert_eq!(word_at("", 0), None);
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("a\nb\n\nc");
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(1), 0);
        assert_eq!(index.line_of(2), 1);
        assert_eq!(index.line_of(4), 2);
        assert_eq!(index.line_of(5), 3);
    }
}
