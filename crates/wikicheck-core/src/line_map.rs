/// Maps byte offsets in a text to 1-based line/column positions.
///
/// Lines are split on `\n`; columns count characters, not bytes.
pub struct LineMap<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineMap<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(next_line_idx) => next_line_idx,
        }
    }

    /// 1-based `(line, column)` of the character starting at `offset`.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let line_start = self.line_starts[line - 1];
        let col = self.text[line_start..offset].chars().count();
        (line, col + 1)
    }

    /// Text of a 1-based line, without its trailing newline.
    pub fn line_text(&self, line: usize) -> &'a str {
        let Some(&start) = self.line_starts.get(line.wrapping_sub(1)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        &self.text[start..end]
    }

    /// A line whose first four characters are all spaces or tabs is preformatted
    /// (an indented code line) and carries no links.
    pub fn is_preformatted(&self, line: usize) -> bool {
        let mut chars = self.line_text(line).chars();
        (0..4).all(|_| matches!(chars.next(), Some(' ') | Some('\t')))
    }
}
