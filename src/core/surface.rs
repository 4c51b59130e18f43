//! Line-oriented output surface.
//!
//! The console only ever appends: it writes at the end of the open row,
//! closes rows, and erases within the open row. Closed rows are never touched
//! again except by [`Surface::clear`].

use std::collections::VecDeque;

/// What produced a row. Hosts map tones to colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Banner,
    Input,
    Output,
    Help,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub tone: Tone,
    pub text: String,
}

pub trait Surface {
    /// Write text at the cursor on the open row.
    fn write(&mut self, text: &str);

    /// Close the open row.
    fn newline(&mut self);

    /// Write a whole row and close it.
    fn write_line(&mut self, tone: Tone, text: &str);

    /// Erase the character before the cursor: back, blank, back.
    fn erase_char(&mut self);

    /// Return to the start of the open row and clear it.
    fn erase_row(&mut self);

    /// Drop every row, open or closed.
    fn clear(&mut self);
}

/// In-memory surface with a bounded number of closed rows.
#[derive(Debug, Clone)]
pub struct Scrollback {
    rows: VecDeque<Row>,
    open: String,
    limit: usize,
    revision: u64,
}

impl Scrollback {
    pub fn new(limit: usize) -> Self {
        Self {
            rows: VecDeque::new(),
            open: String::new(),
            limit: limit.max(1),
            revision: 0,
        }
    }

    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &Row> + ExactSizeIterator {
        self.rows.iter()
    }

    pub fn open_row(&self) -> &str {
        &self.open
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn close(&mut self, tone: Tone) {
        let text = std::mem::take(&mut self.open);
        if self.rows.len() >= self.limit {
            self.rows.pop_front();
        }
        self.rows.push_back(Row { tone, text });
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SCROLLBACK)
    }
}

impl Surface for Scrollback {
    fn write(&mut self, text: &str) {
        self.open.push_str(text);
        self.revision += 1;
    }

    fn newline(&mut self) {
        self.close(Tone::Input);
        self.revision += 1;
    }

    fn write_line(&mut self, tone: Tone, text: &str) {
        // A terminal would break embedded newlines into rows too.
        let text = text.trim_end_matches(['\r', '\n']);
        for piece in text.split('\n') {
            self.open.push_str(piece.trim_end_matches('\r'));
            self.close(tone);
        }
        self.revision += 1;
    }

    fn erase_char(&mut self) {
        if self.open.pop().is_some() {
            self.revision += 1;
        }
    }

    fn erase_row(&mut self) {
        self.open.clear();
        self.revision += 1;
    }

    fn clear(&mut self) {
        self.rows.clear();
        self.open.clear();
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(s: &Scrollback) -> Vec<&str> {
        s.rows().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn rows_close_in_emission_order() {
        let mut s = Scrollback::new(16);
        s.write("> ");
        s.write("GET a");
        s.newline();
        s.write_line(Tone::Output, "1");
        s.write_line(Tone::Error, "Error: boom");

        assert_eq!(texts(&s), vec!["> GET a", "1", "Error: boom"]);
        assert_eq!(s.rows().nth(0).map(|r| r.tone), Some(Tone::Input));
        assert_eq!(s.rows().nth(2).map(|r| r.tone), Some(Tone::Error));
        assert_eq!(s.open_row(), "");
    }

    #[test]
    fn limit_drops_oldest_rows() {
        let mut s = Scrollback::new(2);
        for line in ["a", "b", "c"] {
            s.write_line(Tone::Output, line);
        }
        assert_eq!(texts(&s), vec!["b", "c"]);
    }

    #[test]
    fn embedded_line_breaks_split_rows() {
        let mut s = Scrollback::new(8);
        s.write_line(Tone::Output, "+OK\r\n");
        s.write_line(Tone::Output, "one\r\ntwo");
        assert_eq!(texts(&s), vec!["+OK", "one", "two"]);
    }

    #[test]
    fn erase_char_on_empty_row_is_silent() {
        let mut s = Scrollback::new(8);
        let before = s.revision();
        s.erase_char();
        assert_eq!(s.revision(), before);

        s.write("ab");
        s.erase_char();
        assert_eq!(s.open_row(), "a");
    }

    #[test]
    fn clear_drops_everything() {
        let mut s = Scrollback::new(8);
        s.write_line(Tone::Output, "x");
        s.write("partial");
        s.clear();
        assert_eq!(s.rows().len(), 0);
        assert_eq!(s.open_row(), "");
    }
}
