//! Captured program output
//!
//! Everything a run writes ends up in one [`Console`]: `printf` text, the
//! `[输入]: ...` echo of each `scanf`, and inline diagnostic notes. Output is
//! kept in chunks tagged with their origin so the UI can color them, while
//! [`Console::text`] gives the exact byte stream a terminal would have shown.

/// Where a chunk of output came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Program,
    InputEcho,
    Note,
}

/// A run of output from one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub text: String,
    pub line: usize,
    pub kind: OutputKind,
}

#[derive(Debug, Clone, Default)]
pub struct Console {
    pub chunks: Vec<OutputChunk>,
}

impl Console {
    pub fn new() -> Self {
        Console { chunks: Vec::new() }
    }

    /// Print without newline; joins the previous chunk when it has the same
    /// origin.
    pub fn print(&mut self, text: &str, line: usize, kind: OutputKind) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.chunks.last_mut() {
            if last.line == line && last.kind == kind {
                last.text.push_str(text);
                return;
            }
        }
        self.chunks.push(OutputChunk {
            text: text.to_string(),
            line,
            kind,
        });
    }

    /// Write `message` on a line of its own.
    pub fn note(&mut self, message: &str, line: usize) {
        let mut text = String::new();
        if !self.is_empty() && !self.ends_with_newline() {
            text.push('\n');
        }
        text.push_str(message);
        text.push('\n');
        self.print(&text, line, OutputKind::Note);
    }

    pub fn ends_with_newline(&self) -> bool {
        self.chunks.last().is_some_and(|c| c.text.ends_with('\n'))
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Full output as a single string
    pub fn text(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }

    /// Output split into display lines, each tagged with its dominant kind
    pub fn lines(&self) -> Vec<(String, OutputKind)> {
        let mut lines: Vec<(String, OutputKind)> = vec![(String::new(), OutputKind::Program)];
        for chunk in &self.chunks {
            let mut parts = chunk.text.split('\n').peekable();
            while let Some(part) = parts.next() {
                if let Some(current) = lines.last_mut() {
                    if current.0.is_empty() {
                        current.1 = chunk.kind;
                    }
                    current.0.push_str(part);
                }
                if parts.peek().is_some() {
                    lines.push((String::new(), OutputKind::Program));
                }
            }
        }
        if lines.last().is_some_and(|(text, _)| text.is_empty()) {
            lines.pop();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_line_prints_merge() {
        let mut console = Console::new();
        console.print("a", 3, OutputKind::Program);
        console.print("b\n", 3, OutputKind::Program);
        console.print("c", 4, OutputKind::Program);
        assert_eq!(console.chunks.len(), 2);
        assert_eq!(console.text(), "ab\nc");
    }

    #[test]
    fn test_note_starts_on_fresh_line() {
        let mut console = Console::new();
        console.print("partial", 1, OutputKind::Program);
        console.note("警告: x", 2);
        console.note("警告: y", 3);
        assert_eq!(console.text(), "partial\n警告: x\n警告: y\n");
    }

    #[test]
    fn test_lines_carry_kind() {
        let mut console = Console::new();
        console.print("hi\n", 1, OutputKind::Program);
        console.note("错误: boom", 2);
        let lines = console.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], ("错误: boom".to_string(), OutputKind::Note));
    }
}
