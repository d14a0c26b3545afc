//! Control frames
//!
//! Every open `if`, loop or `switch` of the current call pushes a
//! [`ControlFrame`]. Loops count their iterations against a ceiling, and
//! `break`/`continue` look up the nearest frame that accepts them.

use crate::parser::ast::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    If,
    For,
    While,
    DoWhile,
    Switch,
}

impl FrameKind {
    pub fn is_loop(self) -> bool {
        matches!(self, FrameKind::For | FrameKind::While | FrameKind::DoWhile)
    }

    /// `break` targets loops and `switch`
    pub fn accepts_break(self) -> bool {
        self.is_loop() || self == FrameKind::Switch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFrame {
    pub kind: FrameKind,
    pub location: SourceLocation,
    /// Last evaluated condition (`if`, loops)
    pub condition: bool,
    pub else_taken: bool,
    pub iterations: usize,
    pub ceiling: usize,
    /// `switch` found a matching `case` or `default`
    pub matched: bool,
}

impl ControlFrame {
    pub fn new(kind: FrameKind, location: SourceLocation) -> Self {
        ControlFrame {
            kind,
            location,
            condition: false,
            else_taken: false,
            iterations: 0,
            ceiling: usize::MAX,
            matched: false,
        }
    }

    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Count one more iteration; `false` once the ceiling is passed.
    pub fn record_iteration(&mut self) -> bool {
        self.iterations += 1;
        self.iterations <= self.ceiling
    }
}

#[derive(Debug, Clone, Default)]
pub struct ControlStack {
    frames: Vec<ControlFrame>,
}

impl ControlStack {
    pub fn new() -> Self {
        ControlStack { frames: Vec::new() }
    }

    pub fn push(&mut self, frame: ControlFrame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<ControlFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&ControlFrame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut ControlFrame> {
        self.frames.last_mut()
    }

    /// Innermost loop or `switch`
    pub fn nearest_breakable(&self) -> Option<&ControlFrame> {
        self.frames.iter().rev().find(|f| f.kind.accepts_break())
    }

    /// Innermost loop, skipping any `switch` in between
    pub fn nearest_loop(&self) -> Option<&ControlFrame> {
        self.frames.iter().rev().find(|f| f.kind.is_loop())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlFrame> {
        self.frames.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_targets() {
        let loc = SourceLocation::new(1, 1);
        let mut stack = ControlStack::new();
        assert!(stack.nearest_breakable().is_none());

        stack.push(ControlFrame::new(FrameKind::While, loc));
        stack.push(ControlFrame::new(FrameKind::Switch, loc));
        stack.push(ControlFrame::new(FrameKind::If, loc));

        assert_eq!(stack.nearest_breakable().map(|f| f.kind), Some(FrameKind::Switch));
        assert_eq!(stack.nearest_loop().map(|f| f.kind), Some(FrameKind::While));
    }

    #[test]
    fn test_iteration_ceiling() {
        let mut frame = ControlFrame::new(FrameKind::For, SourceLocation::default()).with_ceiling(2);
        assert!(frame.record_iteration());
        assert!(frame.record_iteration());
        assert!(!frame.record_iteration());
        assert_eq!(frame.iterations, 3);
    }
}
