//! `scanf` input emulation
//!
//! The user supplies all input up front as one string. It is split on commas
//! and whitespace into an [`InputQueue`] shared by every `scanf` of the run;
//! each conversion takes the next token.

use crate::memory::value::Value;
use std::collections::VecDeque;

/// Tokens not yet consumed by `scanf`
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    tokens: VecDeque<String>,
    consumed: usize,
}

impl InputQueue {
    pub fn new(input: &str) -> Self {
        let tokens = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        InputQueue {
            tokens,
            consumed: 0,
        }
    }

    pub fn next_token(&mut self) -> Option<String> {
        let token = self.tokens.pop_front()?;
        self.consumed += 1;
        Some(token)
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len()
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// What a `scanf` conversion stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Int,
    Float,
    Char,
    Str,
}

impl ScanKind {
    /// Value stored when the input has run out
    pub fn default_value(self) -> Value {
        match self {
            ScanKind::Int => Value::Int(0),
            ScanKind::Float => Value::Float(0.0),
            ScanKind::Char => Value::Char(0),
            ScanKind::Str => Value::Str(String::new()),
        }
    }

    /// Text echoed for a conversion with no token left
    pub fn placeholder(self) -> &'static str {
        match self {
            ScanKind::Str | ScanKind::Char => "",
            _ => "0",
        }
    }
}

/// One conversion of a `scanf` format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSpec {
    pub kind: ScanKind,
    /// `%*d`: read and discard
    pub suppress: bool,
}

/// Conversions of a raw `scanf` format string, in order.
pub fn scan_specs(format: &str) -> Vec<ScanSpec> {
    let mut specs = Vec::new();
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '%' => {
                if chars.peek() == Some(&'%') {
                    chars.next();
                    continue;
                }
                let mut suppress = false;
                while let Some(&c) = chars.peek() {
                    match c {
                        '*' => suppress = true,
                        c if c.is_ascii_digit() => {}
                        'h' | 'l' | 'L' | 'z' | 'j' | 't' => {}
                        _ => break,
                    }
                    chars.next();
                }
                let kind = match chars.next() {
                    Some('d' | 'i' | 'u' | 'x' | 'X' | 'o') => ScanKind::Int,
                    Some('f' | 'F' | 'e' | 'E' | 'g' | 'G') => ScanKind::Float,
                    Some('c') => ScanKind::Char,
                    Some('s') => ScanKind::Str,
                    _ => continue,
                };
                specs.push(ScanSpec { kind, suppress });
            }
            _ => {}
        }
    }

    specs
}

/// Convert one input token. Numbers accept a valid prefix (`"12abc"` reads
/// 12); a token with no number at its start is an error.
pub fn parse_token(kind: ScanKind, token: &str) -> Result<Value, String> {
    match kind {
        ScanKind::Int => integer_prefix(token)
            .map(Value::Int)
            .ok_or_else(|| format!("无法将 '{}' 解析为整数", token)),
        ScanKind::Float => float_prefix(token)
            .map(Value::Float)
            .ok_or_else(|| format!("无法将 '{}' 解析为浮点数", token)),
        ScanKind::Char => Ok(Value::Char(token.bytes().next().unwrap_or(0))),
        ScanKind::Str => Ok(Value::Str(token.to_string())),
    }
}

fn integer_prefix(token: &str) -> Option<i64> {
    let end = token
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    let n: i128 = token[..end].parse().ok()?;
    Some(n.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}

fn float_prefix(token: &str) -> Option<f64> {
    // Longest prefix that parses, so "3.5kg" reads 3.5
    let mut best = None;
    for (i, c) in token.char_indices() {
        let end = i + c.len_utf8();
        if !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')) {
            break;
        }
        if let Ok(x) = token[..end].parse::<f64>() {
            best = Some(x);
        }
    }
    best
}
