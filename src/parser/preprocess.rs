//! Syntax pre-check and comment blanking
//!
//! A single forward scan over the raw source that:
//! - blanks out comments while keeping every newline, so later stages report
//!   the student's own line numbers;
//! - tracks brace depth and string/char/comment state;
//! - records each function definition's name and line (a `;` inside a string
//!   literal or a `for (...)` header does not end a header);
//! - collects [`SyntaxIssue`]s. Brace mismatches, unterminated literals and a
//!   missing `main` are fatal; a suspected missing semicolon is advisory.

use thiserror::Error;

/// Problems found by the pre-check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxIssue {
    #[error("缺少int main()函数声明")]
    MissingMain,

    #[error("大括号不匹配: 有{open}个开括号和{close}个闭括号")]
    UnbalancedBraces { open: usize, close: usize },

    #[error("第{line}行出现多余的 '}}'")]
    UnexpectedCloseBrace { line: usize },

    #[error("第{line}行的注释没有结束")]
    UnterminatedComment { line: usize },

    #[error("第{line}行的字符串或字符常量没有结束")]
    UnterminatedLiteral { line: usize },

    #[error("第{line}行可能缺少分号")]
    MissingSemicolon { line: usize },
}

impl SyntaxIssue {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SyntaxIssue::MissingSemicolon { .. })
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            SyntaxIssue::MissingMain | SyntaxIssue::UnbalancedBraces { .. } => None,
            SyntaxIssue::UnexpectedCloseBrace { line }
            | SyntaxIssue::UnterminatedComment { line }
            | SyntaxIssue::UnterminatedLiteral { line }
            | SyntaxIssue::MissingSemicolon { line } => Some(*line),
        }
    }
}

/// A function definition seen at file scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader {
    pub name: String,
    pub line: usize,
}

/// Output of [`preprocess`]
#[derive(Debug, Clone, Default)]
pub struct Preprocessed {
    /// Source with comments blanked; line structure unchanged
    pub cleaned: String,
    /// Function definitions in source order
    pub functions: Vec<FunctionHeader>,
    pub issues: Vec<SyntaxIssue>,
}

impl Preprocessed {
    pub fn has_fatal(&self) -> bool {
        self.issues.iter().any(SyntaxIssue::is_fatal)
    }

    pub fn function(&self, name: &str) -> Option<&FunctionHeader> {
        self.functions.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Code,
    Directive,
    LineComment,
    BlockComment { start_line: usize },
    Str { start_line: usize },
    CharLit { start_line: usize },
}

/// Code of the current line with whitespace removed
#[derive(Default)]
struct LineCode {
    code: String,
    is_directive: bool,
}

struct Scanner {
    out: Preprocessed,
    state: ScanState,
    line: usize,
    depth: usize,
    paren_depth: usize,
    open_braces: usize,
    close_braces: usize,
    /// Text since the last `;`, `{` or `}`, used to spot function headers
    header: String,
    header_line: usize,
    line_code: LineCode,
    /// Line that looked unterminated, confirmed once the next code line is seen
    pending_semicolon: Option<usize>,
}

/// Run the pre-check over raw source text.
pub fn preprocess(source: &str) -> Preprocessed {
    let mut scanner = Scanner {
        out: Preprocessed::default(),
        state: ScanState::Code,
        line: 1,
        depth: 0,
        paren_depth: 0,
        open_braces: 0,
        close_braces: 0,
        header: String::new(),
        header_line: 1,
        line_code: LineCode::default(),
        pending_semicolon: None,
    };
    let chars: Vec<char> = source.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        i += scanner.step(c, next);
    }
    scanner.finish()
}

impl Scanner {
    /// Consume one character (two for comment delimiters); returns how many.
    fn step(&mut self, c: char, next: Option<char>) -> usize {
        if c == '\n' {
            self.end_of_line();
            return 1;
        }

        match self.state {
            ScanState::Code => self.code_char(c, next),
            ScanState::Directive => {
                self.out.cleaned.push(c);
                1
            }
            ScanState::LineComment => {
                self.out.cleaned.push(' ');
                1
            }
            ScanState::BlockComment { .. } => {
                if c == '*' && next == Some('/') {
                    self.out.cleaned.push_str("  ");
                    self.state = ScanState::Code;
                    self.header.push(' ');
                    2
                } else {
                    self.out.cleaned.push(' ');
                    1
                }
            }
            ScanState::Str { .. } | ScanState::CharLit { .. } => {
                self.out.cleaned.push(c);
                self.header.push(c);
                let closing = if matches!(self.state, ScanState::Str { .. }) { '"' } else { '\'' };
                if c == '\\' {
                    if let Some(escaped) = next.filter(|n| *n != '\n') {
                        self.out.cleaned.push(escaped);
                        self.header.push(escaped);
                        return 2;
                    }
                } else if c == closing {
                    self.state = ScanState::Code;
                    self.line_code.code.push(closing);
                }
                1
            }
        }
    }

    fn code_char(&mut self, c: char, next: Option<char>) -> usize {
        if c == '/' && next == Some('/') {
            self.state = ScanState::LineComment;
            self.out.cleaned.push_str("  ");
            return 2;
        }
        if c == '/' && next == Some('*') {
            self.state = ScanState::BlockComment { start_line: self.line };
            self.out.cleaned.push_str("  ");
            return 2;
        }
        if c == '#' && self.line_code.code.trim().is_empty() {
            self.state = ScanState::Directive;
            self.line_code.is_directive = true;
            self.out.cleaned.push(c);
            return 1;
        }

        self.out.cleaned.push(c);
        if !c.is_whitespace() {
            self.line_code.code.push(c);
        }

        match c {
            '"' => {
                self.state = ScanState::Str { start_line: self.line };
                self.push_header_char(c);
            }
            '\'' => {
                self.state = ScanState::CharLit { start_line: self.line };
                self.push_header_char(c);
            }
            '(' => {
                self.paren_depth += 1;
                self.push_header_char(c);
            }
            ')' => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.push_header_char(c);
            }
            ';' if self.paren_depth == 0 => self.header.clear(),
            '{' => {
                self.open_braces += 1;
                if self.depth == 0 {
                    if let Some(name) = function_name(self.header.trim()) {
                        self.out.functions.push(FunctionHeader {
                            name,
                            line: self.header_line,
                        });
                    }
                }
                self.header.clear();
                self.depth += 1;
                self.paren_depth = 0;
            }
            '}' => {
                self.close_braces += 1;
                self.header.clear();
                if self.depth == 0 {
                    self.out.issues.push(SyntaxIssue::UnexpectedCloseBrace { line: self.line });
                } else {
                    self.depth -= 1;
                }
            }
            _ => self.push_header_char(c),
        }
        1
    }

    fn push_header_char(&mut self, c: char) {
        if self.header.trim().is_empty() && !c.is_whitespace() {
            self.header.clear();
            self.header_line = self.line;
        }
        self.header.push(c);
    }

    fn end_of_line(&mut self) {
        self.out.cleaned.push('\n');
        match self.state {
            ScanState::Str { start_line } | ScanState::CharLit { start_line } => {
                self.out.issues.push(SyntaxIssue::UnterminatedLiteral { line: start_line });
                self.state = ScanState::Code;
            }
            ScanState::LineComment | ScanState::Directive => self.state = ScanState::Code,
            _ => {}
        }
        if matches!(self.state, ScanState::Code) {
            self.header.push(' ');
        }
        self.check_line_end();
        self.line += 1;
    }

    /// Settle the previous suspect line against this one, then judge this one.
    fn check_line_end(&mut self) {
        let line_code = std::mem::take(&mut self.line_code);
        if let Some(first) = line_code.code.chars().next() {
            if let Some(suspect) = self.pending_semicolon.take() {
                if line_code.is_directive || !continues_expression(first) {
                    self.out.issues.push(SyntaxIssue::MissingSemicolon { line: suspect });
                }
            }
        }
        if !line_code.is_directive && self.paren_depth == 0 && looks_unterminated(&line_code.code) {
            self.pending_semicolon = Some(self.line);
        }
    }

    fn finish(mut self) -> Preprocessed {
        match self.state {
            ScanState::BlockComment { start_line } => {
                self.out.issues.push(SyntaxIssue::UnterminatedComment { line: start_line });
            }
            ScanState::Str { start_line } | ScanState::CharLit { start_line } => {
                self.out.issues.push(SyntaxIssue::UnterminatedLiteral { line: start_line });
            }
            _ => self.check_line_end(),
        }
        if let Some(suspect) = self.pending_semicolon.take() {
            self.out.issues.push(SyntaxIssue::MissingSemicolon { line: suspect });
        }

        if self.open_braces != self.close_braces {
            self.out.issues.push(SyntaxIssue::UnbalancedBraces {
                open: self.open_braces,
                close: self.close_braces,
            });
        }
        if self.out.function("main").is_none() {
            self.out.issues.push(SyntaxIssue::MissingMain);
        }
        self.out
    }
}

/// A line opening with one of these carries on the expression above it.
fn continues_expression(first: char) -> bool {
    matches!(
        first,
        '+' | '-' | '*' | '/' | '%' | '=' | '&' | '|' | '<' | '>' | '?' | ':' | '.' | ',' | ';'
    )
}

const CONTROL_KEYWORDS: [&str; 6] = ["if", "for", "while", "switch", "else", "do"];

/// Extract `name` from a function header such as `int add(int a, int b)`.
fn function_name(header: &str) -> Option<String> {
    let open = header.find('(')?;
    if !header.ends_with(')') {
        return None;
    }
    let words: Vec<&str> = header[..open].split_whitespace().collect();
    if words.len() < 2 || CONTROL_KEYWORDS.contains(&words[0]) {
        return None;
    }
    let name = words.last()?.trim_start_matches('*');
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    valid.then(|| name.to_string())
}

/// Heuristic for a code line (whitespace removed) that should end with `;`.
fn looks_unterminated(code: &str) -> bool {
    let Some(last) = code.chars().last() else {
        return false;
    };
    if matches!(last, ';' | '{' | '}' | ',' | ':' | '(' | '\\') {
        return false;
    }
    if code.contains('{') || code.contains('}') {
        return false;
    }
    if CONTROL_KEYWORDS.iter().any(|kw| starts_with_word(code, kw)) {
        return false;
    }
    // Continuation of an expression on the next line
    if matches!(last, '+' | '-' | '*' | '/' | '%' | '=' | '&' | '|' | '<' | '>' | '?' | '!') {
        return false;
    }
    // Function header whose brace sits on the next line
    if last == ')' && function_name(&respace_header(code)).is_some() {
        return false;
    }
    true
}

fn starts_with_word(code: &str, word: &str) -> bool {
    code.strip_prefix(word)
        .is_some_and(|rest| {
            rest.chars()
                .next()
                .map_or(true, |c| !c.is_ascii_alphanumeric() && c != '_')
        })
}

/// Probe text has whitespace removed; rebuild `intmain()` into `int main()`
/// when the line begins with a type keyword.
fn respace_header(code: &str) -> String {
    const TYPES: [&str; 9] = [
        "unsigned", "double", "float", "short", "long", "void", "char", "int", "const",
    ];
    let mut rest = code;
    let mut words = Vec::new();
    loop {
        match TYPES.iter().find(|t| rest.starts_with(*t)) {
            Some(t) => {
                words.push(*t);
                rest = &rest[t.len()..];
            }
            None => break,
        }
    }
    if words.is_empty() {
        return code.to_string();
    }
    format!("{} {}", words.join(" "), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_program_has_no_issues() {
        let src = "#include <stdio.h>\n\nint main() {\n    int x = 5;\n    printf(\"%d\\n\", x);\n    return 0;\n}\n";
        let pre = preprocess(src);
        assert!(pre.issues.is_empty(), "{:?}", pre.issues);
        assert_eq!(pre.function("main").map(|f| f.line), Some(3));
    }

    #[test]
    fn test_comments_are_blanked_and_lines_kept() {
        let src = "int main() { // hi\n /* a\n b */ int y; }";
        let pre = preprocess(src);
        assert_eq!(pre.cleaned.lines().count(), src.lines().count());
        assert!(!pre.cleaned.contains("hi"));
        assert!(!pre.cleaned.contains('b'));
        assert!(pre.cleaned.contains("int y;"));
    }

    #[test]
    fn test_braces_in_strings_are_ignored() {
        let pre = preprocess("int main() { printf(\"{ a; b\"); return 0; }");
        assert!(pre.issues.is_empty(), "{:?}", pre.issues);
    }

    #[test]
    fn test_function_headers_in_order() {
        let src = "int g = 1;\nint add(int a, int b)\n{\n    for (a = 0; a < b; a++) { }\n    return a;\n}\nint main() { return add(1, 2); }";
        let pre = preprocess(src);
        let names: Vec<(&str, usize)> = pre.functions.iter().map(|f| (f.name.as_str(), f.line)).collect();
        assert_eq!(names, vec![("add", 2), ("main", 7)]);
    }

    #[test]
    fn test_unbalanced_braces_are_fatal() {
        let pre = preprocess("int main() {\n if (1) {\n }\n");
        assert!(pre.has_fatal());
        assert!(pre
            .issues
            .contains(&SyntaxIssue::UnbalancedBraces { open: 2, close: 1 }));
        assert_eq!(
            pre.issues[0].to_string(),
            "大括号不匹配: 有2个开括号和1个闭括号"
        );
    }

    #[test]
    fn test_missing_main() {
        let pre = preprocess("int helper() { return 1; }");
        assert!(pre.issues.contains(&SyntaxIssue::MissingMain));
        assert!(pre.has_fatal());
    }

    #[test]
    fn test_missing_semicolon_is_advisory() {
        let pre = preprocess("int main()\n{\n    int x = 5\n    return 0;\n}");
        assert_eq!(pre.issues, vec![SyntaxIssue::MissingSemicolon { line: 3 }]);
        assert!(!pre.has_fatal());
    }

    #[test]
    fn test_expression_continued_on_next_line_is_not_flagged() {
        let pre = preprocess("int main()\n{\n    int y = 3\n        + 4;\n    int z = y\n\n        * 2;\n    return 0;\n}");
        assert!(pre.issues.is_empty(), "{:?}", pre.issues);
    }

    #[test]
    fn test_missing_semicolon_before_closing_brace() {
        let pre = preprocess("int main()\n{\n    return 0\n}");
        assert_eq!(pre.issues, vec![SyntaxIssue::MissingSemicolon { line: 3 }]);
    }

    #[test]
    fn test_missing_semicolon_on_last_line() {
        let pre = preprocess("int main() { return 0; }\nint x = 1");
        assert_eq!(pre.issues, vec![SyntaxIssue::MissingSemicolon { line: 2 }]);
    }

    #[test]
    fn test_multi_line_call_is_not_flagged() {
        let src = "int main() {\n    printf(\"%d %d\\n\",\n           1,\n           2);\n    if (1)\n        return 0;\n    else\n        return 1;\n}";
        let pre = preprocess(src);
        assert!(pre.issues.is_empty(), "{:?}", pre.issues);
    }

    #[test]
    fn test_function_header_detection() {
        assert_eq!(function_name("int add(int a, int b)").as_deref(), Some("add"));
        assert_eq!(function_name("int main(void)").as_deref(), Some("main"));
        assert_eq!(function_name("while (x > 0)"), None);
        assert_eq!(function_name("x = f(1)"), None);
    }
}
