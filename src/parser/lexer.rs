//! Lexer (tokenizer) for C source code
//!
//! Converts cleaned source text into a flat [`Token`] stream consumed by the
//! parser. Preprocessor lines are skipped rather than parsed. String literal
//! contents are kept raw: escape sequences are decoded where the string is
//! used, so `printf` sees exactly what the student wrote.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    CharLiteral(u8, SourceLocation),
    StringLiteral(String, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Type keywords
    Int(SourceLocation),
    Long(SourceLocation),
    Short(SourceLocation),
    Unsigned(SourceLocation),
    Signed(SourceLocation),
    Float(SourceLocation),
    Double(SourceLocation),
    Char(SourceLocation),
    Void(SourceLocation),
    Const(SourceLocation),

    // Statement keywords
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Do(SourceLocation),
    For(SourceLocation),
    Switch(SourceLocation),
    Case(SourceLocation),
    Default(SourceLocation),
    Break(SourceLocation),
    Continue(SourceLocation),
    Return(SourceLocation),
    Sizeof(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),  // ==
    NotEq(SourceLocation), // !=
    Lt(SourceLocation),    // <
    Le(SourceLocation),    // <=
    Gt(SourceLocation),    // >
    Ge(SourceLocation),    // >=

    // Logical
    AndAnd(SourceLocation), // &&
    OrOr(SourceLocation),   // ||
    Bang(SourceLocation),   // !
    Amp(SourceLocation),    // &

    // Assignment
    Eq(SourceLocation),        // =
    PlusEq(SourceLocation),    // +=
    MinusEq(SourceLocation),   // -=
    StarEq(SourceLocation),    // *=
    SlashEq(SourceLocation),   // /=
    PercentEq(SourceLocation), // %=

    // Increment/Decrement
    PlusPlus(SourceLocation),   // ++
    MinusMinus(SourceLocation), // --

    // Ternary
    Question(SourceLocation), // ?
    Colon(SourceLocation),    // :

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    /// A character outside the supported subset (`|`, `^`, `.`, ...).
    /// The parser turns the enclosing statement into an unrecognized one.
    Unknown(char, SourceLocation),

    /// An integer literal too large for `long`; like [`Token::Unknown`],
    /// only the statement holding it is lost.
    OversizedInt(String, SourceLocation),

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc)
            | Token::FloatLiteral(_, loc)
            | Token::CharLiteral(_, loc)
            | Token::StringLiteral(_, loc)
            | Token::Ident(_, loc)
            | Token::Unknown(_, loc)
            | Token::OversizedInt(_, loc)
            | Token::Int(loc)
            | Token::Long(loc)
            | Token::Short(loc)
            | Token::Unsigned(loc)
            | Token::Signed(loc)
            | Token::Float(loc)
            | Token::Double(loc)
            | Token::Char(loc)
            | Token::Void(loc)
            | Token::Const(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Do(loc)
            | Token::For(loc)
            | Token::Switch(loc)
            | Token::Case(loc)
            | Token::Default(loc)
            | Token::Break(loc)
            | Token::Continue(loc)
            | Token::Return(loc)
            | Token::Sizeof(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::Bang(loc)
            | Token::Amp(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::StarEq(loc)
            | Token::SlashEq(loc)
            | Token::PercentEq(loc)
            | Token::PlusPlus(loc)
            | Token::MinusMinus(loc)
            | Token::Question(loc)
            | Token::Colon(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// True for keywords that can start a type specifier.
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            Token::Int(_)
                | Token::Long(_)
                | Token::Short(_)
                | Token::Unsigned(_)
                | Token::Signed(_)
                | Token::Float(_)
                | Token::Double(_)
                | Token::Char(_)
                | Token::Void(_)
                | Token::Const(_)
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::IntLiteral(n, _) => write!(f, "整数 {}", n),
            Token::FloatLiteral(n, _) => write!(f, "浮点数 {}", n),
            Token::CharLiteral(c, _) => {
                if c.is_ascii_graphic() || *c == b' ' {
                    write!(f, "字符 '{}'", *c as char)
                } else {
                    write!(f, "字符 '\\x{:02x}'", c)
                }
            }
            Token::StringLiteral(s, _) => write!(f, "字符串 \"{}\"", s),
            Token::Ident(s, _) => write!(f, "标识符 '{}'", s),
            Token::Unknown(c, _) => write!(f, "'{}'", c),
            Token::OversizedInt(text, _) => write!(f, "超出范围的整数常量 {}", text),
            Token::Int(_) => write!(f, "'int'"),
            Token::Long(_) => write!(f, "'long'"),
            Token::Short(_) => write!(f, "'short'"),
            Token::Unsigned(_) => write!(f, "'unsigned'"),
            Token::Signed(_) => write!(f, "'signed'"),
            Token::Float(_) => write!(f, "'float'"),
            Token::Double(_) => write!(f, "'double'"),
            Token::Char(_) => write!(f, "'char'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Const(_) => write!(f, "'const'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::While(_) => write!(f, "'while'"),
            Token::Do(_) => write!(f, "'do'"),
            Token::For(_) => write!(f, "'for'"),
            Token::Switch(_) => write!(f, "'switch'"),
            Token::Case(_) => write!(f, "'case'"),
            Token::Default(_) => write!(f, "'default'"),
            Token::Break(_) => write!(f, "'break'"),
            Token::Continue(_) => write!(f, "'continue'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::Sizeof(_) => write!(f, "'sizeof'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::AndAnd(_) => write!(f, "'&&'"),
            Token::OrOr(_) => write!(f, "'||'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::Amp(_) => write!(f, "'&'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::PlusEq(_) => write!(f, "'+='"),
            Token::MinusEq(_) => write!(f, "'-='"),
            Token::StarEq(_) => write!(f, "'*='"),
            Token::SlashEq(_) => write!(f, "'/='"),
            Token::PercentEq(_) => write!(f, "'%='"),
            Token::PlusPlus(_) => write!(f, "'++'"),
            Token::MinusMinus(_) => write!(f, "'--'"),
            Token::Question(_) => write!(f, "'?'"),
            Token::Colon(_) => write!(f, "':'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "文件结尾"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, Error)]
#[error("第{}行第{}列: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for C source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            if self.peek() == Some('#') {
                self.skip_preprocessor_directive();
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "意外的文件结尾".to_string(),
            location: loc,
        })?;

        let token = match ch {
            '"' => return self.string_literal(loc),
            '\'' => return self.char_literal(loc),
            '0'..='9' => return self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                return self.number_literal(ch, loc)
            }
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, loc)),

            '+' => self.pick(&[('+', Token::PlusPlus(loc)), ('=', Token::PlusEq(loc))], Token::Plus(loc)),
            '-' => self.pick(
                &[('-', Token::MinusMinus(loc)), ('=', Token::MinusEq(loc))],
                Token::Minus(loc),
            ),
            '*' => self.pick(&[('=', Token::StarEq(loc))], Token::Star(loc)),
            '/' => self.pick(&[('=', Token::SlashEq(loc))], Token::Slash(loc)),
            '%' => self.pick(&[('=', Token::PercentEq(loc))], Token::Percent(loc)),
            '=' => self.pick(&[('=', Token::EqEq(loc))], Token::Eq(loc)),
            '!' => self.pick(&[('=', Token::NotEq(loc))], Token::Bang(loc)),
            '<' => self.pick(&[('=', Token::Le(loc))], Token::Lt(loc)),
            '>' => self.pick(&[('=', Token::Ge(loc))], Token::Gt(loc)),
            '&' => self.pick(&[('&', Token::AndAnd(loc))], Token::Amp(loc)),
            '|' => self.pick(&[('|', Token::OrOr(loc))], Token::Unknown('|', loc)),
            '?' => Token::Question(loc),
            ':' => Token::Colon(loc),
            '(' => Token::LParen(loc),
            ')' => Token::RParen(loc),
            '{' => Token::LBrace(loc),
            '}' => Token::RBrace(loc),
            '[' => Token::LBracket(loc),
            ']' => Token::RBracket(loc),
            ';' => Token::Semicolon(loc),
            ',' => Token::Comma(loc),
            other => Token::Unknown(other, loc),
        };

        Ok(token)
    }

    /// Consume one follow-up character if it selects a two-character operator.
    fn pick(&mut self, options: &[(char, Token)], single: Token) -> Token {
        for (next, token) in options {
            if self.peek() == Some(*next) {
                self.advance();
                return token.clone();
            }
        }
        single
    }

    /// Parse string literal, keeping escape sequences verbatim
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(Token::StringLiteral(string, loc));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    string.push('\\');
                    if let Some(escaped) = self.advance() {
                        string.push(escaped);
                    }
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            message: "字符串没有结束的引号".to_string(),
            location: loc,
        })
    }

    /// Parse character literal
    fn char_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let ch = self.advance().ok_or_else(|| LexError {
            message: "字符常量没有结束".to_string(),
            location: loc,
        })?;

        let value = if ch == '\\' {
            let escaped = self.advance().ok_or_else(|| LexError {
                message: "字符常量没有结束".to_string(),
                location: loc,
            })?;
            match escaped {
                'n' => b'\n',
                't' => b'\t',
                'r' => b'\r',
                'a' => 0x07,
                '0' => 0,
                '\\' => b'\\',
                '\'' => b'\'',
                '"' => b'"',
                'x' => {
                    let mut hex = String::new();
                    while let Some(c) = self.peek() {
                        if c.is_ascii_hexdigit() && hex.len() < 2 {
                            hex.push(c);
                            self.advance();
                        } else {
                            break;
                        }
                    }
                    u8::from_str_radix(&hex, 16).map_err(|_| LexError {
                        message: format!("无效的十六进制转义: \\x{}", hex),
                        location: loc,
                    })?
                }
                other => (other as u32 & 0xff) as u8,
            }
        } else {
            (ch as u32 & 0xff) as u8
        };

        if self.advance() != Some('\'') {
            return Err(LexError {
                message: "字符常量缺少结束的单引号".to_string(),
                location: loc,
            });
        }

        Ok(Token::CharLiteral(value, loc))
    }

    /// Parse numeric literal: decimal, hex, or floating point with suffixes
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut text = String::new();
        text.push(first);

        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            let mut hex = String::new();
            while let Some(c) = self.peek().filter(|c| c.is_ascii_hexdigit()) {
                hex.push(c);
                self.advance();
            }
            self.skip_integer_suffix();
            if hex.is_empty() {
                return Err(LexError {
                    message: "无效的十六进制常量: 0x".to_string(),
                    location: loc,
                });
            }
            return Ok(match i64::from_str_radix(&hex, 16) {
                Ok(value) => Token::IntLiteral(value, loc),
                Err(_) => Token::OversizedInt(format!("0x{}", hex), loc),
            });
        }

        let mut is_float = first == '.';
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else if c == '.' && !is_float {
                is_float = true;
                text.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E')
                && (self.peek_ahead(1).is_some_and(|d| d.is_ascii_digit())
                    || (matches!(self.peek_ahead(1), Some('+') | Some('-'))
                        && self.peek_ahead(2).is_some_and(|d| d.is_ascii_digit())))
            {
                is_float = true;
                text.push(c);
                self.advance();
                if let Some(sign) = self.peek().filter(|s| *s == '+' || *s == '-') {
                    text.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        if is_float {
            if matches!(self.peek(), Some('f') | Some('F') | Some('l') | Some('L')) {
                self.advance();
            }
            let value = text.parse::<f64>().map_err(|_| LexError {
                message: format!("无效的浮点常量: {}", text),
                location: loc,
            })?;
            return Ok(Token::FloatLiteral(value, loc));
        }

        self.skip_integer_suffix();
        // Digits only, so the one possible failure is overflow
        Ok(match text.parse::<i64>() {
            Ok(value) => Token::IntLiteral(value, loc),
            Err(_) => Token::OversizedInt(text, loc),
        })
    }

    fn skip_integer_suffix(&mut self) {
        while matches!(self.peek(), Some('u') | Some('U') | Some('l') | Some('L')) {
            self.advance();
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "int" => Token::Int(loc),
            "long" => Token::Long(loc),
            "short" => Token::Short(loc),
            "unsigned" => Token::Unsigned(loc),
            "signed" => Token::Signed(loc),
            "float" => Token::Float(loc),
            "double" => Token::Double(loc),
            "char" => Token::Char(loc),
            "void" => Token::Void(loc),
            "const" => Token::Const(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "do" => Token::Do(loc),
            "for" => Token::For(loc),
            "switch" => Token::Switch(loc),
            "case" => Token::Case(loc),
            "default" => Token::Default(loc),
            "break" => Token::Break(loc),
            "continue" => Token::Continue(loc),
            "return" => Token::Return(loc),
            "sizeof" => Token::Sizeof(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => self.skip_line(),
                Some('/') if self.peek_ahead(1) == Some('*') => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance();
        self.advance();

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "注释没有结束".to_string(),
            location: start_loc,
        })
    }

    /// Skip preprocessor directive (#include, #define, ...)
    fn skip_preprocessor_directive(&mut self) {
        self.skip_line();
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
