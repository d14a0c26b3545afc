//! Runtime error types for the interpreter
//!
//! [`RuntimeError`] covers everything that can go wrong while a program runs.
//! Most errors are recoverable: the executor turns them into a [`Diagnostic`],
//! prints it inline and carries on with a zero value. Resource-limit errors
//! are fatal and unwind to the runner through `?`.

use crate::parser::ast::SourceLocation;
use crate::parser::{ParseError, SyntaxIssue};
use std::fmt;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("未定义的变量 '{name}'")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("未定义的函数 '{name}'")]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    /// Division or modulo by zero
    #[error("除数为零: {operation}")]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    #[error("函数 {function} 需要 {expected} 个参数, 实际传入 {got} 个")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error("类型错误: {message}")]
    TypeError {
        message: String,
        location: SourceLocation,
    },

    #[error("不能修改常量 '{name}'")]
    ConstModification {
        name: String,
        location: SourceLocation,
    },

    /// `break`/`continue` with no enclosing loop or switch
    #[error("{keyword} 语句不在循环或switch语句中, 已忽略")]
    StrayJump {
        keyword: &'static str,
        location: SourceLocation,
    },

    /// A statement the parser could not understand
    #[error("无法识别的语句已忽略: {reason}")]
    UnsupportedStatement {
        reason: String,
        location: SourceLocation,
    },

    #[error("变量 {name} 赋值失败: {reason}")]
    AssignmentFailed {
        name: String,
        reason: String,
        location: SourceLocation,
    },

    #[error("可能存在无限循环: 循环次数超过 {limit} 次, 程序已终止")]
    IterationLimit {
        limit: usize,
        location: SourceLocation,
    },

    #[error("可能存在无限循环: 执行步数超过 {limit} 步, 程序已终止")]
    StepLimit {
        limit: usize,
        location: SourceLocation,
    },

    #[error("可能存在无限递归: 函数 {function} 的调用深度超过 {limit} 层, 程序已终止")]
    CallDepthExceeded {
        function: String,
        limit: usize,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::ConstModification { location, .. }
            | RuntimeError::StrayJump { location, .. }
            | RuntimeError::UnsupportedStatement { location, .. }
            | RuntimeError::AssignmentFailed { location, .. }
            | RuntimeError::IterationLimit { location, .. }
            | RuntimeError::StepLimit { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. } => *location,
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            RuntimeError::AssignmentFailed { .. }
            | RuntimeError::ConstModification { .. }
            | RuntimeError::TypeError { .. }
            | RuntimeError::UnsupportedStatement { .. } => DiagnosticKind::Warning,
            RuntimeError::UndefinedVariable { .. }
            | RuntimeError::UndefinedFunction { .. }
            | RuntimeError::DivisionByZero { .. }
            | RuntimeError::ArgumentCountMismatch { .. }
            | RuntimeError::StrayJump { .. } => DiagnosticKind::Runtime,
            RuntimeError::IterationLimit { .. }
            | RuntimeError::StepLimit { .. }
            | RuntimeError::CallDepthExceeded { .. } => DiagnosticKind::ResourceLimit,
        }
    }

    /// Fatal errors stop the run; everything else is reported and skipped.
    pub fn is_fatal(&self) -> bool {
        self.kind() == DiagnosticKind::ResourceLimit
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            kind: self.kind(),
            message: self.to_string(),
            line: Some(self.location().line).filter(|&line| line > 0),
        }
    }
}

/// Severity class of a [`Diagnostic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Rejected before execution
    Syntax,
    /// Advisory; the statement was skipped or a value defaulted
    Warning,
    /// Recovered runtime error
    Runtime,
    /// Loop, step or call-depth ceiling hit; the run was aborted
    ResourceLimit,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Syntax => "语法错误",
            DiagnosticKind::Warning => "警告",
            DiagnosticKind::Runtime => "运行时错误",
            DiagnosticKind::ResourceLimit => "错误",
        }
    }
}

/// A caller-visible problem report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: Option<usize>) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            line,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            DiagnosticKind::Syntax | DiagnosticKind::ResourceLimit
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl From<&SyntaxIssue> for Diagnostic {
    fn from(issue: &SyntaxIssue) -> Self {
        let kind = if issue.is_fatal() {
            DiagnosticKind::Syntax
        } else {
            DiagnosticKind::Warning
        };
        Diagnostic::new(kind, issue.to_string(), issue.line())
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        Diagnostic::new(
            DiagnosticKind::Syntax,
            err.to_string(),
            Some(err.location.line),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_limits_are_fatal() {
        let loc = SourceLocation::new(3, 5);
        let div = RuntimeError::DivisionByZero {
            operation: "x / 0".into(),
            location: loc,
        };
        assert!(!div.is_fatal());
        assert_eq!(div.kind(), DiagnosticKind::Runtime);

        let limit = RuntimeError::IterationLimit {
            limit: 10_000,
            location: loc,
        };
        assert!(limit.is_fatal());
        assert!(limit.to_string().contains("无限循环"));
    }

    #[test]
    fn test_assignment_failure_renders_as_warning() {
        let err = RuntimeError::AssignmentFailed {
            name: "x".into(),
            reason: "变量未声明".into(),
            location: SourceLocation::new(4, 1),
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.line, Some(4));
        assert_eq!(diag.to_string(), "警告: 变量 x 赋值失败: 变量未声明");
    }

    #[test]
    fn test_syntax_issue_conversion() {
        let diag = Diagnostic::from(&SyntaxIssue::MissingMain);
        assert!(diag.is_fatal());
        let diag = Diagnostic::from(&SyntaxIssue::MissingSemicolon { line: 7 });
        assert_eq!(diag.kind, DiagnosticKind::Warning);
        assert_eq!(diag.line, Some(7));
    }
}
