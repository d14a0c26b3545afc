// AST definitions for the C teaching subset

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Scalar types understood by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Long,
    Short,
    Unsigned,
    Float,
    Double,
    Char,
    Void,
}

impl BaseType {
    pub fn is_floating(self) -> bool {
        matches!(self, BaseType::Float | BaseType::Double)
    }

    pub fn name(self) -> &'static str {
        match self {
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Unsigned => "unsigned",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::Char => "char",
            BaseType::Void => "void",
        }
    }
}

/// Declared type of a variable, parameter or function result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub base: BaseType,
    pub is_const: bool,
    /// `Some(None)` for `name[]`, `Some(Some(n))` for `name[n]`
    pub array: Option<Option<usize>>,
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            is_const: false,
            array: None,
        }
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_array(mut self, size: Option<usize>) -> Self {
        self.array = Some(size);
        self
    }

    pub fn is_array(&self) -> bool {
        self.array.is_some()
    }

    /// `char buf[N]` and `char buf[]` hold strings.
    pub fn is_string(&self) -> bool {
        self.base == BaseType::Char && self.is_array()
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Plus,
    Not,
    AddrOf,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLiteral(i64, SourceLocation),
    FloatLiteral(f64, SourceLocation),
    CharLiteral(u8, SourceLocation),
    /// Raw literal text; escapes are decoded where the string is used.
    StringLiteral(String, SourceLocation),
    Variable(String, SourceLocation),
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        location: SourceLocation,
    },
    UnaryOp {
        op: UnOp,
        operand: Box<Expr>,
        location: SourceLocation,
    },
    TernaryOp {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
        location: SourceLocation,
    },
    /// `target = value`, or `target op= value` when `op` is set
    Assignment {
        target: String,
        op: Option<BinOp>,
        value: Box<Expr>,
        location: SourceLocation,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Cast {
        target: BaseType,
        expr: Box<Expr>,
        location: SourceLocation,
    },
    SizeofType {
        target: Type,
        location: SourceLocation,
    },
    SizeofExpr {
        expr: Box<Expr>,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::IntLiteral(_, loc)
            | Expr::FloatLiteral(_, loc)
            | Expr::CharLiteral(_, loc)
            | Expr::StringLiteral(_, loc)
            | Expr::Variable(_, loc) => *loc,
            Expr::BinaryOp { location, .. }
            | Expr::UnaryOp { location, .. }
            | Expr::TernaryOp { location, .. }
            | Expr::Assignment { location, .. }
            | Expr::Call { location, .. }
            | Expr::Cast { location, .. }
            | Expr::SizeofType { location, .. }
            | Expr::SizeofExpr { location, .. } => *location,
        }
    }
}

/// One name in a declaration such as `int a = 1, b[4];`
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub var_type: Type,
    pub init: Option<Expr>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaseLabel {
    Case(Expr),
    Default,
}

/// A `case`/`default` label together with the statements that follow it
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub label: CaseLabel,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statements. The set is closed: anything the parser cannot place in one of
/// these shapes becomes [`Stmt::Unrecognized`].
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declaration {
        declarators: Vec<Declarator>,
        location: SourceLocation,
    },
    Expression {
        expr: Expr,
        location: SourceLocation,
    },
    Printf {
        format: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    Scanf {
        format: String,
        targets: Vec<Expr>,
        location: SourceLocation,
    },
    /// Statement-level call of a user function or a built-in
    Call {
        name: String,
        args: Vec<Expr>,
        location: SourceLocation,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        location: SourceLocation,
    },
    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
        location: SourceLocation,
    },
    Switch {
        subject: Expr,
        cases: Vec<SwitchCase>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Return {
        value: Option<Expr>,
        location: SourceLocation,
    },
    Block {
        statements: Vec<Stmt>,
        location: SourceLocation,
    },
    Empty {
        location: SourceLocation,
    },
    Unrecognized {
        reason: String,
        location: SourceLocation,
    },
}

impl Stmt {
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Declaration { location, .. }
            | Stmt::Expression { location, .. }
            | Stmt::Printf { location, .. }
            | Stmt::Scanf { location, .. }
            | Stmt::Call { location, .. }
            | Stmt::If { location, .. }
            | Stmt::For { location, .. }
            | Stmt::While { location, .. }
            | Stmt::DoWhile { location, .. }
            | Stmt::Switch { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Return { location, .. }
            | Stmt::Block { location, .. }
            | Stmt::Empty { location }
            | Stmt::Unrecognized { location, .. } => *location,
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub param_type: Type,
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Complete parsed translation unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub globals: Vec<Stmt>,
    pub functions: Vec<FunctionDef>,
}

impl Program {
    pub fn main(&self) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| f.name == "main")
    }
}
