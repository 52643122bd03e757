//! AST node shapes consumed by the interpreter.
//!
//! The frontend (`lexer`/`parser`) is the only producer of these types; the
//! core does not care how they are produced, only that these shapes hold.

use crate::value::VarType;

/// A node's source position: a single line, or a `[start, end]` range for
/// compound constructs (`for`, `if`, function bodies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lineno {
    Single(u32),
    Range(u32, u32),
}

impl Lineno {
    pub fn start(self) -> u32 {
        match self {
            Lineno::Single(l) => l,
            Lineno::Range(s, _) => s,
        }
    }

    pub fn end(self) -> u32 {
        match self {
            Lineno::Single(l) => l,
            Lineno::Range(_, e) => e,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOpKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl Cmp {
    pub fn as_str(self) -> &'static str {
        match self {
            Cmp::Lt => "<",
            Cmp::Gt => ">",
            Cmp::Le => "<=",
            Cmp::Ge => ">=",
            Cmp::Eq => "==",
            Cmp::Ne => "!=",
        }
    }
}

/// An lvalue: a plain identifier or an array element.
#[derive(Debug, Clone)]
pub enum LValue {
    Id { name: String, lineno: Lineno },
    Array { name: String, index: Box<Expr>, lineno: Lineno },
}

impl LValue {
    pub fn name(&self) -> &str {
        match self {
            LValue::Id { name, .. } => name,
            LValue::Array { name, .. } => name,
        }
    }

    pub fn lineno(&self) -> Lineno {
        match self {
            LValue::Id { lineno, .. } => *lineno,
            LValue::Array { lineno, .. } => *lineno,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64, Lineno),
    /// A string literal; only meaningful as `printf`'s first argument.
    StringLit(String, Lineno),
    Id {
        name: String,
        lineno: Lineno,
    },
    Array {
        name: String,
        index: Box<Expr>,
        lineno: Lineno,
    },
    Casting {
        ty: VarType,
        inner: Box<Expr>,
        lineno: Lineno,
    },
    BinOp {
        op: BinOpKind,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        /// Canonical textual form, computed at parse time, used as the CSE
        /// table key.
        text: String,
        lineno: Lineno,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
        lineno: Lineno,
    },
}

impl Expr {
    pub fn lineno(&self) -> Lineno {
        match self {
            Expr::Number(_, l)
            | Expr::StringLit(_, l)
            | Expr::Id { lineno: l, .. }
            | Expr::Array { lineno: l, .. }
            | Expr::Casting { lineno: l, .. }
            | Expr::BinOp { lineno: l, .. }
            | Expr::Call { lineno: l, .. } => *l,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Declarator {
    pub name: String,
    pub is_array: bool,
    /// Size expression for arrays (must evaluate synchronously).
    pub size: Option<Expr>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Declare {
        ty: VarType,
        vars: Vec<Declarator>,
        lineno: Lineno,
    },
    Assign {
        target: LValue,
        expr: Expr,
        lineno: Lineno,
    },
    Increment {
        target: LValue,
        lineno: Lineno,
    },
    For {
        assign: Box<Stmt>,
        increment: Box<Stmt>,
        condition: Box<Stmt>,
        stmts: Vec<Stmt>,
        lineno: Lineno,
    },
    If {
        condition: Box<Stmt>,
        stmts: Vec<Stmt>,
        lineno: Lineno,
    },
    FuncCall {
        callee: String,
        args: Vec<Expr>,
        lineno: Lineno,
    },
    Return {
        value: Option<Expr>,
        lineno: Lineno,
    },
    /// Synthetic statement reached only inside IF/FOR scopes: evaluate
    /// `expr`, compare with `var`'s current value via `cmp`.
    Condition {
        var: String,
        cmp: Cmp,
        expr: Expr,
        lineno: Lineno,
    },
}

impl Stmt {
    pub fn lineno(&self) -> Lineno {
        match self {
            Stmt::Declare { lineno, .. }
            | Stmt::Assign { lineno, .. }
            | Stmt::Increment { lineno, .. }
            | Stmt::For { lineno, .. }
            | Stmt::If { lineno, .. }
            | Stmt::FuncCall { lineno, .. }
            | Stmt::Return { lineno, .. }
            | Stmt::Condition { lineno, .. } => *lineno,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Param {
    pub ty: VarType,
    pub name: String,
    pub is_array: bool,
    /// True only for the sentinel single `void` parameter.
    pub is_void: bool,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub ty: VarType,
    pub name: String,
    pub params: Vec<Param>,
    pub stmts: Vec<Stmt>,
    pub lineno: Lineno,
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    pub fn find(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}
