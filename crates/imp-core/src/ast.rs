//! Abstract syntax tree for imp programs
//!
//! The node-kind set is closed and fixed; every consumer matches
//! exhaustively so adding a kind is a compile-time event across the
//! workspace. The symbolic engine treats the tree as read-only input.

/// Relational comparison operators over integer expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `=`
    Eq,
    /// `>=`
    Ge,
    /// `>`
    Gt,
}

impl RelOp {
    /// Concrete-syntax spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Eq => "=",
            RelOp::Ge => ">=",
            RelOp::Gt => ">",
        }
    }
}

/// Boolean connectives
///
/// `Not` is unary (exactly one operand); `And` and `Or` are n-ary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    Not,
    And,
    Or,
}

/// Arithmetic operators, applied as a left fold over an n-ary operand list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    /// Concrete-syntax spelling of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// An integer- or boolean-valued expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Integer literal
    IntConst(i64),
    /// Boolean literal
    BoolConst(bool),
    /// Variable reference
    Var(String),
    /// Relational comparison, always binary, always over integers
    Rel {
        op: RelOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Boolean connective; `args` holds exactly one operand for `Not`
    Bool { op: BoolOp, args: Vec<Expr> },
    /// Arithmetic operation over two or more operands, folded left to right
    Arith { op: ArithOp, args: Vec<Expr> },
}

impl Expr {
    /// Convenience constructor for a variable reference
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }
}

/// A statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `skip` - no effect
    Skip,
    /// `print_state` - dump the current symbolic state
    PrintState,
    /// `x := e`
    Assign { var: String, rhs: Expr },
    /// `havoc x, y, z` - forget everything known about the named variables
    Havoc { vars: Vec<String> },
    /// `assert c` - proof obligation
    Assert(Expr),
    /// `assume c` - narrow the analyzed state space
    Assume(Expr),
    /// `if c then s1 [else s2]`
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// `while c [inv i] do s`
    While {
        cond: Expr,
        inv: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `{ s1; s2; ... }` - sequencing
    Block(Vec<Stmt>),
}
