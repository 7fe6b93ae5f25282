//! The value model, which doubles as the AST.
//!
//! The reader produces [`Value`]s and the evaluator reduces them to
//! [`Value`]s: an expression is data until it is evaluated, and evaluation
//! results (quoted lists, closures, errors) can be fed back in. Special
//! forms (`define`, `if`, `and`, `or`) are dedicated variants so the
//! evaluator dispatches on them by pattern matching instead of by name.

use std::fmt;
use std::rc::Rc;

use crate::builtin::Builtin;
use crate::env::Frame;
use crate::eval_error::EtaError;
use crate::symbol::Symbol;

// ══════════════════════════════════════════════════════════════════════════════
// Value
// ══════════════════════════════════════════════════════════════════════════════

/// A value or AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Symbol(Symbol),
    /// An ordered list of cells with a quoting mode.
    Expr(Expression),
    /// A closure: formals, body and captured bindings.
    Lambda(Lambda),
    /// `(define name value)`; evaluates to [`Value::NoValue`].
    Definition(Box<Definition>),
    /// `(if clause then else)`, evaluated lazily.
    If(Box<IfExpr>),
    /// `(and e1 e2 ...)`, short-circuiting.
    And(Vec<Value>),
    /// `(or e1 e2 ...)`, short-circuiting.
    Or(Vec<Value>),
    /// A host function installed into the environment.
    Builtin(Builtin),
    /// A bare ordered sequence: a multi-statement program, or the results of
    /// evaluating one.
    Seq(Vec<Value>),
    Error(EtaError),
    /// Result of a binding form. Filtered out of aggregate results.
    NoValue,
}

impl Value {
    pub fn symbol(name: impl AsRef<str>) -> Self {
        Self::Symbol(Symbol::new(name))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// A plain (unquoted) expression, i.e. an application form.
    pub fn list(cells: Vec<Value>) -> Self {
        Self::Expr(Expression::new(cells))
    }

    /// A quoted expression, i.e. a data list.
    pub fn quoted(cells: Vec<Value>) -> Self {
        Self::Expr(Expression::quoted(cells))
    }

    pub fn define(symbol: impl Into<Symbol>, value: Value) -> Self {
        Self::Definition(Box::new(Definition::new(symbol, value)))
    }

    pub fn if_expr(clause: Value, then_branch: Value, else_branch: Value) -> Self {
        Self::If(Box::new(IfExpr::new(clause, then_branch, else_branch)))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_no_value(&self) -> bool {
        matches!(self, Self::NoValue)
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Self::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// A short, human-readable name for the value's variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Str(_) => "string",
            Self::Symbol(_) => "symbol",
            Self::Expr(_) => "expression",
            Self::Lambda(_) => "lambda",
            Self::Definition(_) => "definition",
            Self::If(_) => "conditional",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Builtin(_) => "builtin",
            Self::Seq(_) => "sequence",
            Self::Error(_) => "error",
            Self::NoValue => "no value",
        }
    }
}

/// The first error value in `values`, if any.
pub fn first_error(values: &[Value]) -> Option<&Value> {
    values.iter().find(|v| v.is_error())
}

impl From<EtaError> for Value {
    fn from(err: EtaError) -> Self {
        Self::Error(err)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Expression> for Value {
    fn from(expr: Expression) -> Self {
        Self::Expr(expr)
    }
}

impl From<Lambda> for Value {
    fn from(lambda: Lambda) -> Self {
        Self::Lambda(lambda)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expression
// ══════════════════════════════════════════════════════════════════════════════

/// Quoting mode of an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteKind {
    /// Evaluated as an application form.
    #[default]
    Plain,
    /// `'( ... )`: data, evaluates to itself.
    Quoted,
    /// `` `( ... ) ``: reserved; behaves like [`QuoteKind::Quoted`].
    QuasiQuoted,
}

/// An ordered sequence of cells.
///
/// Equality compares cells only; two expressions that differ only in their
/// quoting mode are equal.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    cells: Vec<Value>,
    quote: QuoteKind,
}

impl Expression {
    pub fn new(cells: Vec<Value>) -> Self {
        Self {
            cells,
            quote: QuoteKind::Plain,
        }
    }

    pub fn quoted(cells: Vec<Value>) -> Self {
        Self::new(cells).with_quote(QuoteKind::Quoted)
    }

    pub fn quasi_quoted(cells: Vec<Value>) -> Self {
        Self::new(cells).with_quote(QuoteKind::QuasiQuoted)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, quote: QuoteKind) -> Self {
        self.quote = quote;
        self
    }

    pub fn quote_kind(&self) -> QuoteKind {
        self.quote
    }

    /// Plain expressions are reduced; quoted ones are returned unchanged.
    pub fn is_plain(&self) -> bool {
        self.quote == QuoteKind::Plain
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut Vec<Value> {
        &mut self.cells
    }

    pub fn into_cells(self) -> Vec<Value> {
        self.cells
    }

    pub fn push(&mut self, value: Value) {
        self.cells.push(value);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl FromIterator<Value> for Expression {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Closures & special forms
// ══════════════════════════════════════════════════════════════════════════════

/// A closure value.
///
/// Immutable once built: applying it copies the captured frame, so repeated
/// or partial applications never observe each other's bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    formals: Vec<Symbol>,
    body: Rc<Value>,
    captured: Frame,
}

impl Lambda {
    /// A closure with an empty captured frame, as produced by the reader.
    pub fn new(formals: Vec<Symbol>, body: Value) -> Self {
        Self::with_frame(formals, Rc::new(body), Frame::new())
    }

    /// A closure over an existing frame (partial application).
    pub fn with_frame(formals: Vec<Symbol>, body: Rc<Value>, captured: Frame) -> Self {
        Self {
            formals,
            body,
            captured,
        }
    }

    pub fn formals(&self) -> &[Symbol] {
        &self.formals
    }

    pub fn arity(&self) -> usize {
        self.formals.len()
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Shared handle to the body, for building derived closures.
    pub fn body_rc(&self) -> Rc<Value> {
        Rc::clone(&self.body)
    }

    pub fn captured(&self) -> &Frame {
        &self.captured
    }
}

/// A binding form: `(define symbol value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub symbol: Symbol,
    pub value: Value,
}

impl Definition {
    pub fn new(symbol: impl Into<Symbol>, value: Value) -> Self {
        Self {
            symbol: symbol.into(),
            value,
        }
    }
}

/// `(if clause then else)`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub clause: Value,
    pub then_branch: Value,
    pub else_branch: Value,
}

impl IfExpr {
    pub fn new(clause: Value, then_branch: Value, else_branch: Value) -> Self {
        Self {
            clause,
            then_branch,
            else_branch,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

fn write_joined(f: &mut fmt::Formatter<'_>, values: &[Value], sep: &str) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => {
                if n.is_finite() && n.fract() == 0.0 {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{n}")
                }
            }
            Self::Bool(b) => f.write_str(if *b { "#t" } else { "#f" }),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Symbol(sym) => write!(f, "{sym}"),
            Self::Expr(expr) => write!(f, "{expr}"),
            Self::Lambda(lambda) => write!(f, "{lambda}"),
            Self::Definition(def) => write!(f, "(define {} {})", def.symbol, def.value),
            Self::If(if_expr) => write!(
                f,
                "(if {} {} {})",
                if_expr.clause, if_expr.then_branch, if_expr.else_branch
            ),
            Self::And(clauses) => {
                f.write_str("(and ")?;
                write_joined(f, clauses, " ")?;
                f.write_str(")")
            }
            Self::Or(clauses) => {
                f.write_str("(or ")?;
                write_joined(f, clauses, " ")?;
                f.write_str(")")
            }
            Self::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name()),
            Self::Seq(values) => {
                f.write_str("[")?;
                write_joined(f, values, ", ")?;
                f.write_str("]")
            }
            Self::Error(err) => write!(f, "{err}"),
            Self::NoValue => f.write_str("#<none>"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quote {
            QuoteKind::Plain => {}
            QuoteKind::Quoted => f.write_str("'")?,
            QuoteKind::QuasiQuoted => f.write_str("`")?,
        }
        f.write_str("(")?;
        write_joined(f, &self.cells, " ")?;
        f.write_str(")")
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(λ (")?;
        for (i, formal) in self.formals.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{formal}")?;
        }
        write!(f, ") {})", self.body)
    }
}
