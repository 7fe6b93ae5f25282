//! The builtin catalogue and the installers that populate a global frame.
//!
//! Every builtin goes through [`Builtin::call`], which hands back any error
//! among the arguments and rejects wrong argument counts before the function
//! body runs. Bodies therefore only see well-counted, error-free arguments.

use std::cmp::Ordering;

use eta_types::{Arity, Builtin, Environment, EtaError, Expression, QuoteKind, Symbol, Value};

use crate::evaluator::evaluate;

/// Every builtin bound by [`install_builtins`].
pub const BUILTINS: &[Builtin] = &[
    Builtin::new("+", Arity::AtLeast(1), add),
    Builtin::new("-", Arity::AtLeast(1), sub),
    Builtin::new("*", Arity::AtLeast(1), mul),
    Builtin::new("/", Arity::AtLeast(1), div),
    Builtin::new("%", Arity::AtLeast(1), rem),
    Builtin::new("max", Arity::AtLeast(1), max),
    Builtin::new("min", Arity::AtLeast(1), min),
    Builtin::new("==", Arity::Exactly(2), eq),
    Builtin::new("!=", Arity::Exactly(2), ne),
    Builtin::new("<", Arity::Exactly(2), lt),
    Builtin::new(">", Arity::Exactly(2), gt),
    Builtin::new("<=", Arity::Exactly(2), le),
    Builtin::new(">=", Arity::Exactly(2), ge),
    Builtin::new("head", Arity::Exactly(1), head),
    Builtin::new("tail", Arity::Exactly(1), tail),
    Builtin::new("list", Arity::AtLeast(0), list),
    Builtin::new("join", Arity::AtLeast(1), join),
    Builtin::new("eval", Arity::Exactly(1), eval),
    Builtin::new("error", Arity::AtLeast(0), error),
    Builtin::new("symbols", Arity::Exactly(0), symbols),
];

/// Mathematical constants bound by [`install_constants`].
pub const CONSTANTS: &[(&str, f64)] = &[
    ("_pi", std::f64::consts::PI),
    ("_tau", std::f64::consts::TAU),
    ("_e", std::f64::consts::E),
];

/// Bind every builtin in `env`'s own frame.
pub fn install_builtins(env: &mut Environment<'_>) {
    for builtin in BUILTINS {
        env.bind(Symbol::new(builtin.name()), Value::Builtin(*builtin));
    }
}

pub fn install_constants(env: &mut Environment<'_>) {
    for &(name, value) in CONSTANTS {
        env.bind(Symbol::new(name), Value::Float(value));
    }
}

fn lift(result: Result<Value, EtaError>) -> Value {
    match result {
        Ok(value) => value,
        Err(err) => Value::Error(err),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn from_value(name: &str, value: &Value) -> Result<Self, EtaError> {
        match value {
            Value::Int(n) => Ok(Self::Int(*n)),
            Value::Float(n) => Ok(Self::Float(*n)),
            other => Err(EtaError::type_mismatch(format!(
                "'{name}' expects numbers, got {other} ({})",
                other.type_name()
            ))),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Self::Int(n) => n == 0,
            Self::Float(n) => n == 0.0,
        }
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        match number {
            Number::Int(n) => Value::Int(n),
            Number::Float(n) => Value::Float(n),
        }
    }
}

/// Left-to-right reduction of numeric arguments. A single argument is
/// returned as it is.
fn reduce(
    name: &str,
    args: &[Value],
    op: impl Fn(Number, Number) -> Result<Number, EtaError>,
) -> Result<Value, EtaError> {
    let mut numbers = args.iter().map(|arg| Number::from_value(name, arg));
    let mut acc = numbers
        .next()
        .ok_or_else(|| EtaError::malformed(format!("'{name}' needs at least one argument")))??;
    for rhs in numbers {
        acc = op(acc, rhs?)?;
    }
    Ok(acc.into())
}

fn overflow(name: &str) -> EtaError {
    EtaError::host_fault(format!("integer overflow in '{name}'"))
}

fn checked(
    name: &'static str,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> impl Fn(Number, Number) -> Result<Number, EtaError> {
    move |a, b| match (a, b) {
        (Number::Int(a), Number::Int(b)) => int_op(a, b).map(Number::Int).ok_or_else(|| overflow(name)),
        (a, b) => Ok(Number::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

fn add(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("+", &args, checked("+", i64::checked_add, |a, b| a + b)))
}

fn sub(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("-", &args, checked("-", i64::checked_sub, |a, b| a - b)))
}

fn mul(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("*", &args, checked("*", i64::checked_mul, |a, b| a * b)))
}

/// Division always produces a float.
fn div(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("/", &args, |a, b| {
        if b.is_zero() {
            return Err(EtaError::host_fault("division by zero"));
        }
        Ok(Number::Float(a.as_f64() / b.as_f64()))
    }))
}

/// Floored modulo: the result takes the sign of the divisor.
fn rem(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("%", &args, |a, b| {
        if b.is_zero() {
            return Err(EtaError::host_fault("modulo by zero"));
        }
        match (a, b) {
            (Number::Int(a), Number::Int(b)) => {
                let r = a.checked_rem(b).ok_or_else(|| overflow("%"))?;
                Ok(Number::Int(if r != 0 && (r < 0) != (b < 0) { r + b } else { r }))
            }
            (a, b) => {
                let (a, b) = (a.as_f64(), b.as_f64());
                let r = a % b;
                Ok(Number::Float(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }))
            }
        }
    }))
}

fn max(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("max", &args, |a, b| {
        Ok(if b.as_f64() > a.as_f64() { b } else { a })
    }))
}

fn min(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(reduce("min", &args, |a, b| {
        Ok(if b.as_f64() < a.as_f64() { b } else { a })
    }))
}

// ══════════════════════════════════════════════════════════════════════════════
// Equality & ordering
// ══════════════════════════════════════════════════════════════════════════════

/// The cells of a list-like value: an expression of any quoting mode or a
/// result sequence.
fn list_cells(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Expr(expr) => Some(expr.cells()),
        Value::Seq(values) => Some(values),
        _ => None,
    }
}

/// Structural equality: integers equal floats of the same magnitude, and
/// lists compare element by element whatever their quoting mode.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        _ => match (list_cells(a), list_cells(b)) {
            (Some(xs), Some(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
            }
            (None, None) => a == b,
            _ => false,
        },
    }
}

fn pair<'a>(name: &str, args: &'a [Value]) -> Result<(&'a Value, &'a Value), EtaError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(EtaError::malformed(format!(
            "'{name}' expects exactly 2 arguments, got {}",
            args.len()
        ))),
    }
}

fn eq(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(pair("==", &args).map(|(a, b)| Value::Bool(values_equal(a, b))))
}

fn ne(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(pair("!=", &args).map(|(a, b)| Value::Bool(!values_equal(a, b))))
}

fn compare(name: &str, a: &Value, b: &Value) -> Result<Option<Ordering>, EtaError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        _ => {
            let x = Number::from_value(name, a)?;
            let y = Number::from_value(name, b)?;
            Ok(x.as_f64().partial_cmp(&y.as_f64()))
        }
    }
}

fn ordering(name: &str, args: &[Value], accept: fn(Ordering) -> bool) -> Value {
    lift(
        pair(name, args)
            .and_then(|(a, b)| compare(name, a, b))
            .map(|ord| Value::Bool(ord.is_some_and(accept))),
    )
}

fn lt(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    ordering("<", &args, Ordering::is_lt)
}

fn gt(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    ordering(">", &args, Ordering::is_gt)
}

fn le(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    ordering("<=", &args, Ordering::is_le)
}

fn ge(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    ordering(">=", &args, Ordering::is_ge)
}

// ══════════════════════════════════════════════════════════════════════════════
// Lists
// ══════════════════════════════════════════════════════════════════════════════

fn list_arg<'a>(name: &str, args: &'a [Value]) -> Result<&'a [Value], EtaError> {
    let arg = args
        .first()
        .ok_or_else(|| EtaError::malformed(format!("'{name}' expects a list")))?;
    let cells = list_cells(arg).ok_or_else(|| {
        EtaError::type_mismatch(format!(
            "'{name}' expects a list, got {arg} ({})",
            arg.type_name()
        ))
    })?;
    if cells.is_empty() {
        return Err(EtaError::malformed(format!("'{name}' of an empty list")));
    }
    Ok(cells)
}

/// The first element, as a one-element quoted list.
fn head(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(list_arg("head", &args).map(|cells| Value::quoted(cells[..1].to_vec())))
}

fn tail(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    lift(list_arg("tail", &args).map(|cells| Value::quoted(cells[1..].to_vec())))
}

fn list(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    Value::quoted(args)
}

/// Concatenate lists; a non-list argument is appended as a single element.
fn join(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    let mut joined = Expression::quoted(Vec::new());
    for arg in args {
        match arg {
            Value::Expr(expr) => joined.cells_mut().extend(expr.into_cells()),
            Value::Seq(values) => joined.cells_mut().extend(values),
            other => joined.push(other),
        }
    }
    Value::Expr(joined)
}

// ══════════════════════════════════════════════════════════════════════════════
// Evaluation & reflection
// ══════════════════════════════════════════════════════════════════════════════

/// Evaluate a quoted list as code in the caller's environment.
fn eval(env: &mut Environment<'_>, mut args: Vec<Value>) -> Value {
    match args.pop() {
        Some(Value::Expr(expr)) => evaluate(&Value::Expr(expr.with_quote(QuoteKind::Plain)), env),
        Some(other) => evaluate(&other, env),
        None => Value::NoValue,
    }
}

/// Raise a user error; strings contribute their raw text.
fn error(_env: &mut Environment<'_>, args: Vec<Value>) -> Value {
    let message = args
        .iter()
        .map(|arg| match arg {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    EtaError::user(message).into()
}

fn symbols(env: &mut Environment<'_>, _args: Vec<Value>) -> Value {
    Value::quoted(env.symbols().into_iter().map(Value::Symbol).collect())
}
