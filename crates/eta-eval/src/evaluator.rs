//! Core evaluator: applicative-order reduction of [`Value`] nodes.
//!
//! Every function here returns a [`Value`]; failures are [`Value::Error`]
//! values that are handed back unchanged as soon as they appear.

use eta_types::{first_error, Builtin, Definition, Environment, EtaError, Expression, IfExpr, Lambda, Value};

/// `tracing` target for evaluation events.
pub const TRACE_TARGET: &str = "eta::eval";

// ══════════════════════════════════════════════════════════════════════════════
// Dispatch
// ══════════════════════════════════════════════════════════════════════════════

/// Evaluate a node against an environment.
pub fn evaluate(node: &Value, env: &mut Environment<'_>) -> Value {
    match node {
        Value::Seq(nodes) => eval_sequence(nodes, env),
        Value::Symbol(symbol) => env.lookup(symbol.as_str()),
        Value::Definition(definition) => eval_definition(definition, env),
        Value::And(operands) => eval_logical(Logical::And, operands, env),
        Value::Or(operands) => eval_logical(Logical::Or, operands, env),
        Value::If(if_expr) => eval_if(if_expr, env),
        Value::Expr(expr) if expr.is_plain() => eval_s_expr(expr, env),
        Value::Int(_)
        | Value::Float(_)
        | Value::Bool(_)
        | Value::Str(_)
        | Value::Expr(_)
        | Value::Lambda(_)
        | Value::Builtin(_)
        | Value::Error(_)
        | Value::NoValue => node.clone(),
    }
}

/// Evaluate each node in order.
///
/// No nodes gives the empty expression, one node gives its value, and more
/// give a sequence of every result, sentinels included.
pub fn eval_sequence(nodes: &[Value], env: &mut Environment<'_>) -> Value {
    let results: Vec<Value> = nodes.iter().map(|node| evaluate(node, env)).collect();
    collapse(results)
}

fn collapse(mut values: Vec<Value>) -> Value {
    match values.len() {
        0 => Value::Expr(Expression::empty()),
        1 => values.swap_remove(0),
        _ => Value::Seq(values),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// S-expressions
// ══════════════════════════════════════════════════════════════════════════════

fn eval_s_expr(expr: &Expression, env: &mut Environment<'_>) -> Value {
    trace(env, "s-expression", expr);
    match expr.cells() {
        [] => Value::Expr(expr.clone()),
        [single] => match evaluate(single, env) {
            Value::Builtin(builtin) if builtin.takes_no_arguments() => {
                call_builtin(&builtin, Vec::new(), env)
            }
            value => value,
        },
        cells => {
            let mut values = cells
                .iter()
                .map(|cell| evaluate(cell, env))
                .filter(|value| !value.is_no_value());
            let Some(head) = values.next() else {
                return Value::NoValue;
            };
            match head {
                Value::Lambda(lambda) => {
                    let args: Vec<Value> = values.collect();
                    if let Some(err) = first_error(&args) {
                        return err.clone();
                    }
                    apply_lambda(&lambda, args, env)
                }
                Value::Builtin(builtin) => {
                    let args = values.collect();
                    call_builtin(&builtin, args, env)
                }
                data => {
                    let items: Vec<Value> = std::iter::once(data).chain(values).collect();
                    match first_error(&items) {
                        Some(err) => err.clone(),
                        None => collapse(items),
                    }
                }
            }
        }
    }
}

fn call_builtin(builtin: &Builtin, args: Vec<Value>, env: &mut Environment<'_>) -> Value {
    if env.context().trace {
        tracing::debug!(
            target: TRACE_TARGET,
            builtin = builtin.name(),
            args = args.len(),
            "call"
        );
    }
    builtin.call(env, args)
}

// ══════════════════════════════════════════════════════════════════════════════
// Closures
// ══════════════════════════════════════════════════════════════════════════════

/// Apply a closure to `args`, with `caller` as the outer scope of the call.
///
/// Supplying every formal evaluates the body. Supplying fewer returns a new
/// closure over the bound prefix that waits for the rest. Supplying more is
/// an arity error and leaves `lambda` untouched.
pub fn apply_lambda(lambda: &Lambda, args: Vec<Value>, caller: &Environment<'_>) -> Value {
    let (expected, supplied) = (lambda.arity(), args.len());
    if supplied > expected {
        return EtaError::arity(format!(
            "{lambda} takes {expected} argument{}, got {supplied}",
            if expected == 1 { "" } else { "s" }
        ))
        .into();
    }
    trace(caller, "apply", lambda);

    let mut scope = Environment::enclose(lambda.captured().clone(), caller);
    let (bound, remaining) = lambda.formals().split_at(supplied);
    for (formal, arg) in bound.iter().zip(args) {
        scope.bind(formal.clone(), arg);
    }

    if remaining.is_empty() {
        evaluate(lambda.body(), &mut scope)
    } else {
        Lambda::with_frame(remaining.to_vec(), lambda.body_rc(), scope.into_frame()).into()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Special forms
// ══════════════════════════════════════════════════════════════════════════════

fn eval_definition(definition: &Definition, env: &mut Environment<'_>) -> Value {
    trace(env, "define", &definition.symbol);
    let value = evaluate(&definition.value, env);
    if value.is_error() {
        return value;
    }
    env.bind(definition.symbol.clone(), value);
    Value::NoValue
}

fn eval_if(if_expr: &IfExpr, env: &mut Environment<'_>) -> Value {
    trace(env, "if", &if_expr.clause);
    match evaluate(&if_expr.clause, env) {
        Value::Bool(true) => evaluate(&if_expr.then_branch, env),
        Value::Bool(false) => evaluate(&if_expr.else_branch, env),
        err @ Value::Error(_) => err,
        other => EtaError::type_mismatch(format!(
            "'if' clause must be a boolean, got {other} ({})",
            other.type_name()
        ))
        .into(),
    }
}

#[derive(Clone, Copy)]
enum Logical {
    And,
    Or,
}

impl Logical {
    fn name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// The operand value that decides the whole form.
    fn deciding(self) -> bool {
        matches!(self, Self::Or)
    }
}

/// Left-to-right, stopping at the first deciding boolean or error.
fn eval_logical(op: Logical, operands: &[Value], env: &mut Environment<'_>) -> Value {
    if env.context().trace {
        let node = match op {
            Logical::And => Value::And(operands.to_vec()),
            Logical::Or => Value::Or(operands.to_vec()),
        };
        trace(env, op.name(), &node);
    }
    for operand in operands {
        match evaluate(operand, env) {
            Value::Bool(b) if b == op.deciding() => return Value::Bool(b),
            Value::Bool(_) => {}
            err @ Value::Error(_) => return err,
            other => {
                return EtaError::type_mismatch(format!(
                    "'{}' operand must be a boolean, got {other} ({})",
                    op.name(),
                    other.type_name()
                ))
                .into()
            }
        }
    }
    Value::Bool(!op.deciding())
}

// ── Tracing ──────────────────────────────────────────────────────────────────

fn trace(env: &Environment<'_>, step: &'static str, node: &dyn std::fmt::Display) {
    if env.context().trace {
        tracing::debug!(target: TRACE_TARGET, step, node = %node);
    }
}
