//! The interpreter facade: one global environment, populated with builtins,
//! constants and the prelude, that successive sources are executed against.

use eta_parser::read;
use eta_types::{EvalContext, Environment, SourceFile, Symbol, SyntaxErrors, Value};
use thiserror::Error;

use crate::evaluator::evaluate;
use crate::stdlib::{install_builtins, install_constants};

/// List and logic helpers written in Eta itself, loaded into every
/// interpreter after the builtins.
pub const PRELUDE: &str = r#"
; logic
(defun (not x) (if x #f #t))

; lists
(define nil '())
(defun (empty xs) (== xs nil))
(defun (fst xs) (eval (head xs)))
(defun (len xs)
  (if (empty xs) 0 (+ 1 (len (tail xs)))))
(defun (drop n xs)
  (if (or (<= n 0) (empty xs)) xs (drop (- n 1) (tail xs))))
(defun (foldl f acc xs)
  (if (empty xs) acc (foldl f (f acc (fst xs)) (tail xs))))
(defun (map f xs)
  (if (empty xs)
      nil
      (join (list (f (fst xs))) (map f (tail xs)))))
(defun (filter p xs)
  (if (empty xs)
      nil
      (join (if (p (fst xs)) (list (fst xs)) nil) (filter p (tail xs)))))

; quicksort; the let binds pivot in the calling frame, where the
; comparison lambdas find it
(defun (sort xs)
  (if (empty xs)
      nil
      ((let (pivot (fst xs)) (rest (tail xs)))
       (join (sort (filter (lambda (y) (< y pivot)) rest))
             (list pivot)
             (sort (filter (lambda (y) (>= y pivot)) rest))))))

; numbers
(defun (odd n) (== (% n 2) 1))
(defun (even n) (== (% n 2) 0))
"#;

/// Errors that stop a source from being executed at all.
///
/// Evaluation failures are not among them: those are [`Value::Error`]
/// results.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("{0}")]
    Syntax(SyntaxErrors),
}

/// A session: the global environment plus the operations to run code in it.
pub struct Interpreter {
    env: Environment<'static>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_context(EvalContext::default())
    }

    /// An interpreter configured from the `ETA_TRACE` environment variable.
    pub fn from_env() -> Self {
        Self::with_context(EvalContext::from_env())
    }

    pub fn with_context(context: EvalContext) -> Self {
        let mut env = Environment::with_context(context);
        install_builtins(&mut env);
        install_constants(&mut env);
        let mut interpreter = Self { env };
        interpreter.load_prelude();
        interpreter
    }

    fn load_prelude(&mut self) {
        match self.execute_named("prelude", PRELUDE) {
            Ok(Value::Error(err)) => tracing::error!(%err, "prelude evaluation failed"),
            Ok(_) => tracing::debug!(bindings = self.env.frame().len(), "prelude loaded"),
            Err(err) => tracing::error!(%err, "prelude failed to parse"),
        }
    }

    /// Read `source` and evaluate every top-level form in the global frame.
    ///
    /// The result is the no-value sentinel if every form was a definition,
    /// the single remaining result, or a sequence of the remaining results.
    pub fn execute(&mut self, source: &str) -> Result<Value, InterpreterError> {
        self.execute_named("<input>", source)
    }

    fn execute_named(&mut self, name: &str, source: &str) -> Result<Value, InterpreterError> {
        let source_file = SourceFile::new(name, source);
        let parsed = read(&source_file);
        if parsed.errors.has_errors() {
            return Err(InterpreterError::Syntax(parsed.errors));
        }
        if parsed.program.is_empty() {
            return Ok(Value::NoValue);
        }
        let result = evaluate(&Value::Seq(parsed.program), &mut self.env);
        Ok(without_sentinels(result))
    }

    /// Bind `name` in the global frame.
    pub fn add_binding(&mut self, name: &str, value: Value) {
        self.env.bind(Symbol::new(name), value);
    }

    pub fn env(&self) -> &Environment<'static> {
        &self.env
    }

    pub fn context(&self) -> EvalContext {
        self.env.context()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn without_sentinels(result: Value) -> Value {
    match result {
        Value::Seq(values) => {
            let mut kept: Vec<Value> = values.into_iter().filter(|v| !v.is_no_value()).collect();
            match kept.len() {
                0 => Value::NoValue,
                1 => kept.swap_remove(0),
                _ => Value::Seq(kept),
            }
        }
        other => other,
    }
}
