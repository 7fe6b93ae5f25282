//! Chained lexical scopes.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::context::EvalContext;
use crate::eval_error::EtaError;
use crate::symbol::Symbol;
use crate::value::Value;

/// The bindings of one scope level.
///
/// Bindings sit behind an `Rc` and are copied on first write, so copying a
/// frame (as every closure invocation does) costs nothing until the copy is
/// extended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    bindings: Rc<BTreeMap<Symbol, Value>>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a binding in this frame.
    pub fn bind(&mut self, symbol: Symbol, value: Value) {
        Rc::make_mut(&mut self.bindings).insert(symbol, value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.bindings.keys()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A scope frame plus a link to the enclosing frame.
///
/// Lookups that miss locally continue along the `outer` chain. The chain is
/// made of borrows, so it is finite, acyclic and never outlives the frames
/// it points to. Bindings are only ever added or overwritten, and only in
/// the innermost frame.
#[derive(Debug)]
pub struct Environment<'outer> {
    frame: Frame,
    outer: Option<&'outer Environment<'outer>>,
    context: EvalContext,
}

impl Environment<'static> {
    /// A global environment with the default context.
    pub fn new() -> Self {
        Self::with_context(EvalContext::default())
    }

    /// A global environment with the given context.
    pub fn with_context(context: EvalContext) -> Self {
        Self {
            frame: Frame::new(),
            outer: None,
            context,
        }
    }
}

impl<'outer> Environment<'outer> {
    /// A frame nested inside `outer`, inheriting its context.
    pub fn enclose(frame: Frame, outer: &'outer Environment<'outer>) -> Self {
        Self {
            frame,
            outer: Some(outer),
            context: outer.context,
        }
    }

    pub fn context(&self) -> EvalContext {
        self.context
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Detach this frame's bindings, dropping the outer link.
    pub fn into_frame(self) -> Frame {
        self.frame
    }

    /// Bind `symbol` in this frame only.
    pub fn bind(&mut self, symbol: Symbol, value: Value) {
        self.frame.bind(symbol, value);
    }

    /// Bind a key that is only known to be a symbol at runtime.
    pub fn bind_checked(&mut self, key: &Value, value: Value) -> Result<(), EtaError> {
        match key {
            Value::Symbol(symbol) => {
                self.bind(symbol.clone(), value);
                Ok(())
            }
            other => Err(EtaError::type_mismatch(format!(
                "cannot bind a value to non-symbol {other} ({})",
                other.type_name()
            ))),
        }
    }

    /// Look up a binding, searching from this frame outward.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.frame.get(name) {
                return Some(value);
            }
            env = env.outer?;
        }
    }

    /// Like [`Environment::get`], but a miss is an unbound-symbol error value.
    pub fn lookup(&self, name: &str) -> Value {
        self.get(name)
            .cloned()
            .unwrap_or_else(|| EtaError::unbound(name).into())
    }

    /// Every symbol visible from this frame, sorted and de-duplicated.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut names: Vec<Symbol> = Vec::new();
        let mut env = Some(self);
        while let Some(current) = env {
            names.extend(current.frame.symbols().cloned());
            env = current.outer;
        }
        names.sort();
        names.dedup();
        names
    }
}

impl Default for Environment<'static> {
    fn default() -> Self {
        Self::new()
    }
}
