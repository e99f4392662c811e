//! Global scope.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::errors::{const_assignment, EvalError};
use crate::value::{ObjectMap, Shared, Value};

/// Names not declared by the script: natives and host-defined values.
///
/// The backing map is an ordinary object value, which is also what
/// top-level `this` evaluates to, so `this.name = v` defines a global.
pub struct GlobalScope {
    object: Shared<ObjectMap>,
    constants: FxHashSet<Rc<str>>,
}

impl GlobalScope {
    pub fn new() -> Self {
        GlobalScope {
            object: Shared::new(ObjectMap::new()),
            constants: FxHashSet::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.object.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.object.borrow().contains_key(name)
    }

    /// Define or replace a writable global.
    pub fn define(&mut self, name: &str, value: Value) {
        self.constants.remove(name);
        self.object.borrow_mut().insert(name, value);
    }

    /// Define a global that scripts cannot reassign.
    pub fn define_constant(&mut self, name: &str, value: Value) {
        let name: Rc<str> = name.into();
        self.object.borrow_mut().insert(Rc::clone(&name), value);
        self.constants.insert(name);
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains(name)
    }

    /// Script assignment to a global, creating it when absent.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), EvalError> {
        if self.constants.contains(name) {
            return Err(const_assignment(name));
        }
        self.object.borrow_mut().insert(name, value);
        Ok(())
    }

    /// The global object.
    pub fn as_value(&self) -> Value {
        Value::Object(self.object.clone())
    }

    pub fn names(&self) -> Vec<Rc<str>> {
        self.object.borrow().keys().cloned().collect()
    }
}

impl Default for GlobalScope {
    fn default() -> Self {
        Self::new()
    }
}
