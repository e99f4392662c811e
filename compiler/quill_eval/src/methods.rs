//! Built-in methods looked up by receiver kind.
//!
//! A property read that finds no data property falls back to this table:
//! `"abc".toUpperCase` is the string method `toUpperCase` with `"abc"`
//! attached as its receiver.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::{FunctionValue, NativeFunction};
use crate::Value;

/// Runtime kind a method applies to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ReceiverKind {
    String,
    Array,
    Object,
    Number,
    Boolean,
    Function,
}

impl ReceiverKind {
    pub fn of(value: &Value) -> Option<ReceiverKind> {
        match value {
            Value::Undefined | Value::Null => None,
            Value::Bool(_) => Some(ReceiverKind::Boolean),
            Value::Number(_) => Some(ReceiverKind::Number),
            Value::String(_) => Some(ReceiverKind::String),
            Value::Array(_) => Some(ReceiverKind::Array),
            Value::Object(_) => Some(ReceiverKind::Object),
            Value::Function(_) => Some(ReceiverKind::Function),
        }
    }
}

#[derive(Default)]
pub struct MethodTable {
    methods: FxHashMap<ReceiverKind, FxHashMap<Rc<str>, FunctionValue>>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the native's own name, replacing any earlier entry.
    pub fn register(&mut self, kind: ReceiverKind, native: NativeFunction) {
        let name: Rc<str> = native.name().into();
        self.methods
            .entry(kind)
            .or_default()
            .insert(name, FunctionValue::native(native));
    }

    pub fn lookup(&self, kind: ReceiverKind, name: &str) -> Option<&FunctionValue> {
        self.methods.get(&kind)?.get(name)
    }

    /// Method names for `kind`, sorted.
    pub fn names(&self, kind: ReceiverKind) -> Vec<Rc<str>> {
        let mut names: Vec<Rc<str>> = self
            .methods
            .get(&kind)
            .map(|methods| methods.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}
