//! Scope runtime.
//!
//! Each function call gets an [`Activation`]: a slot array sized by the
//! function's frame layout plus the cells captured when its closure was
//! created. A slot holds its value directly until some closure captures it;
//! from then on the slot holds a shared [`Cell`] and every read and write
//! goes through that cell, so the closure and the activation see the same
//! binding.
//!
//! Globals live in a [`GlobalScope`] owned by the interpreter.

mod global;

use std::cell::RefCell;
use std::rc::Rc;

use crate::Value;

pub use global::GlobalScope;

/// Boxed binding shared between an activation and the closures that
/// captured it. `None` until the declaration runs.
#[derive(Clone, Debug, Default)]
pub struct Cell(Rc<RefCell<Option<Value>>>);

impl Cell {
    pub fn new(value: Option<Value>) -> Self {
        Cell(Rc::new(RefCell::new(value)))
    }

    pub fn get(&self) -> Option<Value> {
        self.0.borrow().clone()
    }

    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = Some(value);
    }

    pub fn is_initialized(&self) -> bool {
        self.0.borrow().is_some()
    }

    pub fn ptr_eq(&self, other: &Cell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug, Default)]
enum Slot {
    /// Declared but not yet initialized.
    #[default]
    Empty,
    Value(Value),
    Boxed(Cell),
}

/// Storage of one function invocation.
#[derive(Debug)]
pub struct Activation {
    slots: Vec<Slot>,
    captured: Rc<[Cell]>,
}

impl Activation {
    pub fn new(slot_count: usize, captured: Rc<[Cell]>) -> Self {
        Activation {
            slots: vec![Slot::Empty; slot_count],
            captured,
        }
    }

    /// Activation with no slots, used between evaluations.
    pub fn empty() -> Self {
        Activation::new(0, Rc::from(Vec::new()))
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Value of a slot; `None` before initialization.
    pub fn get(&self, slot: u32) -> Option<Value> {
        match &self.slots[slot as usize] {
            Slot::Empty => None,
            Slot::Value(value) => Some(value.clone()),
            Slot::Boxed(cell) => cell.get(),
        }
    }

    pub fn is_initialized(&self, slot: u32) -> bool {
        match &self.slots[slot as usize] {
            Slot::Empty => false,
            Slot::Value(_) => true,
            Slot::Boxed(cell) => cell.is_initialized(),
        }
    }

    /// Write a slot, through its cell if it has been captured.
    pub fn set(&mut self, slot: u32, value: Value) {
        match &mut self.slots[slot as usize] {
            Slot::Boxed(cell) => cell.set(value),
            other => *other = Slot::Value(value),
        }
    }

    /// Start a fresh binding: closures holding the old cell keep it, the
    /// slot itself becomes uninitialized.
    pub fn reset(&mut self, slot: u32) {
        self.slots[slot as usize] = Slot::Empty;
    }

    /// Move a captured slot into a new cell holding a copy of its value.
    ///
    /// `for (let ...)` does this between iterations so closures from one
    /// iteration keep that iteration's binding.
    pub fn renew(&mut self, slot: u32) {
        let entry = &mut self.slots[slot as usize];
        if let Slot::Boxed(cell) = entry {
            *entry = Slot::Boxed(Cell::new(cell.get()));
        }
    }

    /// The cell behind a slot, boxing the slot on first capture.
    pub fn capture(&mut self, slot: u32) -> Cell {
        let entry = &mut self.slots[slot as usize];
        match entry {
            Slot::Boxed(cell) => cell.clone(),
            Slot::Empty => {
                let cell = Cell::new(None);
                *entry = Slot::Boxed(cell.clone());
                cell
            }
            Slot::Value(value) => {
                let cell = Cell::new(Some(std::mem::take(value)));
                *entry = Slot::Boxed(cell.clone());
                cell
            }
        }
    }

    /// A cell this activation's closure captured.
    #[inline]
    pub fn captured(&self, index: u32) -> &Cell {
        &self.captured[index as usize]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap expected failures")]
mod tests;
