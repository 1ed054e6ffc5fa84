// ABOUTME: Lexically-scoped variable bindings with parent-chain lookup

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single scope frame. Child frames hold an `Rc` to their parent so a
/// closure captured from an inner scope keeps the whole chain alive after
/// the function that created it returns (spec.md §4.4).
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// A new global environment with no parent.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// A child environment enclosing `parent` — used for function call
    /// frames and block scopes that should see, but not mutate, the
    /// enclosing bindings.
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds `name` in this frame only. `let` always writes to the local
    /// frame — there is no assignment-through-enclosure (spec.md §4.4).
    pub fn set(&self, name: String, value: Value) {
        self.bindings.borrow_mut().insert(name, value);
    }

    /// Looks up `name` in this frame, then walks outward through parents.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        match &self.parent {
            Some(parent) => parent.get(name),
            None => None,
        }
    }
}
