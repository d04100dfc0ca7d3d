use crate::{
    lang::code::Body,
    runtime::data_structures::{memory::MemoryRef, value::Value},
};
use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
};

/// Index of the compile state variable.  0 is interpret, 1 is compile.
pub const STATE: usize = 0;

/// Index of the numeric radix used for literal parsing.
pub const BASE: usize = 1;

/// Index of the variable naming the word most recently created.
pub const LATEST: usize = 2;

/// Index of the append cursor into the body of the latest word.
pub const HERE: usize = 3;

/// Index of the execution trace switch.
pub const DEBUG: usize = 4;

/// Size of the scratch buffer HERE points at before the first word is created.
const SCRATCH_SIZE: usize = 100;

/// A handle to one of the interpreter's variable cells.  Handles are only created by the variable
/// list, so they always refer to a live cell.
#[derive(Clone)]
pub struct Variable {
    index: usize,
    name: Rc<str>,
}

impl PartialEq for Variable {
    fn eq(&self, other: &Variable) -> bool {
        self.index == other.index
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "Variable {}", self.name)
    }
}

impl Variable {
    /// The slot the variable occupies in the list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The name the variable was defined with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The interpreter's named scalar cells.  The first few slots are the well known interpreter state
/// variables, user variables are appended after them.
pub struct VariableList {
    cells: Vec<Value>,
    handles: Vec<Variable>,
}

impl Default for VariableList {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableList {
    /// Create the list with the interpreter state variables in their fixed slots.
    pub fn new() -> VariableList {
        let mut list = VariableList {
            cells: Vec::new(),
            handles: Vec::new(),
        };

        list.define("STATE", Value::Int(0));
        list.define("BASE", Value::Int(10));
        list.define("LATEST", Value::None);
        list.define(
            "HERE",
            Value::Ref(MemoryRef::new(
                Body::new_ptr("<scratch>", vec![Value::None; SCRATCH_SIZE]),
                0,
            )),
        );
        list.define("DEBUG", Value::Int(0));

        list
    }

    /// Add a new cell and get its handle.
    pub fn define(&mut self, name: &str, value: Value) -> Variable {
        let handle = Variable {
            index: self.cells.len(),
            name: Rc::from(name),
        };

        self.cells.push(value);
        self.handles.push(handle.clone());

        handle
    }

    /// The handle for a slot, used for the fixed state variables.
    pub fn handle(&self, index: usize) -> Option<Variable> {
        self.handles.get(index).cloned()
    }

    /// Read a snapshot of a cell.  A stored Ref comes back as a new cursor, moving it won't move
    /// the stored one.
    pub fn fetch(&self, variable: &Variable) -> Value {
        match self.cells.get(variable.index) {
            Some(Value::Ref(reference)) => Value::Ref(reference.with_address(reference.address())),
            Some(value) => value.clone(),
            None => Value::None,
        }
    }

    /// Replace the contents of a cell.
    pub fn store(&mut self, variable: &Variable, value: Value) {
        if let Some(cell) = self.cells.get_mut(variable.index) {
            *cell = value;
        }
    }

    /// How many cells are defined.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Is the interpreter compiling?
    pub fn is_compiling(&self) -> bool {
        matches!(self.cells.get(STATE), Some(Value::Int(state)) if *state != 0)
    }

    /// Switch between interpret, (0,) and compile, (1,) mode.
    pub fn set_state(&mut self, state: i64) {
        self.cells[STATE] = Value::Int(state);
    }

    /// The raw numeric base value, it's up to the parser to validate it.
    pub fn base(&self) -> Value {
        self.cells[BASE].clone()
    }

    /// Is tracing switched on?
    pub fn debug(&self) -> bool {
        self.cells[DEBUG].is_true()
    }

    /// The name of the most recently created word, if any.
    pub fn latest(&self) -> Option<String> {
        match &self.cells[LATEST] {
            Value::Text(name) => Some(name.clone()),
            _ => None,
        }
    }

    /// Record a newly created word and point HERE at the start of its body.
    pub fn set_latest(&mut self, name: &str, here: MemoryRef) {
        self.cells[LATEST] = Value::Text(name.to_string());
        self.cells[HERE] = Value::Ref(here);
    }

    /// A snapshot of the append cursor.
    pub fn here(&self) -> Value {
        match self.handles.get(HERE) {
            Some(handle) => self.fetch(handle),
            None => Value::None,
        }
    }

    /// Move the append cursor.
    pub fn set_here(&mut self, here: MemoryRef) {
        self.cells[HERE] = Value::Ref(here);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_variables_have_fixed_slots() {
        let list = VariableList::new();

        assert_eq!(list.handle(STATE).unwrap().name(), "STATE");
        assert_eq!(list.handle(BASE).unwrap().name(), "BASE");
        assert_eq!(list.handle(LATEST).unwrap().name(), "LATEST");
        assert_eq!(list.handle(HERE).unwrap().name(), "HERE");
        assert_eq!(list.handle(DEBUG).unwrap().name(), "DEBUG");
        assert!(!list.is_compiling());
        assert!(list.base() == Value::Int(10));
    }

    #[test]
    fn fetched_ref_does_not_alias_the_stored_cursor() {
        let list = VariableList::new();
        let here = list.handle(HERE).unwrap();

        let mut snapshot = match list.fetch(&here) {
            Value::Ref(reference) => reference,
            other => panic!("HERE held {}", other),
        };

        snapshot = snapshot.offset(5);

        match list.fetch(&here) {
            Value::Ref(stored) => {
                assert_eq!(stored.address(), 0);
                assert!(stored.same_buffer(&snapshot));
            }
            other => panic!("HERE held {}", other),
        }
    }

    #[test]
    fn user_variables_follow_the_state_variables() {
        let mut list = VariableList::new();
        let counter = list.define("COUNTER", Value::Int(0));

        assert_eq!(counter.index(), DEBUG + 1);

        list.store(&counter, Value::Int(3));
        assert!(list.fetch(&counter) == Value::Int(3));
        assert_eq!(counter.to_string(), "Variable COUNTER");
    }
}
