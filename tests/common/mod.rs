// Shared helpers for the integration tests.  Not every test file uses every helper.
#![allow(dead_code)]

use forthvm::lang::source_buffer::InputSource;
use forthvm::runtime::built_ins::register_builtin_words;
use forthvm::runtime::data_structures::value::Value;
use forthvm::runtime::error::Result;
use forthvm::runtime::interpreter::forth_interpreter::ForthInterpreter;
use forthvm::runtime::interpreter::{CodeManagement, InterpreterStack};
use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

/// An output stream the test can read back after the interpreter has written to it.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
    flushes: Rc<Cell<usize>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    /// How many times the stream has been flushed.
    pub fn flushes(&self) -> usize {
        self.flushes.get()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes.set(self.flushes.get() + 1);
        Ok(())
    }
}

/// An interpreter with every built-in word and the prelude, reading from the given text and
/// writing to a buffer the test can inspect.
pub fn new_interpreter(input: &str) -> (ForthInterpreter, SharedBuffer) {
    let output = SharedBuffer::default();
    let mut interp = ForthInterpreter::new(
        InputSource::from_text("<test input>", input),
        Box::new(output.clone()),
    );

    register_builtin_words(&mut interp).unwrap();

    (interp, output)
}

/// The data stack as integers.  Panics on anything else, the tests using this only expect numbers.
pub fn int_stack(interp: &ForthInterpreter) -> Vec<i64> {
    interp
        .stack()
        .iter()
        .map(|value| match value {
            Value::Int(number) => *number,
            other => panic!("expected an integer on the stack, found {:?}", other),
        })
        .collect()
}

/// Push the initial stack, evaluate the code, and hand back the resulting stack.
pub fn eval_and_stack(code: &str, init_stack: &[i64]) -> Result<Vec<i64>> {
    let (mut interp, _) = new_interpreter("");

    for &v in init_stack {
        interp.push(Value::from(v));
    }

    interp.evaluate("<test>", code)?;
    Ok(int_stack(&interp))
}

/// Evaluate the code and return the interpreter along with everything it printed.
pub fn eval_with_output(code: &str) -> Result<(ForthInterpreter, String)> {
    let (mut interp, output) = new_interpreter("");

    interp.evaluate("<test>", code)?;

    let printed = output.contents();
    Ok((interp, printed))
}
