use crate::runtime::{
    data_structures::value::Value,
    error::{self, ErrorKind, ScriptError},
};
use std::{
    cell::RefCell,
    fmt::{self, Display, Formatter, Write},
    rc::Rc,
};

/// ANSI escapes used to mark the instruction about to run in a trace.
const UNDERLINE_ON: &str = "\x1b[4m";
const UNDERLINE_OFF: &str = "\x1b[24m";

/// The compiled instruction stream of a word.  Bodies are shared and grow in place while their word
/// is being defined, so they are always handled through a BodyPtr.
#[derive(Clone, Default)]
pub struct Body {
    /// The name of the word the body belongs to, or a tag for ad hoc bodies.
    pub name: String,

    /// The instruction cells.
    pub cells: Vec<Value>,
}

/// Shared, mutable handle to a Body.
pub type BodyPtr = Rc<RefCell<Body>>;

impl Body {
    /// Create a new body from a name and its cells.
    pub fn new(name: &str, cells: Vec<Value>) -> Body {
        Body {
            name: name.to_string(),
            cells,
        }
    }

    /// Create a new shared body.
    pub fn new_ptr(name: &str, cells: Vec<Value>) -> BodyPtr {
        Rc::new(RefCell::new(Body::new(name, cells)))
    }
}

/// One in-progress traversal of a Body.
#[derive(Clone)]
pub struct Frame {
    /// Identifies the frame in debug traces.
    pub id: usize,

    /// The body being walked.
    pub body: BodyPtr,

    /// Index of the next cell to run.
    pub position: usize,
}

/// The suspended frames waiting for the active frame to finish.
pub type CallStack = Vec<Frame>;

impl Display for Frame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} @ {}", self.body.borrow().name, self.position)
    }
}

impl Frame {
    /// Start a new traversal at the beginning of a body.
    pub fn new(id: usize, body: BodyPtr) -> Frame {
        Frame {
            id,
            body,
            position: 0,
        }
    }

    /// Has every cell of the body been consumed?
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.body.borrow().cells.len()
    }

    /// Read the cell at the current position without consuming it.
    pub fn operand(&self) -> error::Result<Value> {
        match self.body.borrow().cells.get(self.position) {
            Some(value) => Ok(value.clone()),
            None => ScriptError::new_as_result(
                None,
                ErrorKind::MalformedBody,
                format!("Missing operand at {}.", self),
                None,
            ),
        }
    }

    /// Step past the current cell.
    pub fn advance(&mut self) {
        self.position += 1;
    }

    /// Move the position by a relative offset.  A target outside of the body, (one past the end is
    /// allowed, it simply ends the frame,) is a malformed body.
    pub fn jump(&mut self, offset: i64) -> error::Result<()> {
        let length = self.body.borrow().cells.len() as i64;
        let target = (self.position as i64)
            .checked_add(offset)
            .filter(|target| (0..=length).contains(target));

        let Some(target) = target else {
            return ScriptError::new_as_result(
                None,
                ErrorKind::MalformedBody,
                format!("Branch from {} by {} leaves the body.", self, offset),
                None,
            );
        };

        self.position = target as usize;
        Ok(())
    }
}

/// Render a frame's body on one line with the cell about to run underlined, followed by the data
/// stack.
pub fn trace_line(frame: &Frame, stack: &[Value]) -> String {
    let body = frame.body.borrow();
    let mut result = String::with_capacity(body.cells.len() * 8);

    let _ = write!(&mut result, "[{}] {}:", frame.id, body.name);

    for (index, cell) in body.cells.iter().enumerate() {
        if index == frame.position {
            let _ = write!(&mut result, " {}{}{}", UNDERLINE_ON, cell, UNDERLINE_OFF);
        } else {
            let _ = write!(&mut result, " {}", cell);
        }
    }

    let _ = write!(&mut result, "  -- stack:");

    for value in stack {
        let _ = write!(&mut result, " {}", value);
    }

    result
}

/// Render a compiled word in colon definition form for `SEE`.
pub fn pretty_print_body(body: &Body, immediate: bool) -> String {
    let mut result = format!(": {}", body.name);

    if immediate {
        result.push_str(" IMMEDIATE");
    }

    for cell in &body.cells {
        match cell {
            Value::Text(text) => {
                let _ = write!(&mut result, " \"{}\"", text);
            }

            _ => {
                let _ = write!(&mut result, " {}", cell);
            }
        }
    }

    result.push_str(" ;");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_over(cells: Vec<Value>) -> Frame {
        Frame::new(0, Body::new_ptr("TEST", cells))
    }

    #[test]
    fn jump_may_land_one_past_the_end() {
        let mut frame = frame_over(vec![Value::Int(1), Value::Int(2)]);

        assert!(frame.jump(2).is_ok());
        assert!(frame.is_exhausted());
    }

    #[test]
    fn jump_outside_the_body_is_malformed() {
        let mut frame = frame_over(vec![Value::Int(1)]);
        let error = frame.jump(-1).unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::MalformedBody);
        assert_eq!(frame.position, 0);
    }

    #[test]
    fn jump_by_extreme_offsets_is_malformed() {
        let mut frame = frame_over(vec![Value::Int(1), Value::Int(2)]);

        frame.advance();

        for offset in [i64::MAX, i64::MIN] {
            let error = frame.jump(offset).unwrap_err();

            assert_eq!(*error.kind(), ErrorKind::MalformedBody);
            assert_eq!(frame.position, 1);
        }
    }

    #[test]
    fn trace_marks_the_current_cell() {
        let mut frame = frame_over(vec![Value::Int(1), Value::Int(2)]);

        frame.advance();

        let line = trace_line(&frame, &[Value::Int(7)]);

        assert!(line.contains("\x1b[4m2\x1b[24m"));
        assert!(line.ends_with("-- stack: 7"));
    }

    #[test]
    fn pretty_print_shows_immediate_and_literals() {
        let body = Body::new("FOO", vec![Value::Int(5), Value::Text("hi".to_string())]);

        assert_eq!(pretty_print_body(&body, true), ": FOO IMMEDIATE 5 \"hi\" ;");
    }
}
