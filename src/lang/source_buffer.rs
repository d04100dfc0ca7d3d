use std::{ fmt::{ self,
                  Display,
                  Formatter },
           fs::File,
           hash::{ Hash,
                   Hasher },
           io::{ stdin,
                 stdout,
                 BufRead,
                 BufReader,
                 Cursor,
                 Write },
           path::Path };
use crate::runtime::error::{ self,
                             ErrorKind,
                             ScriptError };



/// The location in the program text where the interpreter is currently reading.  This is used
/// extensively in the error reporting.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, PartialOrd, Eq, Debug)]
pub struct SourceLocation
{
    /// Either the path to the file or a description of the source.  For example text typed at
    /// the terminal will have a tag of "\<stdin\>".
    path: String,

    /// The 1 based line number in the source.
    line: usize,

    /// The 1 based column number of the character most recently read, 0 before the first
    /// character of a line.
    column: usize
}


impl Hash for SourceLocation
{
    fn hash<H: Hasher>(&self, state: &mut H)
    {
        self.path.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}


/// Used for error reporting to show where in the source an error originated.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error>
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


impl Default for SourceLocation
{
    fn default() -> Self
    {
        Self::new()
    }
}


impl SourceLocation
{
    /// Crate a new SourceLocation with default values.
    pub fn new() -> SourceLocation
    {
        SourceLocation { path: "unspecified".to_string(), line: 0, column: 1 }
    }

    /// Create a new SourceLocation for the beginning of the named source.  The line is 0 until the
    /// first line has been read.
    pub fn new_from_path(path: &str) -> Self
    {
        SourceLocation { path: path.to_owned(), line: 0, column: 0 }
    }

    /// Create a new SourceLocation with all of the needed information.
    pub fn new_from_info(path: &str, line: usize, column: usize) -> Self
    {
        SourceLocation { path: path.to_owned(), line, column }
    }

    /// The path to the source or a meaningful description of it.
    pub fn path(&self) -> &String
    {
        &self.path
    }

    /// The 1 based line number in the source.
    pub fn line(&self) -> usize
    {
        self.line
    }

    /// The 1 based column number in the source.
    pub fn column(&self) -> usize
    {
        self.column
    }

    /// A new line was read, reset the column.
    fn next_line(&mut self)
    {
        self.line += 1;
        self.column = 0;
    }

    fn next_column(&mut self)
    {
        self.column += 1;
    }
}



/// Create a SourceLocation for the current spot in the Rust source.  Used to tag native words with
/// where they were registered.
#[macro_export]
macro_rules! location_here
{
    () =>
    {
        $crate::lang::source_buffer::SourceLocation::new_from_info(file!(),
                                                                   line!() as usize,
                                                                   column!() as usize)
    };
}



/// Is the process's standard input attached to a terminal?  Only then is the interactive prompt
/// shown.
#[cfg(unix)]
pub fn stdin_is_terminal() -> bool
{
    // SAFETY: isatty only inspects the descriptor and has no other side effects.
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}


#[cfg(not(unix))]
pub fn stdin_is_terminal() -> bool
{
    use std::io::IsTerminal;

    stdin().is_terminal()
}



/// One place program text can come from.  Text is read from it a line at a time.
pub struct InputSource
{
    /// Where the reading cursor currently is.
    location: SourceLocation,

    /// The underlying line reader.
    reader: Box<dyn BufRead>,

    /// Should a prompt be printed before each line is read?
    prompt: bool
}


impl InputSource
{
    /// The process's standard input.  This is the usual primary source.
    pub fn stdin() -> InputSource
    {
        InputSource
            {
                location: SourceLocation::new_from_path("<stdin>"),
                reader: Box::new(BufReader::new(stdin())),
                prompt: stdin_is_terminal()
            }
    }

    /// Open a source file for reading.
    pub fn from_file(path: &Path) -> error::Result<InputSource>
    {
        let file = match File::open(path)
            {
                Ok(file) => file,
                Err(err) =>
                    {
                        return ScriptError::new_as_result(None,
                                                          ErrorKind::Io,
                                                          format!("Could not open {}: {}.",
                                                                  path.display(),
                                                                  err),
                                                          None);
                    }
            };

        Ok(InputSource
            {
                location: SourceLocation::new_from_path(&path.to_string_lossy()),
                reader: Box::new(BufReader::new(file)),
                prompt: false
            })
    }

    /// Read from an in memory block of text.
    pub fn from_text(name: &str, text: &str) -> InputSource
    {
        InputSource
            {
                location: SourceLocation::new_from_path(name),
                reader: Box::new(Cursor::new(text.as_bytes().to_vec())),
                prompt: false
            }
    }

    /// Where reading is at within this source.
    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    /// Read the next line without its line terminator, or None at the end of the source.
    fn read_line(&mut self) -> error::Result<Option<String>>
    {
        if self.prompt
        {
            print!("? ");
            stdout().flush()?;
        }

        let mut line = String::new();

        if self.reader.read_line(&mut line)? == 0
        {
            return Ok(None);
        }

        let trimmed_length = line.trim_end_matches([ '\n', '\r' ]).len();

        line.truncate(trimmed_length);
        self.location.next_line();

        Ok(Some(line))
    }
}



/// The stack of input sources the `key` primitive pulls characters from.  The bottom most source is
/// the primary one, when it is exhausted the input as a whole is at an end.  Sources pushed on top
/// of it, (for example loaded files,) fall back to the source below them once exhausted.
///
/// Characters are handed out one line at a time.  Each line is followed by a single '\n', even if
/// the source didn't end the line with one.
pub struct SourceBuffer
{
    /// The primary source.
    primary: InputSource,

    /// Sources stacked on top of the primary one, the last is the active source.
    nested: Vec<InputSource>,

    /// The characters of the line currently being consumed.  None when a new line needs to be
    /// read.
    line: Option<Vec<char>>,

    /// Index of the next character to hand out from the current line.
    position: usize
}


impl SourceBuffer
{
    /// Create a new SourceBuffer over a primary source.
    pub fn new(primary: InputSource) -> SourceBuffer
    {
        SourceBuffer
            {
                primary,
                nested: Vec::new(),
                line: None,
                position: 0
            }
    }

    /// Make a new source the active one.  Whatever is left of the current line is still consumed
    /// first.
    pub fn push_source(&mut self, source: InputSource)
    {
        tracing::debug!(source = %source.location().path(), "switching input source");
        self.nested.push(source);
    }

    /// How many sources are stacked on top of the primary one.
    pub fn depth(&self) -> usize
    {
        self.nested.len()
    }

    /// The location the cursor is at in the active source.
    pub fn location(&self) -> &SourceLocation
    {
        match self.nested.last()
        {
            Some(source) => source.location(),
            None         => self.primary.location()
        }
    }

    /// Throw away the rest of the current line.  Used when recovering from an error so that the
    /// remains of a broken line aren't interpreted.
    pub fn discard_line(&mut self)
    {
        self.line = None;
        self.position = 0;
    }

    /// Get and consume the next character of input.  When the primary source is exhausted an
    /// EndOfInput error is returned.
    pub fn next_char(&mut self) -> error::Result<char>
    {
        loop
        {
            if let Some(line) = &self.line
            {
                if self.position < line.len()
                {
                    let next = line[self.position];

                    self.position += 1;
                    self.active_mut().location.next_column();

                    return Ok(next);
                }

                self.discard_line();
                return Ok('\n');
            }

            match self.active_mut().read_line()?
            {
                Some(text) =>
                    {
                        self.line = Some(text.chars().collect());
                        self.position = 0;
                    },

                None =>
                    {
                        match self.nested.pop()
                        {
                            Some(finished) =>
                                {
                                    tracing::info!(source = %finished.location().path(),
                                                   "input source exhausted, resuming previous source");
                                },

                            None =>
                                {
                                    return ScriptError::new_as_result(Some(self.location().clone()),
                                                                      ErrorKind::EndOfInput,
                                                                      "End of input.".to_string(),
                                                                      None);
                                }
                        }
                    }
            }
        }
    }

    /// Internal use only.  The source currently being read from.
    fn active_mut(&mut self) -> &mut InputSource
    {
        match self.nested.last_mut()
        {
            Some(source) => source,
            None         => &mut self.primary
        }
    }
}



#[cfg(test)]
mod tests
{
    use super::*;

    fn drain(buffer: &mut SourceBuffer) -> String
    {
        let mut text = String::new();

        while let Ok(next) = buffer.next_char()
        {
            text.push(next);
        }

        text
    }

    #[test]
    fn every_line_ends_with_a_newline()
    {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<test>", "ab\r\ncd"));

        assert_eq!(drain(&mut buffer), "ab\ncd\n");
    }

    #[test]
    fn end_of_primary_source_is_end_of_input()
    {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<test>", ""));
        let error = buffer.next_char().unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::EndOfInput);
    }

    #[test]
    fn exhausted_nested_source_falls_back_to_previous()
    {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<primary>", "2"));

        buffer.push_source(InputSource::from_text("<nested>", "1"));

        assert_eq!(buffer.depth(), 1);
        assert_eq!(drain(&mut buffer), "1\n2\n");
        assert_eq!(buffer.depth(), 0);
    }

    #[test]
    fn locations_track_lines_and_columns()
    {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<test>", "x\nyz"));

        for _ in 0..4
        {
            let _ = buffer.next_char();
        }

        assert_eq!(buffer.location().path(), "<test>");
        assert_eq!(buffer.location().line(), 2);
        assert_eq!(buffer.location().column(), 2);
    }
}
