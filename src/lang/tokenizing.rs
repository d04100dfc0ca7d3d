use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::{data_structures::value::Value, error},
};

/// Check if the given character is considered whitespace.
pub fn is_whitespace(next: &char) -> bool {
    next.is_whitespace()
}

/// Throw away characters up to and including the end of the current line.
fn skip_line_comment(buffer: &mut SourceBuffer) -> error::Result<()> {
    while buffer.next_char()? != '\n' {}

    Ok(())
}

/// Read the next whitespace delimited word from the input.  Leading whitespace is skipped and a
/// backslash at the start of a word comments out the rest of the line.  Every line ends in a
/// newline so a word never spans the end of the input.
///
/// The location returned is where the word started.
pub fn next_word(buffer: &mut SourceBuffer) -> error::Result<(SourceLocation, String)> {
    let mut text = String::new();
    let mut location = buffer.location().clone();

    loop {
        let next = buffer.next_char()?;

        if is_whitespace(&next) {
            if text.is_empty() {
                continue;
            }

            break;
        }

        if text.is_empty() {
            if next == '\\' {
                skip_line_comment(buffer)?;
                continue;
            }

            location = buffer.location().clone();
        }

        text.push(next);
    }

    Ok((location, text))
}

/// Convert the value of the BASE variable to a radix usable for parsing.
pub fn to_radix(base: &Value) -> Option<u32> {
    match base {
        Value::Int(radix) if (2..=36).contains(radix) => Some(*radix as u32),
        _ => None,
    }
}

/// Attempt to convert a word into an integer in the given radix.  A leading sign is allowed.
pub fn to_numeric(text: &str, radix: u32) -> Option<i64> {
    if text.is_empty() {
        return None;
    }

    i64::from_str_radix(text, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lang::source_buffer::InputSource, runtime::error::ErrorKind};
    use test_case::test_case;

    fn words_of(text: &str) -> Vec<String> {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<test>", text));
        let mut words = Vec::new();

        while let Ok((_, word)) = next_word(&mut buffer) {
            words.push(word);
        }

        words
    }

    #[test]
    fn words_are_split_on_any_whitespace() {
        assert_eq!(words_of("  : SQUARE\tDUP *  ;\n\n7 SQUARE"), [":", "SQUARE", "DUP", "*", ";", "7", "SQUARE"]);
    }

    #[test]
    fn backslash_comments_run_to_end_of_line() {
        assert_eq!(words_of("1 \\ 2 3\n4 \\\n5"), ["1", "4", "5"]);
    }

    #[test]
    fn backslash_inside_a_word_is_kept() {
        assert_eq!(words_of("A\\B"), ["A\\B"]);
    }

    #[test]
    fn end_of_input_is_reported() {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<test>", "   \n  "));
        let error = next_word(&mut buffer).unwrap_err();

        assert_eq!(*error.kind(), ErrorKind::EndOfInput);
    }

    #[test]
    fn word_location_is_its_first_character() {
        let mut buffer = SourceBuffer::new(InputSource::from_text("<test>", "\n   DUP"));
        let (location, _) = next_word(&mut buffer).unwrap();

        assert_eq!(location.line(), 2);
        assert_eq!(location.column(), 4);
    }

    #[test_case("42", 10, Some(42) ; "decimal")]
    #[test_case("-17", 10, Some(-17) ; "negative")]
    #[test_case("ff", 16, Some(255) ; "hexadecimal")]
    #[test_case("101", 2, Some(5) ; "binary")]
    #[test_case("12x4", 10, None ; "malformed")]
    #[test_case("2", 2, None ; "digit out of range")]
    #[test_case("-", 10, None ; "lone sign")]
    fn numbers_parse_in_the_current_base(text: &str, radix: u32, expected: Option<i64>) {
        assert_eq!(to_numeric(text, radix), expected);
    }

    #[test]
    fn only_sensible_bases_are_accepted() {
        assert_eq!(to_radix(&Value::Int(16)), Some(16));
        assert_eq!(to_radix(&Value::Int(1)), None);
        assert_eq!(to_radix(&Value::Int(37)), None);
        assert_eq!(to_radix(&Value::None), None);
    }
}
