//! Goroutine header parsing.
//!
//! Possible formats:
//!
//! ```text
//! goroutine 0 [idle]:
//! goroutine 1 [chan receive, 30 minutes]:
//! goroutine 17 [syscall, 31 minutes, locked to thread]:
//! goroutine 34 [syscall, locked to thread]:
//! ```

use super::frame::parse_digits;
use super::schema::{Goroutine, LineKind, ParseWarning};
use crate::utils::config::{GOROUTINE_KEYWORD, LOCKED_TO_THREAD, WAIT_TIME_SUFFIX};
use crate::utils::error::ParseError;

/// Field index of the state inside the brackets; later state fields follow it
const STATE_FIELD: usize = 3;

/// Does this line open a goroutine block?
pub fn is_goroutine_line(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|word| word.eq_ignore_ascii_case(GOROUTINE_KEYWORD))
}

/// Parse a goroutine header into a goroutine without frames
///
/// **Public** - used by the snapshot parser
///
/// # Returns
/// The goroutine shell and every recoverable anomaly found on the line
///
/// # Errors
/// * `ParseError::NotGoroutineLine` - first word is not `goroutine`
/// * `ParseError::InvalidGoroutineId` - id is not an unsigned integer
/// * `ParseError::MissingStateInfo` - no `[...]` block, or it is empty
/// * `ParseError::InvalidWaitTime` - wait time does not fit in a `u64`
pub fn parse_goroutine_line(line: &str) -> Result<(Goroutine, Vec<ParseWarning>), ParseError> {
    let mut warnings = Vec::new();

    let (keyword, rest) = split_first_word(line.trim());
    if !keyword.eq_ignore_ascii_case(GOROUTINE_KEYWORD) {
        return Err(ParseError::NotGoroutineLine(keyword.to_string()));
    }

    let (id_text, rest) = split_first_word(rest);
    let id = parse_digits(id_text)
        .ok_or_else(|| ParseError::InvalidGoroutineId(id_text.to_string()))?;

    let (open, close) = match (rest.find('['), rest.find(']')) {
        (Some(open), Some(close)) if close >= open + 2 => (open, close),
        _ => return Err(ParseError::MissingStateInfo),
    };

    let before = rest[..open].trim();
    if !before.is_empty() {
        warnings.push(goroutine_warning(
            STATE_FIELD,
            format!("extra fields found before state info: '{}'", before),
        ));
    }

    let mut goroutine = Goroutine::new(id, "");

    for (index, raw) in rest[open + 1..close].split(',').enumerate() {
        let field = raw.trim();
        let field_number = STATE_FIELD + index;

        if index == 0 {
            if field.is_empty() {
                return Err(ParseError::MissingStateInfo);
            }
            goroutine.state = field.to_string();
        } else if field == LOCKED_TO_THREAD {
            goroutine.locked_to_thread = true;
        } else if let Some(minutes) = wait_time_digits(field) {
            goroutine.wait_minutes = minutes.parse().map_err(|_| ParseError::InvalidWaitTime {
                field: field_number,
                value: minutes.to_string(),
            })?;
        } else {
            warnings.push(goroutine_warning(
                field_number,
                format!("unknown field found in state info: '{}'", field),
            ));
        }
    }

    let trailing = rest[close + 1..].trim();
    if !trailing.is_empty() && trailing != ":" {
        warnings.push(goroutine_warning(0, format!("extra fields found: '{}'", trailing)));
    }

    Ok((goroutine, warnings))
}

/// Digits of a `<n> minutes` state field, if the field has that shape
///
/// **Private** - internal helper for parse_goroutine_line
fn wait_time_digits(field: &str) -> Option<&str> {
    field
        .strip_suffix(WAIT_TIME_SUFFIX)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Split off the first whitespace-delimited word
///
/// **Private** - internal helper for parse_goroutine_line
fn split_first_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn goroutine_warning(field: usize, message: String) -> ParseWarning {
    ParseWarning::new(LineKind::Goroutine, field, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_without_wait_time() {
        let (goroutine, warnings) = parse_goroutine_line("goroutine 6 [chan receive]:").unwrap();
        assert_eq!(goroutine.id, 6);
        assert_eq!(goroutine.state, "chan receive");
        assert_eq!(goroutine.wait_minutes, 0);
        assert!(!goroutine.locked_to_thread);
        assert!(goroutine.frames.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_good_with_wait_time() {
        let (goroutine, warnings) =
            parse_goroutine_line("goroutine 12 [select, 30 minutes]:").unwrap();
        assert_eq!(goroutine.id, 12);
        assert_eq!(goroutine.state, "select");
        assert_eq!(goroutine.wait_minutes, 30);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_good_locked_to_thread_without_wait_time() {
        let (goroutine, warnings) =
            parse_goroutine_line("goroutine 1034 [syscall, locked to thread]:").unwrap();
        assert_eq!(goroutine.id, 1034);
        assert_eq!(goroutine.state, "syscall");
        assert_eq!(goroutine.wait_minutes, 0);
        assert!(goroutine.locked_to_thread);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_good_locked_to_thread_with_wait_time() {
        let (goroutine, warnings) =
            parse_goroutine_line("goroutine 5555 [IO wait, 240 minutes, locked to thread]:")
                .unwrap();
        assert_eq!(goroutine.state, "IO wait");
        assert_eq!(goroutine.wait_minutes, 240);
        assert!(goroutine.locked_to_thread);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let (goroutine, _) = parse_goroutine_line("Goroutine 3 [idle]:").unwrap();
        assert_eq!(goroutine.id, 3);
    }

    #[test]
    fn test_bad_not_goroutine() {
        let err = parse_goroutine_line("blah 12 [select, 30 minutes]:").unwrap_err();
        assert_eq!(err, ParseError::NotGoroutineLine("blah".to_string()));
        assert_eq!(err.field(), 1);
    }

    #[test]
    fn test_bad_non_numeric_id() {
        let err = parse_goroutine_line("goroutine #49 [chan receive]:").unwrap_err();
        assert_eq!(err.field(), 2);
    }

    #[test]
    fn test_bad_no_state() {
        let err = parse_goroutine_line("goroutine 22 something else here:").unwrap_err();
        assert_eq!(err, ParseError::MissingStateInfo);
        assert_eq!(err.field(), 3);

        assert!(parse_goroutine_line("goroutine 22 []:").is_err());
        assert!(parse_goroutine_line("goroutine 22 ] [x:").is_err());
    }

    #[test]
    fn test_bad_wait_time_overflow() {
        let err =
            parse_goroutine_line("goroutine 2 [select, 99999999999999999999999 minutes]:")
                .unwrap_err();
        assert_eq!(err.field(), 4);
    }

    #[test]
    fn test_warn_not_minutes() {
        let (_, warnings) = parse_goroutine_line("goroutine 12 [select, 30 hours]:").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, 4);
        assert!(warnings[0].message.contains("unknown field"));
    }

    #[test]
    fn test_warn_extra_state_info_field() {
        let (goroutine, warnings) = parse_goroutine_line(
            "goroutine 8 [chan send, 30 minutes, locked to thread, other]:",
        )
        .unwrap();
        assert_eq!(goroutine.state, "chan send");
        assert_eq!(goroutine.wait_minutes, 30);
        assert!(goroutine.locked_to_thread);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, 6);
    }

    #[test]
    fn test_warn_extra_fields_before_state() {
        let (goroutine, warnings) =
            parse_goroutine_line("goroutine 1 gp=0xc000002380 m=0 [running]:").unwrap();
        assert_eq!(goroutine.state, "running");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("before state info"));
    }

    #[test]
    fn test_warn_trailing_text() {
        let (_, warnings) = parse_goroutine_line("goroutine 1 [running]: junk").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, 0);
    }

    #[test]
    fn test_is_goroutine_line() {
        assert!(is_goroutine_line("goroutine 1 [running]:"));
        assert!(!is_goroutine_line("goroutines are fun"));
        assert!(!is_goroutine_line(""));
    }
}
