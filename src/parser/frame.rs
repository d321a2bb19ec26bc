//! Stack frame parsing.
//!
//! A frame is written as two lines:
//!
//! ```text
//! github.com/control-center/serviced/cli/api.(*daemon).run(0xc2080f0180, 0x0, 0x0)
//!         /src/github.com/control-center/serviced/cli/api/daemon.go:306 +0xb13
//! ```
//!
//! The first line is either a call site or a `created by ...` origin line.
//! Both halves are parsed independently and then joined into a [`StackFrame`].

use super::schema::{LineKind, ParseWarning, StackFrame};
use crate::utils::config::CREATED_BY_PREFIX;
use crate::utils::error::ParseError;

/// First half of a frame: the call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionLine {
    pub function: String,
    pub is_created_by: bool,
    pub args: Vec<String>,
}

/// Second half of a frame: the source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLine {
    pub filename: String,
    pub line: u64,
    pub offset: String,
}

impl FunctionLine {
    /// Complete the frame with its source location
    pub fn with_location(self, location: FileLine) -> StackFrame {
        StackFrame {
            function: self.function,
            is_created_by: self.is_created_by,
            args: self.args,
            filename: location.filename,
            line: location.line,
            offset: location.offset,
        }
    }
}

/// Parse a call-site line
///
/// **Public** - used by the snapshot parser
///
/// # Returns
/// The parsed call site and the warnings found on the line. Requiring the
/// line to end with its argument list leaves no room for trailing text, so
/// the warning list is currently always empty.
///
/// # Errors
/// * `ParseError::NotFunctionLine` - no `created by ` prefix and no trailing `(...)`
pub fn parse_function_line(line: &str) -> Result<(FunctionLine, Vec<ParseWarning>), ParseError> {
    let line = line.trim();
    let warnings = Vec::new();

    if let Some(function) = line.strip_prefix(CREATED_BY_PREFIX) {
        let parsed = FunctionLine {
            function: function.to_string(),
            is_created_by: true,
            args: Vec::new(),
        };
        return Ok((parsed, warnings));
    }

    // The argument list has to close the line; receivers such as "(*daemon)"
    // would otherwise be mistaken for it.
    let open = match line.rfind('(') {
        Some(index) if line.ends_with(')') => index,
        _ => return Err(ParseError::NotFunctionLine),
    };

    let function = &line[..open];
    let inner = &line[open + 1..line.len() - 1];

    let args = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(|arg| arg.trim().to_string()).collect()
    };

    let parsed = FunctionLine {
        function: function.to_string(),
        is_created_by: false,
        args,
    };
    Ok((parsed, warnings))
}

/// Parse a source-location line
///
/// **Public** - used by the snapshot parser
///
/// # Errors
/// * `ParseError::NotFileLine` - no colon on the line
/// * `ParseError::MissingFilename` - nothing before the colon
/// * `ParseError::InvalidLineNumber` - line number is not an unsigned integer
pub fn parse_file_line(line: &str) -> Result<(FileLine, Vec<ParseWarning>), ParseError> {
    let line = line.trim();
    let mut warnings = Vec::new();

    let colon = line.rfind(':').ok_or(ParseError::NotFileLine)?;
    if colon == 0 {
        return Err(ParseError::MissingFilename);
    }

    let filename = &line[..colon];
    let rest = &line[colon + 1..];

    let (number, rest) = rest.split_once(' ').unwrap_or((rest, ""));
    let line_number = parse_digits(number)
        .ok_or_else(|| ParseError::InvalidLineNumber(number.to_string()))?;

    let (offset, extra) = rest.split_once(' ').unwrap_or((rest, ""));
    if !extra.is_empty() {
        warnings.push(ParseWarning::new(
            LineKind::File,
            0,
            format!("extra fields found: '{}'", extra),
        ));
    }

    let parsed = FileLine {
        filename: filename.to_string(),
        line: line_number,
        offset: offset.to_string(),
    };
    Ok((parsed, warnings))
}

/// Parse a string made only of ASCII digits
///
/// **Private** - shared by frame and goroutine parsing
pub(crate) fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
