//! Structured records produced by the dump parser.
//!
//! A [`Snapshot`] owns its [`Goroutine`]s, which own their [`StackFrame`]s.
//! The `Display` impls reproduce the dump grammar, so a parsed snapshot can be
//! echoed back and parsed again.

use crate::utils::config::{GOROUTINE_KEYWORD, LOCKED_TO_THREAD, REDACTED_HEADER, WAIT_TIME_SUFFIX};
use std::fmt;

/// Which kind of dump line a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Goroutine,
    Function,
    File,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Goroutine => write!(f, "goroutine line"),
            LineKind::Function => write!(f, "function line"),
            LineKind::File => write!(f, "file line"),
        }
    }
}

/// A recoverable anomaly found while parsing a line
///
/// Warnings never stop parsing; they are counted and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    pub line_kind: LineKind,

    /// 1-based field index (0 = trailing text / the line as a whole)
    pub field: usize,

    pub message: String,
}

impl ParseWarning {
    pub fn new(line_kind: LineKind, field: usize, message: impl Into<String>) -> Self {
        Self {
            line_kind,
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, field {}: {}", self.line_kind, self.field, self.message)
    }
}

/// One frame of a goroutine's call stack
///
/// Equality compares `function`, `is_created_by`, `filename`, `line` and
/// `offset`. Argument values differ from call to call and are ignored.
#[derive(Debug, Clone)]
pub struct StackFrame {
    /// Fully qualified function name
    pub function: String,

    /// True for the `created by ...` frame that spawned the goroutine
    pub is_created_by: bool,

    /// Raw argument tokens, in order
    pub args: Vec<String>,

    pub filename: String,

    pub line: u64,

    /// PC offset such as `+0x1ec`, may be empty
    pub offset: String,
}

impl StackFrame {
    /// The call-site line as it appears in a dump
    pub fn call_site(&self) -> String {
        if self.is_created_by {
            format!("created by {}", self.function)
        } else {
            format!("{}({})", self.function, self.args.join(", "))
        }
    }

    /// The source-location line (without indentation)
    pub fn file_line(&self) -> String {
        if self.offset.is_empty() {
            format!("{}:{}", self.filename, self.line)
        } else {
            format!("{}:{} {}", self.filename, self.line, self.offset)
        }
    }
}

impl PartialEq for StackFrame {
    fn eq(&self, other: &Self) -> bool {
        self.function == other.function
            && self.is_created_by == other.is_created_by
            && self.filename == other.filename
            && self.line == other.line
            && self.offset == other.offset
    }
}

impl Eq for StackFrame {}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\t{}", self.call_site(), self.file_line())
    }
}

/// A single goroutine record
///
/// Two goroutines are equal when their stacks are equal frame by frame;
/// `id`, `state`, `wait_minutes` and `locked_to_thread` do not take part.
#[derive(Debug, Clone, Default)]
pub struct Goroutine {
    pub id: u64,
    pub state: String,
    pub wait_minutes: u64,
    pub locked_to_thread: bool,
    pub frames: Vec<StackFrame>,
}

impl Goroutine {
    pub fn new(id: u64, state: impl Into<String>) -> Self {
        Self {
            id,
            state: state.into(),
            ..Default::default()
        }
    }

    pub fn add_frame(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    /// Grouping key: every frame's `file:line`, one per line
    pub fn signature(&self) -> String {
        let mut key = String::new();
        for frame in &self.frames {
            key.push_str(&frame.filename);
            key.push(':');
            key.push_str(&frame.line.to_string());
            key.push('\n');
        }
        key
    }

    /// Header line in dump form, e.g. `goroutine 17 [syscall, 31 minutes]:`
    pub fn header(&self) -> String {
        let mut header = format!("{} {} [{}", GOROUTINE_KEYWORD, self.id, self.state);
        if self.wait_minutes != 0 {
            header.push_str(&format!(", {}{}", self.wait_minutes, WAIT_TIME_SUFFIX));
        }
        if self.locked_to_thread {
            header.push_str(", ");
            header.push_str(LOCKED_TO_THREAD);
        }
        header.push_str("]:");
        header
    }

    /// Stack text with id and state replaced by placeholders
    ///
    /// Used wherever one goroutine stands in for a whole group.
    pub fn redacted(&self) -> String {
        let mut text = String::from(REDACTED_HEADER);
        text.push('\n');
        for frame in &self.frames {
            text.push_str(&frame.to_string());
            text.push('\n');
        }
        text
    }
}

impl PartialEq for Goroutine {
    fn eq(&self, other: &Self) -> bool {
        self.frames == other.frames
    }
}

impl Eq for Goroutine {}

impl fmt::Display for Goroutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for frame in &self.frames {
            writeln!(f, "{}", frame)?;
        }
        Ok(())
    }
}

/// All goroutines of one dump, in the order they appeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    goroutines: Vec<Goroutine>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, goroutine: Goroutine) {
        self.goroutines.push(goroutine);
    }

    pub fn goroutines(&self) -> &[Goroutine] {
        &self.goroutines
    }

    pub fn into_goroutines(self) -> Vec<Goroutine> {
        self.goroutines
    }

    pub fn len(&self) -> usize {
        self.goroutines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goroutines.is_empty()
    }

    /// Reorder goroutines by ascending id
    pub fn sort_by_id(&mut self) {
        self.goroutines.sort_by_key(|g| g.id);
    }
}

impl FromIterator<Goroutine> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Goroutine>>(iter: I) -> Self {
        Self {
            goroutines: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Snapshot {
    type Item = Goroutine;
    type IntoIter = std::vec::IntoIter<Goroutine>;

    fn into_iter(self) -> Self::IntoIter {
        self.goroutines.into_iter()
    }
}

/// Echo form: every goroutine followed by a blank line
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for goroutine in &self.goroutines {
            writeln!(f, "{}", goroutine)?;
        }
        Ok(())
    }
}
