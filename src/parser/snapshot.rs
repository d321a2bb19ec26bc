//! Line-driven state machine that turns a whole dump into a [`Snapshot`].
//!
//! Parse failures never abort the dump. Each failure costs at most the
//! goroutine or frame it occurred in, and is counted and logged with its
//! input line number.

use super::frame::{parse_file_line, parse_function_line, FunctionLine};
use super::goroutine::{is_goroutine_line, parse_goroutine_line};
use super::schema::{Goroutine, LineKind, ParseWarning, Snapshot};
use crate::utils::config::ELIDED_FRAMES_MARKER;
use crate::utils::error::ParseError;
use log::{debug, warn};

/// Where the parser is inside the current goroutine block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Skipping lines until a goroutine header shows up
    SeekHeader,
    /// Expecting a call-site line
    ReadFunctionLine,
    /// Expecting the source-location line of the pending call site
    ReadFileLine,
    /// A frame just completed; the block may continue or end here
    EndOfBlock,
}

/// Result of parsing a complete dump
#[derive(Debug, Clone, Default)]
pub struct ParsedSnapshot {
    pub snapshot: Snapshot,

    /// Lines whose contribution was lost to a hard parse error
    pub error_count: usize,

    /// Recoverable anomalies
    pub warning_count: usize,
}

/// Incremental dump parser
///
/// Feed lines with [`SnapshotParser::feed_line`], then call
/// [`SnapshotParser::finish`] to flush the goroutine still in progress.
#[derive(Debug)]
pub struct SnapshotParser {
    state: ParseState,
    current: Option<Goroutine>,
    pending: Option<FunctionLine>,
    snapshot: Snapshot,
    error_count: usize,
    warning_count: usize,
    line_number: usize,
}

impl Default for SnapshotParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::SeekHeader,
            current: None,
            pending: None,
            snapshot: Snapshot::new(),
            error_count: 0,
            warning_count: 0,
            line_number: 0,
        }
    }

    /// Process one input line
    ///
    /// **Public** - main driver of the state machine
    pub fn feed_line(&mut self, line: &str) {
        self.line_number += 1;
        let blank = line.trim().is_empty();

        // Some transitions hand the same line to the next state.
        loop {
            match self.state {
                ParseState::SeekHeader => {
                    if is_goroutine_line(line) {
                        self.start_goroutine(line);
                    }
                    return;
                }

                ParseState::ReadFunctionLine => {
                    if blank {
                        self.finish_goroutine();
                        return;
                    }
                    if is_goroutine_line(line) {
                        self.finish_goroutine();
                        continue;
                    }
                    match parse_function_line(line) {
                        Ok((call, warnings)) => {
                            self.record_warnings(warnings);
                            self.pending = Some(call);
                            self.state = ParseState::ReadFileLine;
                        }
                        Err(err) => {
                            self.record_error(&err);
                            if let Some(goroutine) = self.current.take() {
                                debug!("Discarding goroutine {}", goroutine.id);
                            }
                            self.state = ParseState::SeekHeader;
                        }
                    }
                    return;
                }

                ParseState::ReadFileLine => {
                    if is_goroutine_line(line) {
                        // The pending frame never got its location.
                        self.record_error(&ParseError::NotFileLine);
                        self.finish_goroutine();
                        continue;
                    }
                    let call = self.pending.take();
                    match parse_file_line(line) {
                        Ok((location, warnings)) => {
                            self.record_warnings(warnings);
                            if let (Some(call), Some(goroutine)) = (call, self.current.as_mut()) {
                                goroutine.add_frame(call.with_location(location));
                            }
                            self.state = ParseState::EndOfBlock;
                        }
                        Err(err) => {
                            // Only the frame is lost; earlier frames stay.
                            self.record_error(&err);
                            if blank {
                                self.finish_goroutine();
                            } else {
                                self.state = ParseState::EndOfBlock;
                            }
                        }
                    }
                    return;
                }

                ParseState::EndOfBlock => {
                    if blank {
                        self.finish_goroutine();
                        return;
                    }
                    if is_goroutine_line(line) {
                        self.finish_goroutine();
                        continue;
                    }
                    if line.trim() == ELIDED_FRAMES_MARKER {
                        self.record_warnings(vec![ParseWarning::new(
                            LineKind::Function,
                            0,
                            "stack frames were elided by the runtime",
                        )]);
                        return;
                    }
                    self.state = ParseState::ReadFunctionLine;
                }
            }
        }
    }

    /// Flush the goroutine in progress and return the result
    pub fn finish(mut self) -> ParsedSnapshot {
        if self.state == ParseState::ReadFileLine {
            // Input ended between the two lines of a frame
            self.record_error(&ParseError::NotFileLine);
        }
        self.finish_goroutine();

        debug!(
            "Parsed {} goroutines from {} lines ({} errors, {} warnings)",
            self.snapshot.len(),
            self.line_number,
            self.error_count,
            self.warning_count
        );

        ParsedSnapshot {
            snapshot: self.snapshot,
            error_count: self.error_count,
            warning_count: self.warning_count,
        }
    }

    fn start_goroutine(&mut self, line: &str) {
        match parse_goroutine_line(line) {
            Ok((goroutine, warnings)) => {
                self.record_warnings(warnings);
                self.current = Some(goroutine);
                self.state = ParseState::ReadFunctionLine;
            }
            Err(err) => self.record_error(&err),
        }
    }

    fn finish_goroutine(&mut self) {
        self.pending = None;
        if let Some(goroutine) = self.current.take() {
            self.snapshot.push(goroutine);
        }
        self.state = ParseState::SeekHeader;
    }

    fn record_error(&mut self, err: &ParseError) {
        self.error_count += 1;
        warn!("line {}: {}", self.line_number, err);
    }

    fn record_warnings(&mut self, warnings: Vec<ParseWarning>) {
        for warning in warnings {
            self.warning_count += 1;
            debug!("line {}: {}", self.line_number, warning);
        }
    }
}

/// Parse a complete dump
///
/// **Public** - main entry point for parsing
///
/// # Arguments
/// * `text` - Full text of a goroutine dump
///
/// # Returns
/// The snapshot together with error and warning counts. A non-zero error
/// count signals lost lines, not a failed parse.
pub fn parse_snapshot(text: &str) -> ParsedSnapshot {
    let mut parser = SnapshotParser::new();
    for line in text.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}
