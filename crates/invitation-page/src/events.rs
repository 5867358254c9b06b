//! Page events and where they come from.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::warn;

use crate::error::AppError;

/// Something the visitor or the browser did.
///
/// Elements are addressed by their `id`. On the wire each event is one JSON
/// object tagged by `type`, e.g. `{"type":"scroll","y":420}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// The page finished loading.
    Ready,
    /// An element was clicked.
    Click { target: String },
    /// The page was scrolled to `y`.
    Scroll { y: f64 },
    /// The viewport changed height.
    Resize { height: f64 },
    /// The pointer moved over an element; `x` and `y` are fractions of its
    /// width and height.
    PointerMove { target: String, x: f64, y: f64 },
    /// The pointer left an element.
    PointerLeave { target: String },
}

/// A stream of page events.
#[async_trait]
pub trait EventSource: Send {
    /// Waits for the next event. `Ok(None)` means the stream has ended.
    ///
    /// Implementations must be cancel-safe: dropping the future before it
    /// completes must not lose an event.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the underlying stream fails.
    async fn next_event(&mut self) -> Result<Option<PageEvent>, AppError>;
}

/// Reads one JSON event per line. Blank lines are skipped and malformed
/// lines are logged and skipped.
#[derive(Debug)]
pub struct LineEventSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> LineEventSource<R> {
    /// Wraps a buffered reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl LineEventSource<BufReader<Stdin>> {
    /// Reads events from standard input.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for LineEventSource<R> {
    async fn next_event(&mut self) -> Result<Option<PageEvent>, AppError> {
        while let Some(line) = self.lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => warn!(error = %e, line, "skipping malformed page event"),
            }
        }
        Ok(None)
    }
}

/// Replays a fixed list of events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEventSource {
    events: VecDeque<PageEvent>,
}

impl ScriptedEventSource {
    /// Creates a source that yields `events` in order, then ends.
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = PageEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Events not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

#[async_trait]
impl EventSource for ScriptedEventSource {
    async fn next_event(&mut self) -> Result<Option<PageEvent>, AppError> {
        Ok(self.events.pop_front())
    }
}
