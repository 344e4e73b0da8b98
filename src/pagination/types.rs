//! Cursor state machine
//!
//! Tracks the cached batch and read position across `advance()` calls.
//! No I/O happens here: `step` says what to do next, the engine does it and
//! feeds the result back through `load`.

use crate::decode::{CdxRecord, ParsedBatch};

/// Result of one transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Serve this record
    Yield(CdxRecord),
    /// Fetch a batch, continuing from `resume_key` when set
    Fetch {
        /// Key from the previous batch, `None` for the first request
        resume_key: Option<String>,
    },
    /// End of sequence
    Done,
}

impl Step {
    /// Check if this is the end of the sequence
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if a network fetch is required
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Position of the engine in the result set
#[derive(Debug, Clone, Default)]
pub enum CursorState {
    /// Nothing fetched yet
    #[default]
    Empty,
    /// Holding a batch; `position` is the next row to serve
    Serving {
        /// Cached batch
        batch: ParsedBatch,
        /// Index of the next row to serve
        position: usize,
    },
    /// Last batch consumed and it carried no resume key. Terminal.
    Exhausted,
}

impl CursorState {
    /// Create a state that has not fetched anything
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one position.
    ///
    /// A `Fetch` result leaves the state unchanged, so a failed fetch can be
    /// retried by calling `step` again.
    pub fn step(&mut self) -> Step {
        let next_key = match self {
            CursorState::Empty => return Step::Fetch { resume_key: None },
            CursorState::Exhausted => return Step::Done,
            CursorState::Serving { batch, position } => {
                if let Some(record) = batch.record(*position) {
                    *position += 1;
                    return Step::Yield(record);
                }
                batch.resume_key().map(str::to_owned)
            }
        };

        match next_key {
            Some(key) => Step::Fetch {
                resume_key: Some(key),
            },
            None => {
                *self = CursorState::Exhausted;
                Step::Done
            }
        }
    }

    /// Replace the cached batch with a freshly fetched one.
    ///
    /// A batch without data rows ends the sequence.
    pub fn load(&mut self, batch: ParsedBatch) {
        *self = if batch.is_empty() {
            CursorState::Exhausted
        } else {
            CursorState::Serving { batch, position: 0 }
        };
    }

    /// Check if the sequence has ended
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Check if nothing has been fetched yet
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Rows left in the cached batch
    pub fn remaining(&self) -> usize {
        match self {
            CursorState::Serving { batch, position } => batch.num_rows().saturating_sub(*position),
            _ => 0,
        }
    }
}
