//! Pagination module
//!
//! Resume-key pagination as an explicit state machine:
//! `Empty -> Serving -> Exhausted`.
//!
//! # Overview
//!
//! The CDX server continues a result set when the client echoes back the
//! resume key of the previous batch. `CursorState` decides, one record at a
//! time, whether to serve from the cached batch, fetch the next batch or stop.

mod types;

pub use types::{CursorState, Step};
