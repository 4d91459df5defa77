//! Per-sequence binding session
//!
//! A session moves through `Uninitialized -> HeaderCaptured -> RowProcessing
//! -> Done`, or to `Failed` when header capture fails or a whole-sequence
//! conversion is aborted. A row that fails through [`BindingSession::convert_row`]
//! does not end the session, so callers may skip bad rows themselves.

use std::marker::PhantomData;
use tracing::debug;

use super::engine::BindingEngine;
use super::source::{RowFilter, RowSource};
use super::stats::BindStats;
use crate::app::models::Record;
use crate::app::services::field_map::ColumnBindings;
use crate::{Error, Result};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    HeaderCaptured,
    RowProcessing,
    Done,
    Failed,
}

/// One pass over a row sequence, producing records of type `R`
#[derive(Debug)]
pub struct BindingSession<'a, R> {
    engine: &'a BindingEngine,
    state: SessionState,
    bindings: Option<ColumnBindings>,
    stats: BindStats,
    _record: PhantomData<fn() -> R>,
}

impl<'a, R: Record> BindingSession<'a, R> {
    pub(crate) fn new(engine: &'a BindingEngine) -> Self {
        Self {
            engine,
            state: SessionState::Uninitialized,
            bindings: None,
            stats: BindStats::new(),
            _record: PhantomData,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stats(&self) -> &BindStats {
        &self.stats
    }

    /// Column table captured from the header
    pub fn bindings(&self) -> Option<&ColumnBindings> {
        self.bindings.as_ref()
    }

    /// Capture and validate the header; any failure is fatal to the session
    pub fn capture_header(&mut self, header: Option<&[String]>) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Err(Error::configuration(format!(
                "header can only be captured once (session is {:?})",
                self.state
            )));
        }

        match self.engine.map().capture_header(header) {
            Ok(bindings) => {
                self.bindings = Some(bindings);
                self.state = SessionState::HeaderCaptured;
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Failed;
                Err(Error::header_capture(e))
            }
        }
    }

    /// Convert one row into a new record
    pub fn convert_row(&mut self, row: &[String]) -> Result<R> {
        let bindings = match (self.state, &self.bindings) {
            (SessionState::HeaderCaptured | SessionState::RowProcessing, Some(bindings)) => {
                bindings
            }
            (state, _) => {
                return Err(Error::configuration(format!(
                    "cannot convert rows while the session is {:?}",
                    state
                )));
            }
        };

        self.stats.rows_read += 1;
        let record = self.engine.bind_row(bindings, row)?;
        self.state = SessionState::RowProcessing;
        self.stats.records_bound += 1;
        Ok(record)
    }

    /// Capture the header (when configured) and convert every remaining row
    ///
    /// Rows vetoed by `filter` are skipped. The first failing row aborts the
    /// whole conversion and no records are returned.
    pub fn convert_all(
        &mut self,
        source: &mut dyn RowSource,
        filter: Option<&dyn RowFilter>,
    ) -> Result<Vec<R>> {
        if self.state == SessionState::Uninitialized {
            let header = if self.engine.config().has_header {
                match source.next_row() {
                    Ok(header) => header,
                    Err(e) => {
                        self.state = SessionState::Failed;
                        return Err(Error::header_capture(e));
                    }
                }
            } else {
                None
            };
            self.capture_header(header.as_deref())?;
        }

        let mut records = Vec::new();
        loop {
            let row = match source.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => {
                    self.state = SessionState::Failed;
                    return Err(Error::row_conversion(self.stats.rows_read + 1, &[], e));
                }
            };

            if let Some(filter) = filter {
                if !filter.allow_row(&row) {
                    self.stats.rows_read += 1;
                    self.stats.rows_filtered += 1;
                    continue;
                }
            }

            match self.convert_row(&row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    self.state = SessionState::Failed;
                    return Err(Error::row_conversion(self.stats.rows_read, &row, e));
                }
            }
        }

        let stats = self.finish();
        debug!(
            "Bound {} records from {} rows ({} filtered)",
            stats.records_bound, stats.rows_read, stats.rows_filtered
        );
        Ok(records)
    }

    /// Mark the session done and return its statistics
    pub fn finish(&mut self) -> BindStats {
        if self.state != SessionState::Failed {
            self.state = SessionState::Done;
        }
        self.stats.clone()
    }
}
