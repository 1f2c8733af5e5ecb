use crate::decoder::encode;
use crate::device::ReportSource;
use crate::error::TransportError;
use crate::layout::ReportLayout;
use crate::snapshot::Snapshot;
use std::collections::VecDeque;

/// In-memory [`ReportSource`] that replays a script of reads.
///
/// Once the script runs out it reports "no data" forever, or
/// [`TransportError::Disconnected`] if built with [`ScriptedSource::disconnect_when_done`].
#[derive(Debug, Default)]
pub struct ScriptedSource {
    name: String,
    script: VecDeque<Result<Vec<u8>, TransportError>>,
    disconnect_when_done: bool,
    prepared: usize,
    reasserted: usize,
}

impl ScriptedSource {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Queue a raw report.
    pub fn feed(&mut self, raw: impl Into<Vec<u8>>) -> &mut Self {
        self.script.push_back(Ok(raw.into()));
        self
    }

    /// Queue a report encoded from `snapshot`.
    pub fn feed_snapshot(&mut self, snapshot: &Snapshot, layout: &ReportLayout) -> &mut Self {
        self.feed(encode(snapshot, layout))
    }

    /// Queue a read that returns no data.
    pub fn feed_idle(&mut self) -> &mut Self {
        self.feed(Vec::new())
    }

    /// Queue a failing read.
    pub fn feed_error(&mut self, error: TransportError) -> &mut Self {
        self.script.push_back(Err(error));
        self
    }

    pub fn disconnect_when_done(mut self) -> Self {
        self.disconnect_when_done = true;
        self
    }

    /// Reads left in the script.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// How many times `prepare` was called.
    pub fn prepared(&self) -> usize {
        self.prepared
    }

    /// How many times `before_read` was called.
    pub fn reasserted(&self) -> usize {
        self.reasserted
    }
}

impl ReportSource for ScriptedSource {
    fn prepare(&mut self) -> Result<(), TransportError> {
        self.prepared += 1;
        Ok(())
    }

    fn before_read(&mut self) -> Result<(), TransportError> {
        self.reasserted += 1;
        Ok(())
    }

    fn read_report(&mut self, buf: &mut [u8], _timeout_ms: i32) -> Result<usize, TransportError> {
        match self.script.pop_front() {
            Some(Ok(raw)) => {
                let n = raw.len().min(buf.len());
                if let (Some(dst), Some(src)) = (buf.get_mut(..n), raw.get(..n)) {
                    dst.copy_from_slice(src);
                }
                Ok(n)
            }
            Some(Err(e)) => Err(e),
            None if self.disconnect_when_done => Err(TransportError::Disconnected),
            None => Ok(0),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
