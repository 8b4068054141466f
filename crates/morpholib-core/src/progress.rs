//! Progress reporting and cooperative cancellation
//!
//! Engines report coarse checkpoints to an optional [`ProgressObserver`]
//! and poll an optional [`CancelToken`] between phases and scanlines.
//! Neither affects the computed result.

use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Major phase of an engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Distance raster initialization
    Initialize,
    /// Forward propagation pass
    ForwardPass,
    /// Backward propagation pass
    BackwardPass,
    /// Division by the normalization weight
    Normalize,
    /// Extraction of (coordinate, value) records
    Extraction,
    /// Sorting of the extracted records
    Sort,
    /// Level-by-level flooding
    Flood,
    /// Merging of watershed cells into basins
    MergeLines,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::ForwardPass => "forward pass",
            Phase::BackwardPass => "backward pass",
            Phase::Normalize => "normalize",
            Phase::Extraction => "extraction",
            Phase::Sort => "sort",
            Phase::Flood => "flood",
            Phase::MergeLines => "merge lines",
        };
        f.write_str(name)
    }
}

/// Receives progress notifications from an engine
///
/// All methods have empty default bodies.
pub trait ProgressObserver: Send + Sync {
    /// A phase has started
    fn phase_started(&self, _phase: Phase) {}

    /// `done` of `total` work units of `phase` are complete
    fn progress(&self, _phase: Phase, _done: usize, _total: usize) {}

    /// A phase has finished
    fn phase_finished(&self, _phase: Phase) {}
}

/// Shared cancellation flag
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Fail with [`Error::Cancelled`] if cancellation was requested
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Observer and cancellation hooks carried by engine options
#[derive(Clone, Default)]
pub struct Monitor {
    observer: Option<Arc<dyn ProgressObserver>>,
    cancel: Option<CancelToken>,
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("observer", &self.observer.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl Monitor {
    /// A monitor with no observer and no cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attach a cancellation token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fail with [`Error::Cancelled`] if the attached token is cancelled
    #[inline]
    pub fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }

    /// Report the start of a phase, checking for cancellation first
    pub fn begin(&self, phase: Phase) -> Result<()> {
        self.check_cancelled()?;
        if let Some(observer) = &self.observer {
            observer.phase_started(phase);
        }
        Ok(())
    }

    /// Report progress within a phase
    #[inline]
    pub fn progress(&self, phase: Phase, done: usize, total: usize) {
        if let Some(observer) = &self.observer {
            observer.progress(phase, done, total);
        }
    }

    /// Report the end of a phase
    pub fn end(&self, phase: Phase) {
        if let Some(observer) = &self.observer {
            observer.phase_finished(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ProgressObserver for Recorder {
        fn phase_started(&self, phase: Phase) {
            self.events.lock().unwrap().push(format!("start {phase}"));
        }

        fn phase_finished(&self, phase: Phase) {
            self.events.lock().unwrap().push(format!("end {phase}"));
        }
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(token.check().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(Error::Cancelled));
    }

    #[test]
    fn test_monitor_reports_phases() {
        let recorder = Arc::new(Recorder::default());
        let monitor = Monitor::new().with_observer(recorder.clone());
        monitor.begin(Phase::ForwardPass).unwrap();
        monitor.end(Phase::ForwardPass);
        let events = recorder.events.lock().unwrap();
        assert_eq!(*events, vec!["start forward pass", "end forward pass"]);
    }

    #[test]
    fn test_monitor_begin_fails_when_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let monitor = Monitor::new().with_cancel_token(token);
        assert_eq!(monitor.begin(Phase::Flood), Err(Error::Cancelled));
    }
}
