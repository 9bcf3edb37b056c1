//! Scan progress hooks
//!
//! The scanner reports milestones to a [`ScanObserver`] so front-ends can
//! render spinners or progress bars without the scanner knowing about
//! terminals.

use kindscan_core::ProbeOutcome;

/// Receives progress events from a scan
pub trait ScanObserver: Send {
    /// Discovery finished; `candidates` probes will follow
    fn catalog_ready(&mut self, _candidates: usize) {}

    /// One probe finished
    fn probe_finished(&mut self, _outcome: &ProbeOutcome) {}

    /// All probes finished (or the scan was cancelled)
    fn finished(&mut self) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}
