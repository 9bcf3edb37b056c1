//! Terminal progress for scans

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use kindscan_core::{ProbeOutcome, ProbeStatus};
use kindscan_kube::ScanObserver;

/// Spinner during discovery, then a bar over the probes (stderr)
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    /// Create the progress display; `visible = false` draws nothing
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Discovering resource types...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }
}

impl ScanObserver for ScanProgress {
    fn catalog_ready(&mut self, candidates: usize) {
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        self.bar.set_length(candidates as u64);
        self.bar.set_message("Probing");
    }

    fn probe_finished(&mut self, outcome: &ProbeOutcome) {
        if outcome.status == ProbeStatus::TransientError {
            self.bar.println(format!(
                "⚠ {}: {}",
                outcome.candidate.qualified_name(),
                outcome.error.as_deref().unwrap_or("unknown error")
            ));
        }
        self.bar.inc(1);
    }

    fn finished(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindscan_core::{DiscoveredResource, GroupVersion, ListError, ResourceCandidate};

    #[test]
    fn test_hidden_progress_counts_probes() {
        let gv = GroupVersion::parse("v1").unwrap();
        let pods = ResourceCandidate::from_discovery(
            &gv,
            &DiscoveredResource::new("pods", "Pod", true, &["list"]),
        );

        let mut progress = ScanProgress::new(false);
        progress.catalog_ready(2);
        progress.probe_finished(&ProbeOutcome::listed(pods.clone(), 1));
        progress.probe_finished(&ProbeOutcome::failed(
            pods,
            &ListError::Other("timeout".to_string()),
        ));

        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.length(), Some(2));

        progress.finished();
        assert!(progress.bar.is_finished());
    }
}
