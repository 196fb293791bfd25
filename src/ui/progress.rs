//! Progress reporting

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::time::Instant;

/// Progress reporter for one sync run: scan spinner, planning bar,
/// execution bar.
pub struct ProgressReporter {
    scan_bar: ProgressBar,
    plan_bar: ProgressBar,
    execute_bar: ProgressBar,
    execute_started_at: Option<Instant>,
    uploaded_bytes: u64,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let scan_bar = ProgressBar::new_spinner();
        scan_bar.enable_steady_tick(std::time::Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            scan_bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
        }

        let plan_bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} checked | {msg}")
        {
            plan_bar.set_style(style.progress_chars("=>-"));
        }

        let execute_bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} items | {msg}")
        {
            execute_bar.set_style(style.progress_chars("=>-"));
        }

        Self {
            scan_bar,
            plan_bar,
            execute_bar,
            execute_started_at: None,
            uploaded_bytes: 0,
        }
    }

    /// Mark start of the local scan.
    pub fn start_scan(&self) {
        self.scan_bar.set_message("Scanning local files...");
    }

    /// Update scanning progress counters.
    pub fn update_scan(&self, files: u64, bytes: u64) {
        self.scan_bar.set_message(format!(
            "Scanning local files... {} files | {}",
            files,
            HumanBytes(bytes)
        ));
    }

    /// Mark completion of the local scan.
    pub fn finish_scan(&self, files: usize, bytes: u64) {
        self.scan_bar.finish_with_message(format!(
            "Scanned local tree: {} files | {}",
            files,
            HumanBytes(bytes)
        ));
    }

    /// Initialize the remote-check phase.
    pub fn start_plan(&self, total_files: u64) {
        self.plan_bar.set_length(total_files);
        self.plan_bar.set_position(0);
        self.plan_bar.set_message("Checking remote files...");
    }

    /// Update the remote-check indicator.
    pub fn update_plan(&self, index: usize, rel_path: &str) {
        self.plan_bar.set_position(index as u64);
        self.plan_bar.set_message(rel_path.to_string());
    }

    /// Mark completion of the remote-check phase.
    pub fn finish_plan(&self, uploads: usize, deletes: usize) {
        self.plan_bar.finish_with_message(format!(
            "Checked remote state: {} to upload, {} to delete",
            uploads, deletes
        ));
    }

    /// Initialize execution progress.
    pub fn start_execute(&mut self, total_items: u64) {
        self.execute_started_at = Some(Instant::now());
        self.uploaded_bytes = 0;
        self.execute_bar.set_length(total_items);
        self.execute_bar.set_position(0);
        self.execute_bar.set_message("Starting sync...".to_string());
    }

    /// Update current item indicator.
    pub fn set_current_item(&self, kind: &str, rel_path: &str) {
        self.execute_bar.set_message(format!("{} {}", kind, rel_path));
    }

    /// Mark one item complete and refresh the throughput display.
    pub fn complete_item(&mut self, bytes: u64) {
        self.uploaded_bytes = self.uploaded_bytes.saturating_add(bytes);
        self.execute_bar.inc(1);

        let throughput = self.current_throughput_bps();
        self.execute_bar.set_message(format!(
            "{} uploaded | {}/s",
            HumanBytes(self.uploaded_bytes),
            HumanBytes(throughput)
        ));
    }

    /// Surface an item error above the bar.
    pub fn item_error(&self, kind: &str, rel_path: &str, err: &str) {
        self.execute_bar
            .println(format!("ERROR {} {}: {}", kind, rel_path, err));
    }

    /// Finalize the execution phase.
    pub fn finish_execute(&self, succeeded: usize, failed: usize, bytes: u64) {
        let throughput = self.current_throughput_bps();
        self.execute_bar.finish_with_message(format!(
            "Sync complete: {} succeeded, {} failed | {} | {}/s",
            succeeded,
            failed,
            HumanBytes(bytes),
            HumanBytes(throughput)
        ));
    }

    fn current_throughput_bps(&self) -> u64 {
        match self.execute_started_at {
            Some(started) => {
                let secs = started.elapsed().as_secs_f64();
                if secs > 0.0 {
                    (self.uploaded_bytes as f64 / secs) as u64
                } else {
                    0
                }
            }
            None => 0,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
