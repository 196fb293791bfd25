//! Main sync command

use crate::diff::{plan_deletes, plan_uploads, ChangeSet, PlanProgressCallback};
use crate::executor::{execute, CancelFlag, ExecutionEvent, SyncOutcome};
use crate::scanner::{list_remote_tree, scan_local_tree, ScanProgressCallback};
use crate::transport::open_transport;
use crate::types::{DeleteMode, SyncError};
use crate::ui::ProgressReporter;
use crate::Config;
use console::style;
use indicatif::HumanBytes;
use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

const PREVIEW_LIMIT: usize = 8;

/// Run the sync operation
pub fn run(config: Config) -> Result<(), SyncError> {
    config.validate()?;

    let reporter = Arc::new(Mutex::new(ProgressReporter::new()));

    if let Ok(progress) = reporter.lock() {
        progress.start_scan();
    }
    let scan_progress: ScanProgressCallback = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |files: u64, bytes: u64| {
            if let Ok(progress) = reporter.lock() {
                progress.update_scan(files, bytes);
            }
        })
    };
    let local_files = scan_local_tree(
        &config.local_root,
        &config.exclude_patterns,
        Some(&scan_progress),
    )?;
    let local_bytes: u64 = local_files.iter().map(|f| f.size).sum();
    if let Ok(progress) = reporter.lock() {
        progress.finish_scan(local_files.len(), local_bytes);
    }

    if local_files.is_empty() {
        println!("No local files to upload.");
        return Ok(());
    }

    let mut transport = open_transport(&config)?;

    if let Ok(progress) = reporter.lock() {
        progress.start_plan(local_files.len() as u64);
    }
    let plan_progress: PlanProgressCallback = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |index: usize, _total: usize, rel_path: &str| {
            if let Ok(progress) = reporter.lock() {
                progress.update_plan(index, rel_path);
            }
        })
    };
    let uploads = plan_uploads(
        &local_files,
        &config.remote_root,
        transport.as_mut(),
        Some(&plan_progress),
    )?;

    let deletes = if config.delete_mode == DeleteMode::Remove {
        let remote_entries = list_remote_tree(transport.as_mut(), &config.remote_root)?;
        plan_deletes(&local_files, &remote_entries)
    } else {
        Vec::new()
    };

    let mut change_set = ChangeSet::from_parts(uploads, deletes);
    if let Ok(progress) = reporter.lock() {
        progress.finish_plan(change_set.uploads.len(), change_set.deletes.len());
    }

    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&change_set)
                .map_err(|e| SyncError::Config(format!("could not serialize plan: {e}")))?
        );
    }

    if change_set.is_empty() {
        println!("Everything is in sync. No changes to apply.");
        return Ok(());
    }

    println!("{}", format_plan_preview(&change_set));

    if config.dry_run {
        println!("Dry-run mode: no changes were made.");
        return Ok(());
    }

    // Uploads and deletes are approved separately; declining deletes
    // still allows the upload half to run.
    if !change_set.uploads.is_empty() && !config.assume_yes {
        let prompt = format!(
            "Upload {} file(s) ({})?",
            change_set.uploads.len(),
            HumanBytes(change_set.stats.total_upload_bytes)
        );
        if !confirm(&prompt)? {
            println!("Aborted. Nothing was uploaded.");
            return Ok(());
        }
    }
    if !change_set.deletes.is_empty() && !config.assume_yes {
        let prompt = format!(
            "{} Delete {} remote entr(ies) with no local counterpart?",
            style("WARNING:").red().bold(),
            change_set.deletes.len()
        );
        if !confirm(&prompt)? {
            println!("Skipping deletes.");
            change_set.deletes.clear();
            change_set.stats.delete_count = 0;
        }
    }

    if let Ok(mut progress) = reporter.lock() {
        progress.start_execute(change_set.len() as u64);
    }

    let progress_cb = {
        let reporter = Arc::clone(&reporter);
        move |event: &ExecutionEvent| match event {
            ExecutionEvent::ItemStart { kind, rel_path, .. } => {
                if let Ok(progress) = reporter.lock() {
                    progress.set_current_item(kind.label(), rel_path);
                }
            }
            ExecutionEvent::ItemSuccess { bytes, .. } => {
                if let Ok(mut progress) = reporter.lock() {
                    progress.complete_item(*bytes);
                }
            }
            ExecutionEvent::ItemError {
                kind,
                rel_path,
                message,
                ..
            } => {
                if let Ok(progress) = reporter.lock() {
                    progress.item_error(kind.label(), rel_path, message);
                }
            }
            ExecutionEvent::Complete { outcome } => {
                if let Ok(progress) = reporter.lock() {
                    progress.finish_execute(
                        outcome.uploads_succeeded + outcome.deletes_succeeded,
                        outcome.failures.len(),
                        outcome.bytes_uploaded,
                    );
                }
            }
        }
    };

    let outcome = execute(
        &change_set,
        transport.as_mut(),
        &CancelFlag::new(),
        Some(&progress_cb),
    )?;

    println!("{}", format_outcome_summary(&outcome));
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, SyncError> {
    print!("{} [y/N] ", style(prompt).bold());
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn format_plan_preview(change_set: &ChangeSet) -> String {
    let mut lines = Vec::new();
    lines.push("Planned changes:".to_string());

    if !change_set.uploads.is_empty() {
        lines.push(format!(
            "  Upload: {} file(s) ({}) — {} new, {} size mismatch, {} newer local",
            change_set.stats.upload_count,
            HumanBytes(change_set.stats.total_upload_bytes),
            change_set.stats.new_count,
            change_set.stats.size_mismatch_count,
            change_set.stats.newer_local_count,
        ));
        for item in change_set.uploads.iter().take(PREVIEW_LIMIT) {
            lines.push(format!("    UPLOAD  {} ({})", item.rel_path, item.reason.label()));
        }
        if change_set.uploads.len() > PREVIEW_LIMIT {
            lines.push(format!(
                "    ... and {} more",
                change_set.uploads.len() - PREVIEW_LIMIT
            ));
        }
    }

    if !change_set.deletes.is_empty() {
        lines.push(format!(
            "  Delete: {} remote entr(ies)",
            change_set.stats.delete_count
        ));
        for item in change_set.deletes.iter().take(PREVIEW_LIMIT) {
            let marker = if item.is_dir { "DELETE DIR" } else { "DELETE" };
            lines.push(format!("    {marker}  {}", item.rel_path));
        }
        if change_set.deletes.len() > PREVIEW_LIMIT {
            lines.push(format!(
                "    ... and {} more",
                change_set.deletes.len() - PREVIEW_LIMIT
            ));
        }
    }

    lines.join("\n")
}

fn format_outcome_summary(outcome: &SyncOutcome) -> String {
    let mut lines = Vec::new();
    lines.push("Sync result:".to_string());

    if outcome.uploads_attempted > 0 {
        lines.push(format!(
            "  Uploaded: {}/{} file(s) ({})",
            outcome.uploads_succeeded,
            outcome.uploads_attempted,
            HumanBytes(outcome.bytes_uploaded)
        ));
    }
    if outcome.deletes_attempted > 0 {
        lines.push(format!(
            "  Deleted: {}/{} entr(ies)",
            outcome.deletes_succeeded, outcome.deletes_attempted
        ));
    }
    if outcome.status == crate::executor::OutcomeStatus::Cancelled {
        lines.push("  Cancelled before all items were attempted.".to_string());
    }

    if outcome.failures.is_empty() {
        lines.push("  No errors.".to_string());
    } else {
        lines.push(format!("  Errors ({}):", outcome.failures.len()));
        for failure in outcome.failures.iter().take(5) {
            lines.push(format!(
                "    - [{}] {}: {}",
                failure.kind.label(),
                failure.rel_path,
                failure.message
            ));
        }
        if outcome.failures.len() > 5 {
            lines.push(format!("    ... and {} more", outcome.failures.len() - 5));
        }
    }

    lines.join("\n")
}
