//! Progress reporting for decision runs

use colored::Colorize;
use conclave_application::{DecisionProgress, DecisionStage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a decision run with progress bars
///
/// Deliberation log lines are printed above the bars as they happen.
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    /// Characters streamed by the judge in the current stage
    streamed: Mutex<usize>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            streamed: Mutex::new(0),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_display_name(stage: &DecisionStage) -> &'static str {
        match stage {
            DecisionStage::Generating => "Agents answering",
            DecisionStage::Voting => "Jury voting",
            DecisionStage::Nominating => "Nominations",
            DecisionStage::Judging => "Judge deliberating",
            DecisionStage::Summarizing => "Summarizing",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionProgress for ProgressReporter {
    fn on_stage_start(&self, stage: &DecisionStage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_display_name(stage).to_string());
        pb.set_message("Starting...");

        if let Ok(mut streamed) = self.streamed.lock() {
            *streamed = 0;
        }
        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: &DecisionStage, agent: &str, success: bool) {
        let Ok(bar) = self.stage_bar.lock() else {
            return;
        };
        if let Some(pb) = bar.as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), agent)
            } else {
                format!("{} {}", "x".red(), agent)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: &DecisionStage) {
        let Ok(mut bar) = self.stage_bar.lock() else {
            return;
        };
        if let Some(pb) = bar.take() {
            pb.finish_with_message(format!("{} complete!", stage.as_str().green()));
        }
    }

    fn on_log(&self, line: &str) {
        let _ = self.multi.println(format!("{} {}", ">".cyan(), line));
    }

    fn on_stream_chunk(&self, model: &str, chunk: &str) {
        let Ok(mut streamed) = self.streamed.lock() else {
            return;
        };
        *streamed += chunk.chars().count();
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("{} writing ({} chars)", model, *streamed));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl DecisionProgress for SimpleProgress {
    fn on_stage_start(&self, stage: &DecisionStage, total_tasks: usize) {
        let stage_name = ProgressReporter::stage_display_name(stage);
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            stage_name.bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _stage: &DecisionStage, agent: &str, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), agent);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), agent);
        }
    }

    fn on_stage_complete(&self, _stage: &DecisionStage) {
        eprintln!();
    }

    fn on_log(&self, line: &str) {
        eprintln!("  {} {}", ">".cyan(), line);
    }
}
