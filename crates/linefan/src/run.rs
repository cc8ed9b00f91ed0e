use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{resolve_title, FanConfig};
use crate::error::FanError;
use crate::estimate::Targets;
use crate::fan_loop::{FanLoop, FanOptions, RunSummary};
use crate::record::{
    ensure_record_dir, load_record, record_path_for_command, save_record, should_save, RunRecord,
};
use crate::source::LineSource;

/// Where a run's record lives and whether it may be replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPlan {
    pub path: PathBuf,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub summary: RunSummary,
    /// False when the subprocess failed or could not be waited on
    pub success: bool,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}

/// Pick the record for this run
///
/// An explicit record path wins; otherwise a command line gets a record
/// under the record directory, which is created on demand. Reading from
/// plain stdin without an explicit path keeps no record.
pub fn record_plan(config: &FanConfig, command_line: Option<&str>) -> Option<RecordPlan> {
    let path = match (&config.record, command_line) {
        (Some(path), _) => path.clone(),
        (None, Some(command)) => {
            if let Err(e) = ensure_record_dir(&config.record_dir) {
                debug!(
                    "Could not create record directory {}: {}",
                    config.record_dir.display(),
                    e
                );
            }
            record_path_for_command(&config.record_dir, command)
        }
        (None, None) => return None,
    };

    Some(RecordPlan {
        path,
        overwrite: config.overwrite_record,
    })
}

/// Estimation targets, with non-zero record values taking precedence over
/// the configured ones
pub fn seed_targets(config: &FanConfig, record: &RunRecord) -> Targets {
    Targets {
        lines: if record.target_lines > 0 {
            record.target_lines
        } else {
            config.target_lines
        },
        duration_secs: if record.duration_secs > 0 {
            record.duration_secs
        } else {
            config.duration_secs
        },
    }
}

pub fn fan_options(config: &FanConfig, command_line: Option<&str>, targets: Targets) -> FanOptions {
    FanOptions {
        title: resolve_title(config.title.as_deref(), command_line),
        echo: config.echo,
        quiet: config.quiet,
        clean: config.clean,
        sample_every: config.sample_every,
        targets,
    }
}

/// Feed every input line through the fan until input ends
pub async fn drive<W: Write, C: Clock>(
    source: &mut LineSource,
    fan: &mut FanLoop<W, C>,
) -> RunSummary {
    fan.begin();
    while let Some(line) = source.next_line().await {
        fan.on_line(&line);
    }
    fan.finish()
}

/// Save the run's measurements if the plan calls for it
///
/// Returns whether the record was written.
pub fn store_record(plan: &RecordPlan, summary: &RunSummary) -> Result<bool, FanError> {
    if !should_save(&plan.path, plan.overwrite) {
        debug!("Keeping existing run record {}", plan.path.display());
        return Ok(false);
    }

    let record = RunRecord {
        duration_secs: summary.elapsed_secs,
        target_lines: summary.line_count,
    };
    save_record(&plan.path, &record)?;
    Ok(true)
}

/// Run the fan over `source`, persist the record, then wait for the
/// subprocess
pub async fn execute<W: Write, C: Clock>(
    mut source: LineSource,
    mut fan: FanLoop<W, C>,
    record: Option<&RecordPlan>,
) -> RunOutcome {
    let summary = drive(&mut source, &mut fan).await;
    info!(
        "Read {} lines in {} seconds",
        summary.line_count, summary.elapsed_secs
    );

    if let Some(plan) = record {
        if let Err(e) = store_record(plan, &summary) {
            warn!("{}", e);
        }
    }

    let success = source.wait().await;
    RunOutcome { summary, success }
}

/// Full invocation: change directory, pick input, seed estimates from the
/// record, and render to stderr
///
/// `command` is joined with spaces and run with `sh -c`; when empty, lines
/// come from stdin. Returns the process exit code.
pub async fn run_fan(config: FanConfig, command: Vec<String>) -> Result<i32> {
    if let Some(dir) = &config.chdir {
        std::env::set_current_dir(dir)
            .map_err(|source| FanError::ChangeDir {
                path: dir.clone(),
                source,
            })
            .context("Cannot start in the requested directory")?;
    }

    let command_line = if command.is_empty() {
        None
    } else {
        Some(command.join(" "))
    };

    let plan = record_plan(&config, command_line.as_deref());

    let source = match &command_line {
        Some(command) => LineSource::spawn_shell(command)
            .with_context(|| format!("Cannot read lines from `{}`", command))?,
        None => LineSource::stdin(),
    };

    let record = plan
        .as_ref()
        .map(|plan| load_record(&plan.path))
        .unwrap_or_default();
    let targets = seed_targets(&config, &record);
    debug!("Estimation targets: {:?}", targets);

    let options = fan_options(&config, command_line.as_deref(), targets);
    let fan = FanLoop::new(std::io::stderr(), SystemClock::start(), options);

    let outcome = execute(source, fan, plan.as_ref()).await;
    Ok(outcome.exit_code())
}
