use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::commands::{CommandReport, require_completer};
use crate::titler::audit;
use crate::titler::config::load_config;
use crate::titler::derive::{TitleOptions, TitleRequest, derive_title};
use crate::titler::paths::resolve_paths;
use crate::titler::rename::{compose_target_path, rename_note};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub files: Vec<PathBuf>,
    pub dry_run: bool,
    pub lower_case: bool,
    pub accept_subtitles: bool,
}

pub fn run(opts: &RunOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("run");
    if opts.files.is_empty() {
        report.issue("no files given");
        return Ok(report);
    }

    let paths = resolve_paths()?;
    let config = load_config()?;
    let options = TitleOptions {
        lower_case: config.titles.lower_case || opts.lower_case,
        accept_subtitles: config.titles.accept_subtitles || opts.accept_subtitles,
    };

    let Some((provider, completer)) = require_completer(&mut report) else {
        return Ok(report);
    };
    report.detail(format!(
        "provider={} model={}",
        provider.provider.label(),
        provider.model
    ));
    if opts.dry_run {
        report.detail("dry_run=true");
    }

    // Files are handled strictly one at a time to stay inside provider
    // rate limits. A failed file leaves its note untouched and the batch
    // moves on.
    for file in &opts.files {
        let display = file.display().to_string();
        let content = match fs::read_to_string(file) {
            Ok(content) => content,
            Err(err) => {
                report.issue(format!("{display}: {err}"));
                continue;
            }
        };
        let Some(basename) = file.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            report.issue(format!("{display}: missing file name"));
            continue;
        };

        let request = TitleRequest {
            content: &content,
            current_basename: &basename,
            options,
        };
        let derived = match derive_title(completer.as_ref(), &request) {
            Ok(derived) => derived,
            Err(err) => {
                report.issue(format!("{display}: {err}"));
                continue;
            }
        };

        if !derived.changed {
            report.detail(format!(
                "{display}: title unchanged after {} attempts, skipped",
                derived.attempts
            ));
            continue;
        }

        let target = compose_target_path(file, &derived.title);
        if opts.dry_run {
            report.detail(format!("{display} -> {}", target.display()));
            continue;
        }
        if target != *file && target.exists() {
            report.issue(format!(
                "{display}: target {} already exists, skipped",
                target.display()
            ));
            continue;
        }

        match rename_note(file, &derived.title) {
            Ok(target) => {
                audit::append_event(
                    &paths,
                    "rename",
                    "ok",
                    &format!("{display} -> {}", target.display()),
                )?;
                report.detail(format!("{display} -> {}", target.display()));
            }
            Err(err) => {
                audit::append_event(&paths, "rename", "err", &format!("{display}: {err:#}"))?;
                report.issue(format!("{display}: {err:#}"));
            }
        }
    }

    Ok(report)
}
