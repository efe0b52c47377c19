use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::commands::{CommandReport, require_completer};
use crate::titler::config::load_config;
use crate::titler::derive::{TitleOptions, TitleRequest, derive_title};

#[derive(Debug, Clone)]
pub struct SuggestOptions {
    pub file: PathBuf,
    pub lower_case: bool,
    pub accept_subtitles: bool,
}

pub fn run(opts: &SuggestOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("suggest");
    let config = load_config()?;
    let options = TitleOptions {
        lower_case: config.titles.lower_case || opts.lower_case,
        accept_subtitles: config.titles.accept_subtitles || opts.accept_subtitles,
    };

    let Some((provider, completer)) = require_completer(&mut report) else {
        return Ok(report);
    };

    let content = fs::read_to_string(&opts.file)
        .with_context(|| format!("failed to read {}", opts.file.display()))?;
    let basename = opts
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let derived = derive_title(
        completer.as_ref(),
        &TitleRequest {
            content: &content,
            current_basename: &basename,
            options,
        },
    )
    .with_context(|| format!("deriving title for {}", opts.file.display()))?;

    report.detail(format!(
        "provider={} model={}",
        provider.provider.label(),
        provider.model
    ));
    report.detail(format!("attempts={}", derived.attempts));
    if !derived.changed {
        report.detail("title unchanged after retry budget");
    }
    report.detail(format!("title={}", derived.title));
    Ok(report)
}
