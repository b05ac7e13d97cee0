use std::fs;

use anyhow::{Context, Result};
use tracing::warn;

use scrub_cli::clean::{CleanResult, clean_file, report_json};
use scrub_cli::config::{load_config, render_config};
use scrub_model::ScrubConfig;

use crate::cli::{CleanArgs, ConfigArgs, PhoneArgs};
use crate::summary::print_phone_table;

pub fn run_clean(args: &CleanArgs) -> Result<CleanResult> {
    if args.config.is_none() && args.preset.is_none() {
        warn!("no --config or --preset given, only reading and rewriting the table");
    }
    let config = load_config(args.config.as_deref(), args.preset.map(Into::into))?;
    let result = clean_file(&args.input, args.output.as_deref(), &config, args.dry_run)?;
    if let Some(path) = &args.report {
        let json = report_json(&result.report)?;
        fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    }
    Ok(result)
}

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let config = args
        .preset
        .map_or_else(ScrubConfig::default, |preset| scrub_cli::config::Preset::from(preset).config());
    print!("{}", render_config(&config)?);
    Ok(())
}

pub fn run_phone(args: &PhoneArgs) {
    print_phone_table(&args.values);
}
