//! Command implementations.
//!
//! Output is plain text, one line per entry.

use std::io::Write;
use std::time::Duration;

use super::args::{CheckArgs, Cli, Commands, RemoveArgs};
use crate::config::Settings;
use crate::error::{Result, VerwatchError};
use crate::shell::Invocation;
use crate::version::VersionReport;

/// Apply command-line overrides on top of environment settings.
pub fn settings_for(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::from_env()?;

    if let Some(file) = &cli.file {
        settings.data_file = file.clone();
    }
    if let Some(secs) = cli.command_timeout {
        settings.command_timeout = Some(seconds("--command-timeout", secs)?);
    }
    if let Some(secs) = cli.fetch_timeout {
        settings.fetch_timeout = Some(seconds("--fetch-timeout", secs)?);
    }
    if cli.direct {
        settings.invocation = Invocation::Direct;
    }

    Ok(settings)
}

/// Run the selected command, writing its report to `out`.
pub fn dispatch(cli: &Cli, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    match &cli.command {
        Commands::List => list(settings, out),
        Commands::Check(args) => check(settings, args, out),
        Commands::Remove(args) => remove(settings, args, out),
    }
}

fn list(settings: &Settings, out: &mut dyn Write) -> Result<()> {
    let mut store = settings.store();
    for entry in store.load()? {
        writeln!(out, "{}", entry.name())?;
    }
    Ok(())
}

fn check(settings: &Settings, args: &CheckArgs, out: &mut dyn Write) -> Result<()> {
    let mut store = settings.store();
    let entries = store.load()?;

    let selected = match &args.name {
        Some(name) => {
            let entry = entries
                .iter()
                .find(|e| e.name() == name)
                .ok_or_else(|| VerwatchError::NotFound { name: name.clone() })?;
            std::slice::from_ref(entry)
        }
        None => entries,
    };

    for report in settings.resolver().check_all(selected) {
        writeln!(out, "{}", describe(&report))?;
    }
    Ok(())
}

fn remove(settings: &Settings, args: &RemoveArgs, out: &mut dyn Write) -> Result<()> {
    let mut store = settings.store();
    if args.name.is_empty() {
        return Err(VerwatchError::EmptyName);
    }
    store.load()?;
    store.delete(&args.name)?;
    writeln!(out, "Removed {}", args.name)?;
    Ok(())
}

fn describe(report: &VersionReport) -> String {
    let show = |outcome: &Result<String>| match outcome {
        Ok(version) if version.is_empty() => "(empty)".to_string(),
        Ok(version) => version.clone(),
        Err(e) => format!("error: {}", e),
    };
    let marker = if report.update_available() {
        "  (update available)"
    } else {
        ""
    };
    format!(
        "{}: installed {}, latest {}{}",
        report.name,
        show(&report.installed),
        show(&report.latest),
        marker
    )
}

fn seconds(flag: &str, secs: f64) -> Result<Duration> {
    Some(secs)
        .filter(|s| *s > 0.0)
        .and_then(|s| Duration::try_from_secs_f64(s).ok())
        .ok_or_else(|| VerwatchError::InvalidConfig {
            key: flag.to_string(),
            value: secs.to_string(),
        })
}
