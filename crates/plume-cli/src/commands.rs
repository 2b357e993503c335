use std::sync::Arc;

use colored::{ColoredString, Colorize};
use plume_core::{Delivery, ListSink, LogEvent, Logger, LoggingContext, LoggingSettings, Sink};
use plume_legacy::{LegacyRepository, Priority};
use plume_types::Level;
use serde::Serialize;

use crate::cli::*;
use crate::settings::{configured_context, load_settings, CONSOLE_SINK};

/// Name of the sink `emit` attaches to capture what was delivered.
const CAPTURE_SINK: &str = "capture";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Levels => cmd_levels(format),
        Command::Emit(args) => cmd_emit(args, format),
        Command::Check(args) => cmd_check(args, format),
    }
}

fn paint(level: Level) -> ColoredString {
    let padded = format!("{:<5}", level.name());
    let name = padded.as_str();
    match level {
        Level::Trace => name.dimmed(),
        Level::Debug => name.blue(),
        Level::Info => name.green(),
        Level::Warn => name.yellow(),
        Level::Error => name.red(),
        Level::Fatal => name.red().bold(),
    }
}

fn display_name(name: &str) -> &str {
    if plume_types::is_root_name(name) {
        "root"
    } else {
        name
    }
}

// ---------------------------------------------------------------------------
// levels
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LevelRow {
    name: &'static str,
    rank: i32,
    syslog: u8,
}

fn level_rows() -> Vec<LevelRow> {
    Level::ALL
        .iter()
        .map(|&level| LevelRow {
            name: level.name(),
            rank: level.rank(),
            syslog: Priority::from_level(level).syslog_equivalent(),
        })
        .collect()
}

fn cmd_levels(format: OutputFormat) -> anyhow::Result<()> {
    let rows = level_rows();
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{:<7} {:>6}  {}", "LEVEL".bold(), "RANK".bold(), "SYSLOG".bold());
    for (level, row) in Level::ALL.iter().zip(&rows) {
        println!("{}   {:>6}  {}", paint(*level), row.rank, row.syslog);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// emit
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct EmitReport {
    logger: String,
    effective_level: Level,
    filtered: usize,
    events: Vec<LogEvent>,
}

fn emit_context(args: &EmitArgs) -> anyhow::Result<Arc<LoggingContext>> {
    match &args.config {
        Some(path) => {
            let source = path.display().to_string();
            configured_context(&source, load_settings(path)?)
        }
        None => {
            let mut settings = LoggingSettings::default();
            settings.root.sinks.push(CONSOLE_SINK.to_string());
            configured_context("defaults", settings)
        }
    }
}

fn emit_one(
    logger: &Arc<Logger>,
    legacy: Option<&Arc<LegacyRepository>>,
    level: Level,
    message: &str,
) -> Delivery {
    match legacy {
        Some(repository) => repository
            .get_instance(logger.name())
            .log(Priority::from_level(level), message, None),
        None => logger.log(level, message),
    }
}

fn emit(args: &EmitArgs, context: &Arc<LoggingContext>) -> EmitReport {
    let logger = context.get_logger(&args.logger);
    if let Some(threshold) = args.threshold {
        logger.set_level(Some(threshold));
    }
    if args.no_additivity {
        logger.set_additivity(false);
    }

    let capture = Arc::new(ListSink::new(CAPTURE_SINK));
    logger.add_sink(Arc::clone(&capture) as Arc<dyn Sink>);

    let legacy = args.legacy.then(|| LegacyRepository::new(Arc::clone(context)));
    let filtered = args
        .messages
        .iter()
        .map(|message| emit_one(&logger, legacy.as_ref(), args.level, message))
        .filter(Delivery::is_filtered)
        .count();

    logger.remove_sink_named(CAPTURE_SINK);
    EmitReport {
        logger: logger.name().to_string(),
        effective_level: logger.effective_level(),
        filtered,
        events: capture.take(),
    }
}

fn cmd_emit(args: EmitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let context = emit_context(&args)?;
    let report = emit(&args, &context);
    tracing::debug!(
        logger = %report.logger,
        delivered = report.events.len(),
        filtered = report.filtered,
        "emit finished"
    );

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "Logger {} (effective level {})",
        display_name(&report.logger).bold(),
        paint(report.effective_level)
    );
    for event in &report.events {
        println!(
            "  {} {} {}",
            event.timestamp.format("%H:%M:%S%.3f").to_string().as_str().dimmed(),
            paint(event.level),
            event.message
        );
    }
    if report.filtered > 0 {
        println!("  {} {} filtered", "-".dimmed(), report.filtered.to_string().as_str().yellow());
    }
    println!("{} {} delivered", "✓".green().bold(), report.events.len());
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct LoggerRow {
    name: String,
    level: Option<Level>,
    effective_level: Level,
    additivity: bool,
    sinks: Vec<String>,
}

fn logger_row(logger: &Logger) -> LoggerRow {
    LoggerRow {
        name: display_name(logger.name()).to_string(),
        level: logger.level(),
        effective_level: logger.effective_level(),
        additivity: logger.additivity(),
        sinks: logger.sinks().iter().map(|sink| sink.name().to_string()).collect(),
    }
}

/// Rows for the root and every logger the settings name, in name order.
fn check_rows(context: &LoggingContext, settings: &LoggingSettings) -> Vec<LoggerRow> {
    std::iter::once(logger_row(&context.root_logger()))
        .chain(
            settings
                .loggers
                .keys()
                .map(|name| logger_row(&context.get_logger(name))),
        )
        .collect()
}

fn cmd_check(args: CheckArgs, format: OutputFormat) -> anyhow::Result<()> {
    let settings = load_settings(&args.config)?;
    let source = args.config.display().to_string();
    let context = configured_context(&source, settings.clone())?;
    let rows = check_rows(&context, &settings);

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{} {} is valid", "✓".green().bold(), source.as_str().bold());
    for row in &rows {
        let explicit = match row.level {
            Some(_) => "set".normal(),
            None => "inherited".dimmed(),
        };
        let additivity = if row.additivity {
            "additive".normal()
        } else {
            "non-additive".yellow()
        };
        println!(
            "  {:<32} {} ({})  {}  sinks: {}",
            row.name,
            paint(row.effective_level),
            explicit,
            additivity,
            if row.sinks.is_empty() {
                "-".to_string()
            } else {
                row.sinks.join(", ")
            }
        );
    }
    Ok(())
}
