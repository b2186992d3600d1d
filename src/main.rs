use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use treenav::config::{load_from_path, Config};
use treenav::nav::{descend_to_visible_child, visible_parent};
use treenav::{
    language_from_name, supported_languages, Command, CommandOutcome, Engine, Mode, ModeEvent,
    ModeMachine, NoHighlight, NodeRef,
};

#[derive(Parser)]
#[command(name = "treenav")]
#[command(about = "Structural navigation and editing over syntax trees", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run structural commands against a file
    Run {
        file: PathBuf,

        /// Grammar to parse with (defaults to the file extension, then config)
        #[arg(short, long)]
        lang: Option<String>,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Byte offset to place point at before the first command
        #[arg(long, default_value_t = 0)]
        at: usize,

        /// Command to run, e.g. "next 2" or "delete"; repeatable
        #[arg(short = 'c', long = "command")]
        commands: Vec<String>,

        /// Show unified diff of changes instead of the resulting text
        #[arg(short, long)]
        diff: bool,

        /// Print a JSON report
        #[arg(long, conflicts_with = "diff")]
        json: bool,

        /// Write the result back to the file
        #[arg(short, long)]
        in_place: bool,
    },

    /// Show the node at an offset and its neighbourhood
    Inspect {
        file: PathBuf,

        #[arg(short, long)]
        lang: Option<String>,

        #[arg(long)]
        at: usize,
    },

    /// List supported languages
    Languages,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            lang,
            config,
            at,
            commands,
            diff,
            json,
            in_place,
        } => cmd_run(RunArgs {
            file,
            lang,
            config,
            at,
            commands,
            diff,
            json,
            in_place,
        }),

        Commands::Inspect { file, lang, at } => cmd_inspect(&file, lang, at),

        Commands::Languages => cmd_languages(),
    }
}

struct RunArgs {
    file: PathBuf,
    lang: Option<String>,
    config: Option<PathBuf>,
    at: usize,
    commands: Vec<String>,
    diff: bool,
    json: bool,
    in_place: bool,
}

#[derive(Serialize)]
struct CommandReport {
    command: String,
    #[serde(flatten)]
    outcome: CommandOutcome,
}

#[derive(Serialize)]
struct RunReport<'a> {
    file: &'a Path,
    language: String,
    commands: Vec<CommandReport>,
    point: usize,
    current: Option<NodeRef>,
    changed: bool,
    text: &'a str,
    kill_ring: Vec<&'a str>,
}

/// Pick the grammar name: explicit flag, then file extension, then config.
fn resolve_language(flag: Option<String>, file: &Path, config: &Config) -> Result<String> {
    if let Some(name) = flag {
        language_from_name(&name)?;
        return Ok(name);
    }

    let from_extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| language_from_name(ext).is_ok());

    Ok(from_extension
        .map(str::to_string)
        .unwrap_or_else(|| config.engine.language.clone()))
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_from_path(path)?,
        None => Config::default(),
    };
    config.engine.language = resolve_language(args.lang, &args.file, &config)?;

    let commands = args
        .commands
        .iter()
        .map(|text| {
            text.parse::<Command>()
                .with_context(|| format!("invalid command '{text}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let original = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let mut engine = Engine::from_config(original.clone(), &config, Box::new(NoHighlight))?;
    engine.set_point(args.at);

    let mut modes = ModeMachine::with_overrides(config.engine.frontend, &config.modes.transitions);
    if modes.handle(ModeEvent::EnterStructural, &mut engine) != Mode::Structural {
        bail!(
            "configured transitions never reach structural mode from {}",
            modes.current()
        );
    }

    let mut reports = Vec::with_capacity(commands.len());
    for command in commands {
        let outcome = engine
            .execute(command)
            .with_context(|| format!("'{command}' failed"))?;
        if !args.json {
            print_outcome(&command, &outcome);
        }
        reports.push(CommandReport {
            command: command.to_string(),
            outcome,
        });
    }

    let current = engine.current();
    let region = engine.cursor().region();
    let changed = engine.text() != original;

    if args.json {
        let report = RunReport {
            file: &args.file,
            language: config.engine.language.clone(),
            commands: reports,
            point: engine.point(),
            current,
            changed,
            text: engine.text(),
            kill_ring: engine.kill_ring().entries().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.diff {
        display_diff(&args.file, &original, engine.text());
    } else {
        print_highlighted(engine.text(), region);
    }

    if args.in_place && changed {
        engine
            .buffer()
            .save(&args.file)
            .with_context(|| format!("failed to write {}", args.file.display()))?;
        eprintln!("{} wrote {}", "✓".green(), args.file.display());
    }

    modes.handle(ModeEvent::ExitStructural, &mut engine);
    Ok(())
}

fn print_outcome(command: &Command, outcome: &CommandOutcome) {
    let detail = match outcome {
        CommandOutcome::Moved(moved) => format!("moved {moved}"),
        CommandOutcome::Edited(edit) => format!("{edit:?}"),
        CommandOutcome::Predicate(value) => value.to_string(),
        CommandOutcome::Jumped(point) => format!("point {point}"),
    };

    if outcome.succeeded() {
        eprintln!("{} {}: {}", "✓".green(), command, detail);
    } else {
        eprintln!("{} {}: {}", "✗".red(), command, detail.dimmed());
    }
}

/// Print `text`, marking the highlighted region.
fn print_highlighted(text: &str, region: Option<Range<usize>>) {
    match region.and_then(|region| {
        Some((
            text.get(..region.start)?,
            text.get(region.clone())?,
            text.get(region.end..)?,
        ))
    }) {
        Some((before, selected, after)) => {
            println!("{}{}{}", before, selected.reversed(), after);
        }
        None => println!("{text}"),
    }
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {}", file.display()).red());
    println!("{}", format!("+++ {}", file.display()).green());

    let diff = TextDiff::from_lines(original, modified);
    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{change}").red(),
            ChangeTag::Insert => format!("+{change}").green(),
            ChangeTag::Equal => format!(" {change}").normal(),
        };
        print!("{line}");
    }
}

fn cmd_inspect(file: &Path, lang: Option<String>, at: usize) -> Result<()> {
    let mut config = Config::default();
    config.engine.language = resolve_language(lang, file, &config)?;

    let text =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let mut engine = Engine::from_config(text, &config, Box::new(NoHighlight))?;
    engine.set_point(at);

    let Some(current) = engine.current() else {
        println!("{}", "No node at offset".yellow());
        return Ok(());
    };

    let buffer = engine.buffer();
    let node = current
        .resolve(buffer)
        .context("current node does not resolve")?;
    let mut rows = vec![("node", node)];
    if let Some(parent) = visible_parent(node).filter(|parent| *parent != node) {
        rows.push(("parent", parent));
    }
    if let Some(child) = descend_to_visible_child(node) {
        rows.push(("child", child));
    }

    for (label, n) in rows {
        let preview: String = buffer
            .node_text(n)
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(60)
            .collect();
        println!(
            "{:>8} {} [{}..{}) {}",
            label.bold(),
            n.kind().cyan(),
            n.start_byte(),
            n.end_byte(),
            preview.dimmed()
        );
    }

    let predicates = [
        ("root?", engine.at_root()),
        ("top?", engine.at_tree_root()),
        ("first?", engine.at_first()),
        ("last?", engine.at_last()),
        ("initial?", engine.at_initial()),
        ("final?", engine.at_final()),
    ];
    for (name, value) in predicates {
        let value = if value {
            "true".green()
        } else {
            "false".normal()
        };
        println!("{:>8} {}", name.bold(), value);
    }

    Ok(())
}

fn cmd_languages() -> Result<()> {
    for lang in supported_languages() {
        println!("{lang:?}");
    }
    Ok(())
}
