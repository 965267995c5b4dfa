use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use platformer_input::AppConfig;
use platformer_input::build_info::{BuildInfo, version_string};
use platformer_input::diagnostics::{print_report, run_all_checks};
use platformer_input::input::{InputDispatcher, KBind, ManualBackend, TriggerKind, parse_script};

#[derive(Parser)]
#[command(name = "keybinds", version, about = "Inspect, lint and replay key binding profiles")]
struct Cli {
    /// Profile to load from the config directory (defaults to APP_PROFILE, then "release")
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Load this config file instead of a profile
    #[arg(long, global = true, conflicts_with = "profile")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print every trigger group and its bindings
    List,
    /// Lint the bindings; exits 1 on failures and 2 on warnings
    Check,
    /// Feed a scripted key sequence through the dispatcher
    ///
    /// One frame per line. Entries are comma separated: a key name is held
    /// during that frame, `Axis Name=value` sets an axis. A blank line is a
    /// frame with nothing held and `#` starts a comment.
    Replay {
        script: PathBuf,
        /// Treat text input as active for the whole replay
        #[arg(long)]
        text_input: bool,
    },
    /// Print build information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(&config.input.log_level);
    info!(profile = %config.profile, bindings = config.bindings.len(), "Loaded key bindings");

    match cli.cmd {
        Cmd::List => {
            let dispatcher = build_dispatcher(&config)?;
            print!("{}", dispatcher.describe_bindings());
            for bind in dispatcher.axis_bindings() {
                println!("{bind}");
            }
        }
        Cmd::Check => {
            let dispatcher = build_dispatcher(&config)?;
            let report = run_all_checks(&dispatcher);
            print_report(&report);
            std::process::exit(report.exit_code());
        }
        Cmd::Replay { script, text_input } => {
            let mut dispatcher = build_dispatcher(&config)?;
            dispatcher.set_text_input_active(text_input);
            replay(&mut dispatcher, &script)?;
        }
        Cmd::Version => {
            println!("{}", version_string());
            println!("{}", BuildInfo::CURRENT);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    if let Some(path) = &cli.config {
        return AppConfig::from_file(path)
            .with_context(|| format!("failed to load config file {}", path.display()));
    }
    match &cli.profile {
        Some(profile) => AppConfig::load(profile)
            .with_context(|| format!("failed to load profile {profile}")),
        None => AppConfig::load_from_env().context("failed to load profile from APP_PROFILE"),
    }
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Registers the configured bindings with a logging action per configured trigger
fn build_dispatcher(config: &AppConfig) -> Result<InputDispatcher> {
    let mut dispatcher = config
        .dispatcher_with(|binding, bind| {
            binding
                .triggers
                .iter()
                .fold(bind, |bind, &kind| attach_logger(bind, kind))
        })
        .context("invalid key binding in config")?;

    for axis in &config.axes {
        if let Some(bind) = dispatcher.axis_binding_mut(&axis.name) {
            let name = axis.name.clone();
            bind.listen("log", move |value| info!(binding = %name, value, "Axis changed"));
        }
    }

    Ok(dispatcher)
}

fn attach_logger(bind: KBind, kind: TriggerKind) -> KBind {
    let name = bind.name().to_string();
    let action = move || {
        info!(binding = %name, trigger = %kind, "Binding fired");
        true
    };
    match kind {
        TriggerKind::Press => bind.on_press("log", action),
        TriggerKind::Hold => bind.on_hold("log", action),
        TriggerKind::Release => bind.on_release("log", action),
    }
}

fn replay(dispatcher: &mut InputDispatcher, script: &Path) -> Result<()> {
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("failed to read replay script {}", script.display()))?;
    let frames = parse_script(&text)
        .with_context(|| format!("invalid replay script {}", script.display()))?;
    if frames.is_empty() {
        bail!("replay script {} has no frames", script.display());
    }

    let mut backend = ManualBackend::new();
    for (number, frame) in frames.iter().enumerate() {
        frame.apply(&mut backend);
        let report = dispatcher.update(&backend);
        debug!(frame = number, line = frame.line, activations = report.activations.len(), "Replayed frame");
        for activation in &report.activations {
            println!(
                "{number:>4} {:<7} {}{}",
                activation.kind,
                activation.binding,
                if activation.handled { "" } else { " (unhandled)" }
            );
        }
        for change in &report.axis_changes {
            println!("{number:>4} {:<7} {} = {}", "axis", change.binding, change.value);
        }
    }

    Ok(())
}
