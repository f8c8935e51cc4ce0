use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use ae_api::{create_store, load_assets_from_map, CreateStoreOptions, LoadedAssets};
use ae_core::{AdventureError, EngineCommand};
use ae_runtime::{EngineStore, StoreStatus};
use ae_tool::{read_assets_from_dir, validate_assets};

#[derive(Debug, Parser)]
#[command(name = "ae-cli")]
#[command(about = "Adventure engine line player and asset tools")]
struct Cli {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Play a dialog interactively from an asset bundle.
    Play(PlayArgs),
    /// List validation diagnostics for an asset bundle.
    Validate(ValidateArgs),
    /// Replay a recorded history log and print the final variables.
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[arg(long = "assets-dir")]
    assets_dir: String,
    #[arg(long = "dialog")]
    dialog: String,
    #[arg(long = "start-node")]
    start_node: Option<String>,
    #[arg(long = "seed")]
    seed: Option<u32>,
    /// Write the session's command log here on exit.
    #[arg(long = "history-out")]
    history_out: Option<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    #[arg(long = "assets-dir")]
    assets_dir: String,
}

#[derive(Debug, Args)]
struct ReplayArgs {
    #[arg(long = "assets-dir")]
    assets_dir: String,
    #[arg(long = "history")]
    history: String,
    #[arg(long = "seed")]
    seed: Option<u32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            if let Some(engine) = error.downcast_ref::<AdventureError>() {
                eprintln!("error[{}]: {}", engine.code, engine.message);
            } else {
                eprintln!("error: {:#}", error);
            }
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Mode::Play(args) => run_play(args),
        Mode::Validate(args) => run_validate(args),
        Mode::Replay(args) => run_replay(args),
    }
}

fn load_bundle(assets_dir: &str) -> anyhow::Result<LoadedAssets> {
    let files = read_assets_from_dir(Path::new(assets_dir))
        .with_context(|| format!("reading assets under {}", assets_dir))?;
    Ok(load_assets_from_map(&files)?)
}

fn run_play(args: PlayArgs) -> anyhow::Result<i32> {
    let assets = load_bundle(&args.assets_dir)?;
    if !assets.dialogs.contains_key(&args.dialog) {
        anyhow::bail!("dialog \"{}\" is not in the bundle", args.dialog);
    }

    let mut store = create_store(
        assets,
        CreateStoreOptions {
            track_history: true,
            random_seed: args.seed,
            ..CreateStoreOptions::default()
        },
    );

    println!("adventure player");
    println!("commands: :help :vars :history :quit");

    let mut status = store.dispatch(EngineCommand::OpenDialog {
        dialog: args.dialog.clone(),
        start_node: args.start_node.clone(),
    })?;
    status = settle(&mut store, status)?;

    loop {
        debug_assert_eq!(status, StoreStatus::Idle);
        let Some(line) = store.current_line() else {
            println!();
            println!("[dialog ended]");
            break;
        };

        println!();
        if let Some(prompt) = &line.prompt_text {
            match &line.speaker {
                Some(speaker) => println!("{}: {}", speaker, prompt),
                None => println!("{}", prompt),
            }
        }
        let revisit = store.state().overlay.is_used(&line.node_id);
        if revisit {
            tracing::debug!(node = %line.node_id, "revisiting node");
        }
        store.state_mut().overlay.mark_used(&line.node_id);

        for response in &line.responses {
            println!("  [{}] {}", response.index, response.text);
        }

        let choice = loop {
            let raw = prompt_input("> ")?;
            if handle_meta_command(&raw, &store)? {
                continue;
            }
            match raw.parse::<usize>() {
                Ok(index) if index < line.responses.len() => break index,
                _ => println!("enter a response number between 0 and {}", line.responses.len().saturating_sub(1)),
            }
        };

        status = store.dispatch(EngineCommand::SelectResponse { index: choice })?;
        status = settle(&mut store, status)?;
    }

    if let Some(path) = args.history_out {
        write_history(Path::new(&path), store.history())?;
        println!("history written: {}", path);
    }
    Ok(0)
}

/// Sleeps through suspensions until the store drains to idle.
fn settle(store: &mut EngineStore, mut status: StoreStatus) -> anyhow::Result<StoreStatus> {
    while let StoreStatus::Suspended { seconds } = status {
        thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
        status = store.resume()?;
    }
    Ok(status)
}

fn handle_meta_command(raw: &str, store: &EngineStore) -> anyhow::Result<bool> {
    match raw {
        ":help" => {
            println!("commands: :help :vars :history :quit");
            Ok(true)
        }
        ":vars" => {
            for (key, entry) in store.state().variables.iter() {
                println!("{} = {} ({})", key, entry.data, entry.kind.name());
            }
            Ok(true)
        }
        ":history" => {
            for line in store.history() {
                println!("{}", line);
            }
            Ok(true)
        }
        ":quit" => {
            println!("bye");
            std::process::exit(0);
        }
        _ => Ok(false),
    }
}

fn prompt_input(prefix: &str) -> anyhow::Result<String> {
    print!("{}", prefix);
    io::stdout().flush().context("flushing stdout")?;
    let mut input = String::new();
    io::stdin().read_line(&mut input).context("reading stdin")?;
    Ok(input.trim_end_matches(&['\r', '\n'][..]).to_string())
}

fn write_history(path: &Path, lines: &[String]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let mut payload = lines.join("\n");
    payload.push('\n');
    fs::write(path, payload).with_context(|| format!("writing {}", path.display()))
}

fn run_validate(args: ValidateArgs) -> anyhow::Result<i32> {
    let assets = load_bundle(&args.assets_dir)?;
    let findings = validate_assets(&assets);
    if findings.is_empty() {
        println!("ok: no diagnostics");
        return Ok(0);
    }
    for finding in &findings {
        println!(
            "[{}] {}: {}",
            finding.source.name(),
            finding.target,
            finding.message
        );
    }
    println!("{} diagnostic(s)", findings.len());
    Ok(1)
}

fn run_replay(args: ReplayArgs) -> anyhow::Result<i32> {
    let assets = load_bundle(&args.assets_dir)?;
    let history_path = PathBuf::from(&args.history);
    let raw = fs::read_to_string(&history_path)
        .with_context(|| format!("reading {}", history_path.display()))?;
    let lines: Vec<String> = raw.lines().map(str::to_string).collect();

    let mut store = create_store(
        assets,
        CreateStoreOptions {
            random_seed: args.seed,
            ..CreateStoreOptions::default()
        },
    );
    store.replay(&lines)?;

    for (key, entry) in store.state().variables.iter() {
        println!("{} = {} ({})", key, entry.data, entry.kind.name());
    }
    Ok(0)
}
