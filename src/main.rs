use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use flowstate_config::StateMachineDef;
use flowstate_fsm::{CollectingNotifier, Execution, StateMachine};
use flowstate_store::{InMemoryStore, Repository};

/// Flowstate - a declarative state machine runner
#[derive(Parser)]
#[command(name = "flowstate")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a state machine against a JSON payload read from stdin
  Run {
    /// Path to the state machine definition (JSON)
    definition_file: PathBuf,

    /// Print execution events as JSON lines on stderr
    #[arg(long)]
    events: bool,
  },

  /// Report transition targets that do not name a state
  Check {
    /// Path to the state machine definition (JSON)
    definition_file: PathBuf,
  },
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  let cli = Cli::parse();

  match cli.command {
    Some(Commands::Run {
      definition_file,
      events,
    }) => {
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run_async(definition_file, events).await })?;
    }
    Some(Commands::Check { definition_file }) => {
      check(&definition_file)?;
    }
    None => {
      println!("flowstate - use --help to see available commands");
    }
  }

  Ok(())
}

async fn run_async(definition_file: PathBuf, print_events: bool) -> Result<()> {
  let def = load_definition(&definition_file)?;
  eprintln!(
    "Loaded state machine: {} ({} states)",
    def.name.as_deref().unwrap_or("unnamed"),
    def.states.len()
  );

  let payload = read_payload_from_stdin()?;

  let machine = StateMachine::from_def(def)
    .with_context(|| format!("invalid state machine: {}", definition_file.display()))?;

  let store = InMemoryStore::new();

  let machine_id = Uuid::new_v4();
  store
    .add_state_machine(machine_id, Arc::new(machine))
    .await
    .context("failed to register state machine")?;

  let execution_id = Uuid::new_v4();
  let execution = Execution::new(execution_id.to_string(), serde_json::to_vec(&payload)?)
    .context("failed to create execution")?;
  store
    .add_execution(execution_id, execution)
    .await
    .context("failed to register execution")?;

  let machine = store.get_state_machine(machine_id).await?;
  let execution = store.get_execution(execution_id).await?;

  let notifier = CollectingNotifier::new();
  let result = machine.execute_with(&execution, &notifier).await;

  store.remove_execution(execution_id).await?;

  if print_events {
    for event in notifier.take() {
      eprintln!("{}", serde_json::to_string(&event)?);
    }
  }

  let terminal = result.context("state machine execution failed")?;

  let output = serde_json::json!({
    "execution_id": execution.id(),
    "terminal": terminal,
  });
  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}

fn check(definition_file: &Path) -> Result<()> {
  let def = load_definition(definition_file)?;
  let machine = StateMachine::from_def(def)
    .with_context(|| format!("invalid state machine: {}", definition_file.display()))?;

  let unresolved = machine.unresolved_targets();
  if unresolved.is_empty() {
    println!("ok: {} states", machine.states().len());
    return Ok(());
  }

  for target in &unresolved {
    match &target.state_id {
      Some(state_id) => eprintln!("state '{}' -> unknown target '{}'", state_id, target.target),
      None => eprintln!("start_at -> unknown target '{}'", target.target),
    }
  }
  bail!("{} unresolved transition target(s)", unresolved.len())
}

fn load_definition(definition_file: &Path) -> Result<StateMachineDef> {
  let content = std::fs::read_to_string(definition_file).with_context(|| {
    format!(
      "failed to read definition file: {}",
      definition_file.display()
    )
  })?;

  StateMachineDef::from_json(&content).with_context(|| {
    format!(
      "failed to parse definition file: {}",
      definition_file.display()
    )
  })
}

fn read_payload_from_stdin() -> Result<serde_json::Value> {
  use std::io::IsTerminal;

  if io::stdin().is_terminal() {
    // No stdin pipe, use empty object
    Ok(serde_json::json!({}))
  } else {
    let mut input = String::new();
    io::stdin()
      .read_to_string(&mut input)
      .context("failed to read payload from stdin")?;

    if input.trim().is_empty() {
      Ok(serde_json::json!({}))
    } else {
      serde_json::from_str(&input).context("failed to parse payload JSON from stdin")
    }
  }
}
