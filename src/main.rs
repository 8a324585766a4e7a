use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wotch_host::Capabilities;
use wotch_parser::{WorkoutParser, parse_duration};
use wotch_runtime::{
  Action, ContextChange, ExecutionContext, Program, RuntimeConfig, RuntimeError, Workout,
  WorkoutRuntime,
};

/// Wotch - runs indented workout scripts
#[derive(Parser)]
#[command(name = "wotch")]
#[command(version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Parse a workout file and list its programs
  Check {
    /// Path to the workout file
    workout_file: PathBuf,
  },

  /// Run one program of a workout file
  Run {
    /// Path to the workout file
    workout_file: PathBuf,

    /// Program to run (case-insensitive); required when the file has several
    #[arg(long)]
    program: Option<String>,

    /// Fast-forward through the start of the program, e.g. "4m 30s"
    #[arg(long, value_parser = parse_duration)]
    skip_ahead: Option<Duration>,

    /// Polling increment of waits, in milliseconds
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Print context changes as JSON lines
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_writer(io::stderr)
    .init();

  match cli.command {
    Some(Commands::Check { workout_file }) => {
      check(&workout_file)?;
    }
    Some(Commands::Run {
      workout_file,
      program,
      skip_ahead,
      tick_ms,
      json,
    }) => {
      let options = RunOptions {
        program,
        skip_ahead: skip_ahead.unwrap_or_default(),
        tick_interval: Duration::from_millis(tick_ms),
        json,
      };
      let rt = tokio::runtime::Runtime::new()?;
      rt.block_on(async { run(&workout_file, options).await })?;
    }
    None => {
      println!("wotch - use --help to see available commands");
    }
  }

  Ok(())
}

struct RunOptions {
  program: Option<String>,
  skip_ahead: Duration,
  tick_interval: Duration,
  json: bool,
}

fn load(workout_file: &Path, config: RuntimeConfig) -> Result<Workout> {
  let text = std::fs::read_to_string(workout_file)
    .with_context(|| format!("failed to read workout file: {}", workout_file.display()))?;

  WorkoutParser::new(Capabilities::system(), config)
    .parse_workout(&text)
    .with_context(|| format!("failed to parse workout file: {}", workout_file.display()))
}

fn check(workout_file: &Path) -> Result<()> {
  let workout = load(workout_file, RuntimeConfig::default())?;

  for program in workout.programs() {
    println!("{} ({})", program.name(), format_duration(program.duration()));
    for exercise in program.exercises() {
      println!(
        "  {}: {} x {} ({})",
        exercise.name(),
        exercise.set_count(),
        exercise.repetition_count(),
        format_duration(exercise.duration())
      );
    }
  }

  Ok(())
}

fn select_program(workout: &Workout, name: Option<&str>) -> Result<Arc<Program>> {
  if let Some(name) = name {
    return workout
      .program(name)
      .with_context(|| format!("program '{}' not found", name));
  }

  match workout.programs() {
    [program] => Ok(Arc::clone(program)),
    programs => {
      let names: Vec<_> = programs.iter().map(|p| p.name()).collect();
      bail!(
        "workout has {} programs, choose one with --program: {}",
        programs.len(),
        names.join(", ")
      )
    }
  }
}

async fn run(workout_file: &Path, options: RunOptions) -> Result<()> {
  let config = RuntimeConfig::new(options.tick_interval).context("invalid --tick-ms")?;
  let workout = load(workout_file, config)?;
  let program = select_program(&workout, options.program.as_deref())?;

  eprintln!(
    "Running program: {} ({})",
    program.name(),
    format_duration(program.duration())
  );
  eprintln!("Controls: p = pause, r = resume, q = quit");

  let runtime = WorkoutRuntime::new(program);
  let context = ExecutionContext::with_skip_ahead(options.skip_ahead);
  let mut changes = context.subscribe();
  let mut reporter = Reporter::new(runtime.duration(), options.json);

  spawn_controls(context.clone());

  let execution = runtime.execute(context.clone());
  let waiting = execution.wait();
  tokio::pin!(waiting);
  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);
  let mut interrupted = false;

  let result = loop {
    tokio::select! {
      result = &mut waiting => break result,
      Some(change) = changes.recv() => reporter.report(&change)?,
      _ = &mut ctrl_c, if !interrupted => {
        interrupted = true;
        context.cancel();
      }
    }
  };

  while let Ok(change) = changes.try_recv() {
    reporter.report(&change)?;
  }

  match result {
    Ok(summary) => {
      if options.json {
        println!("{}", serde_json::to_string(&summary)?);
      }
      eprintln!(
        "Execution completed: {} ({})",
        summary.execution_id,
        format_duration(summary.progress)
      );
      Ok(())
    }
    Err(RuntimeError::Cancelled) => {
      eprintln!("Execution cancelled at {}", format_duration(context.progress()));
      Ok(())
    }
    Err(e) => Err(e).context("workout execution failed"),
  }
}

/// Read single-letter commands from stdin on a dedicated thread.
fn spawn_controls(context: ExecutionContext) {
  std::thread::spawn(move || {
    for line in io::stdin().lock().lines() {
      let Ok(line) = line else {
        break;
      };
      match line.trim() {
        "p" => context.pause(),
        "r" => context.resume(),
        "q" => {
          context.cancel();
          break;
        }
        "" => {}
        other => eprintln!("unknown command '{}' (p, r or q)", other),
      }
    }
  });
}

/// Prints context changes as they arrive.
struct Reporter {
  total: Duration,
  progress: Duration,
  json: bool,
}

impl Reporter {
  fn new(total: Duration, json: bool) -> Self {
    Self {
      total,
      progress: Duration::ZERO,
      json,
    }
  }

  fn report(&mut self, change: &ContextChange) -> Result<()> {
    if self.json {
      println!("{}", serde_json::to_string(change)?);
      return Ok(());
    }

    let message = match change {
      ContextChange::Progress(progress) => {
        self.progress = *progress;
        return Ok(());
      }
      ContextChange::SkipAheadRemaining(_) => return Ok(()),
      ContextChange::Paused(true) => "paused".to_string(),
      ContextChange::Paused(false) => "resumed".to_string(),
      ContextChange::Cancelled => "cancelled".to_string(),
      ContextChange::CurrentExercise(name) => format!("exercise: {}", name),
      ContextChange::CurrentSet(set) => format!("  set {}", set),
      ContextChange::CurrentRepetition(repetition) => format!("    rep {}", repetition),
    };

    println!(
      "[{} / {}] {}",
      format_duration(self.progress),
      format_duration(self.total),
      message
    );
    Ok(())
  }
}

fn format_duration(duration: Duration) -> String {
  let seconds = duration.as_secs();
  let (hours, minutes, seconds) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
  if hours > 0 {
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
  } else {
    format!("{}:{:02}", minutes, seconds)
  }
}
