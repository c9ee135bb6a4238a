//! CodeQuest CLI - run command scripts against a headless world
//!
//! Provides subcommands for running scripts, checking single lines,
//! an interactive prompt, and managing persisted settings.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use codequest::interpreter::parse_line_with_limit;
use codequest::runtime::clock::ManualClock;
use codequest::runtime::storage::{load_config, write_config};
use codequest::runtime::{Session, command_speed_delay};
use codequest::world::World;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// 12x10 field with a pond in the middle and water along the east edge.
const DEMO_MAP: &str = "\
0 0 0 0 0 0 0 0 0 0 0 3
0 0 0 0 0 0 0 0 0 0 0 3
0 0 1 1 0 0 0 0 2 0 0 3
0 0 1 1 0 0 0 0 0 0 0 3
0 0 0 0 0 3 3 0 0 0 0 3
0 0 0 0 0 3 3 0 0 0 0 3
0 0 2 0 0 0 0 0 0 1 0 3
0 0 0 0 0 0 0 0 0 0 0 3
0 0 0 0 0 0 0 0 0 0 0 3
0 0 0 0 0 0 0 0 0 0 0 3
";

#[derive(Parser)]
#[command(name = "codequest")]
#[command(about = "Run CodeQuest command scripts without a window", long_about = None)]
struct Cli {
    /// Directory holding settings.json
    #[arg(short, long, default_value = ".codequest")]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct WorldArgs {
    /// Tile map file (rows of tile ids); defaults to a built-in field
    #[arg(long)]
    map: Option<PathBuf>,

    /// Starting column
    #[arg(long, default_value = "1")]
    col: usize,

    /// Starting row
    #[arg(long, default_value = "1")]
    row: usize,

    /// Simulated frames per second
    #[arg(long, default_value = "60")]
    fps: u64,

    /// Give up after this many frames per submission
    #[arg(long, default_value = "100000")]
    max_ticks: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file and report the final state
    Run {
        /// Script to run
        script: PathBuf,

        /// Submit the whole file as one line instead of line by line
        #[arg(long)]
        whole: bool,

        #[command(flatten)]
        world: WorldArgs,
    },

    /// Parse one line and print its statements as JSON
    Check {
        /// Command line to parse
        line: String,
    },

    /// Read lines from stdin and run each one
    Repl {
        #[command(flatten)]
        world: WorldArgs,
    },

    /// Show or change persisted settings
    Settings {
        /// Options-panel command speed, 1 (slow) to 10 (fast)
        #[arg(long)]
        speed_level: Option<u8>,

        /// Pixels moved per frame
        #[arg(long)]
        move_speed: Option<u32>,

        /// Default `wait` duration in milliseconds
        #[arg(long)]
        default_wait: Option<u64>,

        /// Largest loop bound or walk count a line may use
        #[arg(long)]
        max_repeat: Option<u32>,
    },
}

struct Headless {
    session: Session<World>,
    clock: ManualClock,
    frame_ms: u64,
    max_ticks: u64,
}

impl Headless {
    fn open(cli_root: &Path, args: &WorldArgs) -> Result<Self> {
        if args.fps == 0 {
            bail!("--fps must be greater than zero");
        }
        let config = load_config(cli_root)?;
        let map_text = match &args.map {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read map: {:?}", path))?,
            None => DEMO_MAP.to_string(),
        };
        let clock = ManualClock::new(0);
        let session = Session::from_map_text(
            config,
            &map_text,
            (args.col, args.row),
            Box::new(clock.clone()),
        )?;
        Ok(Self {
            session,
            clock,
            frame_ms: (1000 / args.fps).max(1),
            max_ticks: args.max_ticks,
        })
    }

    fn submit(&mut self, line: &str) -> bool {
        let report = self.session.submit(line);
        for err in &report.errors {
            println!("  error: {}", err);
        }
        let mut ticks = 0;
        while self.session.is_busy() && ticks < self.max_ticks {
            self.session.tick();
            self.clock.advance(self.frame_ms);
            ticks += 1;
        }
        if self.session.is_busy() {
            println!(
                "  stopped after {} frames with {} actions queued",
                ticks,
                self.session.queue_len()
            );
            self.session.clear();
        }
        report.success
    }

    fn report(&self) {
        let world = self.session.world();
        let agent = world.agent();
        println!(
            "Position: {}  facing {}  health {}/{}",
            agent.position,
            agent.facing,
            world.health().current(),
            world.health().max()
        );
        if let Some(message) = world.messages().current() {
            println!("Message: {}", message);
        }
        if world.is_game_over() {
            println!("GAME OVER");
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            whole,
            world,
        } => {
            let source = std::fs::read_to_string(&script)
                .with_context(|| format!("Failed to read script: {:?}", script))?;
            let mut headless = Headless::open(&cli.root, &world)?;

            let ok = if whole {
                headless.submit(&source)
            } else {
                let mut all_ok = true;
                for line in source.lines().filter(|line| !line.trim().is_empty()) {
                    println!("> {}", line);
                    all_ok &= headless.submit(line);
                    if headless.session.world().is_game_over() {
                        break;
                    }
                }
                all_ok
            };

            headless.report();
            if !ok {
                println!("Script contained errors");
            }
        }

        Commands::Check { line } => {
            let config = load_config(&cli.root)?;
            let mut failed = false;
            for parsed in parse_line_with_limit(&line, config.max_repeat) {
                match parsed {
                    Ok(statement) => println!("{}", serde_json::to_string(&statement)?),
                    Err(err) => {
                        failed = true;
                        println!("error: {}", err);
                    }
                }
            }
            if failed {
                std::process::exit(1);
            }
        }

        Commands::Repl { world } => {
            let mut headless = Headless::open(&cli.root, &world)?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            print!("codequest> ");
            stdout.flush()?;
            for line in stdin.lock().lines() {
                let line = line?;
                if line.trim() == "quit" || line.trim() == "exit" {
                    break;
                }
                headless.submit(&line);
                headless.report();
                if headless.session.world().is_game_over() {
                    break;
                }
                print!("codequest> ");
                stdout.flush()?;
            }
        }

        Commands::Settings {
            speed_level,
            move_speed,
            default_wait,
            max_repeat,
        } => {
            let mut config = load_config(&cli.root)?;
            let changed = speed_level.is_some()
                || move_speed.is_some()
                || default_wait.is_some()
                || max_repeat.is_some();
            if let Some(level) = speed_level {
                config.action_delay_ms = command_speed_delay(level);
            }
            if let Some(speed) = move_speed {
                config.move_speed = speed;
            }
            if let Some(wait) = default_wait {
                config.default_wait_ms = wait;
            }
            if let Some(limit) = max_repeat {
                config.max_repeat = limit;
            }
            if changed {
                write_config(&cli.root, &config)?;
                println!("Saved settings to {:?}", cli.root.join("settings.json"));
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
