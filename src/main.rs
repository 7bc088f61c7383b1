//! Space Invaders headless runner
//!
//! Plays a session on autopilot and prints the final scene as JSON.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::Context;
    use clap::Parser;
    use space_invaders::sim::TickInput;
    use space_invaders::{JsonFileStore, Session, SessionConfig};

    /// Real-time frame length the loop pretends to run at
    const FRAME_MS: u64 = 16;

    #[derive(Parser)]
    #[command(name = "space-invaders")]
    #[command(about = "Run a Space Invaders session on autopilot and print the final scene")]
    pub struct Args {
        /// RNG seed for the run
        #[arg(short, long, default_value_t = 0x5EED)]
        seed: u64,

        /// Player name (blank plays anonymously)
        #[arg(short, long, default_value = "")]
        name: String,

        /// Start from a zero high score instead of the stored one
        #[arg(long)]
        clear: bool,

        /// Session config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// High score file
        #[arg(long, default_value = "highscores.json")]
        scores: PathBuf,

        /// Stop after this many minutes of play
        #[arg(short, long, default_value_t = 10)]
        minutes: u64,
    }

    pub fn run(args: Args) -> anyhow::Result<()> {
        let config = match &args.config {
            Some(path) => SessionConfig::load_or_default(path),
            None => SessionConfig::default(),
        };
        let store = JsonFileStore::new(&args.scores);
        let mut session = Session::start(config, &args.name, args.clear, store, args.seed)?;

        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let budget_ms = args.minutes * 60_000;
        while !session.is_over() && session.state().now < budget_ms {
            for event in session.advance(&input, FRAME_MS) {
                log::debug!("{:?}", event);
            }
        }
        if !session.is_over() {
            log::info!("Stopped after {} minutes of play", args.minutes);
        }

        let json = serde_json::to_string_pretty(&session.scene()).context("serializing final scene")?;
        println!("{}", json);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Space Invaders (native) starting...");
    native::run(native::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; a front-end drives the session
}
