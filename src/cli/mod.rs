// ============================================================
// CLI — Entry Point
// ============================================================
// Parses the flag surface and routes to the training or generation
// use case. Malformed arguments exit non-zero inside clap before any
// model or data initialization happens; the few combination checks
// that clap cannot express are validated here, still ahead of heavy
// setup.

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use commands::RunArgs;

#[derive(Parser, Debug)]
#[command(
    name = "lyric-gen",
    version,
    about = "Train a word-level LSTM on an artist's lyrics, then generate new songs."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: RunArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let args = self.args;

        if args.save_freq == 0 {
            bail!("--save_freq must be at least 1");
        }
        if args.seq_len == 0 {
            bail!("--seq_len must be at least 1");
        }

        if args.test {
            self::run_generate(args)
        } else {
            self::run_train(args)
        }
    }
}

fn run_train(args: RunArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Training on lyrics for '{}'", args.artist_name);
    TrainUseCase::new(args.into_train_config()).execute()
}

fn run_generate(args: RunArgs) -> Result<()> {
    use crate::application::generate_use_case::GenerateUseCase;

    GenerateUseCase::new(args.into_generate_config()).execute()
}
