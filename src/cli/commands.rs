// ============================================================
// CLI — Arguments
// ============================================================
// One flat flag surface; `-t/--test` switches the process from
// training to generation. Spellings are a compatibility surface and
// use underscores, not clap's default kebab-case.

use clap::Args;
use std::path::PathBuf;

use crate::application::generate_use_case::GenerateConfig;
use crate::application::train_use_case::TrainConfig;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Checkpoint to restore before training or generation
    #[arg(short = 'l', long = "load_path")]
    pub load_path: Option<PathBuf>,

    /// Name used to derive the save directory save/models/{name}/
    /// (defaults to the artist name)
    #[arg(short = 'm', long = "model_name")]
    pub model_name: Option<String>,

    /// Artist whose corpus subdirectory is read
    #[arg(short = 'a', long = "artist_name", default_value = "kanye_west")]
    pub artist_name: String,

    /// Seed text the generated song starts from
    #[arg(short = 'p', long = "prime")]
    pub prime: Option<String>,

    /// Training sequence length in tokens
    #[arg(short = 's', long = "seq_len", default_value_t = 50)]
    pub seq_len: usize,

    /// Generate a song instead of training
    #[arg(short = 't', long = "test")]
    pub test: bool,

    /// Checkpoint cadence in training steps
    #[arg(long = "save_freq", default_value_t = 1000)]
    pub save_freq: usize,

    /// Stop training after this many global steps (default: run until
    /// interrupted)
    #[arg(long = "max_steps")]
    pub max_steps: Option<usize>,

    /// Number of tokens to generate, prime included
    #[arg(long = "gen_len", default_value_t = 200)]
    pub gen_len: usize,

    /// Root directory holding one lyric subdirectory per artist
    #[arg(long = "data_dir", default_value = "data")]
    pub data_dir: PathBuf,

    /// RNG seed for batch selection and sampling; unseeded runs use
    /// OS entropy
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

impl RunArgs {
    fn resolved_model_name(&self) -> String {
        self.model_name
            .clone()
            .unwrap_or_else(|| self.artist_name.clone())
    }

    pub fn into_train_config(self) -> TrainConfig {
        let model_name = self.resolved_model_name();
        TrainConfig {
            data_dir: self.data_dir,
            artist_name: self.artist_name,
            model_name,
            load_path: self.load_path,
            seq_len: self.seq_len,
            save_freq: self.save_freq,
            max_steps: self.max_steps,
            seed: self.seed,
            ..TrainConfig::default()
        }
    }

    pub fn into_generate_config(self) -> GenerateConfig {
        let model_name = self.resolved_model_name();
        GenerateConfig {
            data_dir: self.data_dir,
            artist_name: self.artist_name,
            model_name,
            load_path: self.load_path,
            prime: self.prime,
            gen_len: self.gen_len,
            seed: self.seed,
        }
    }
}
