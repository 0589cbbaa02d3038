// ============================================================
// Application — Generate Use Case
// ============================================================
// Restores a trained model and samples a new song from it. The
// vocabulary saved at train time is preferred; when it is missing the
// vocabulary is rebuilt from the corpus, which yields identical ids
// because construction is deterministic over the same songs.

use anyhow::Result;
use std::path::PathBuf;

use crate::data::{loader::LyricsLoader, preprocessor::Preprocessor, vocabulary::Vocabulary};
use crate::domain::traits::SongSource;
use crate::error::LyricError;
use crate::infra::checkpoint::CheckpointStore;
use crate::ml::generator::Generator;
use crate::ml::model::LyricModelConfig;

type InferBackend = burn::backend::Wgpu;

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub data_dir:    PathBuf,
    pub artist_name: String,
    pub model_name:  String,
    pub load_path:   Option<PathBuf>,
    pub prime:       Option<String>,
    pub gen_len:     usize,
    pub seed:        Option<u64>,
}

pub struct GenerateUseCase {
    config: GenerateConfig,
}

impl GenerateUseCase {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        let store =
            CheckpointStore::new(CheckpointStore::dir_for(&cfg.model_name), &cfg.artist_name);

        // ── Vocabulary: saved copy first, deterministic rebuild otherwise ─────
        let vocab_path = store.dir().join("vocab.json");
        let vocab = if vocab_path.exists() {
            Vocabulary::load(&vocab_path)?
        } else {
            tracing::warn!(
                "No saved vocabulary at '{}'; rebuilding from the corpus",
                vocab_path.display(),
            );
            let songs = LyricsLoader::new(&cfg.data_dir, &cfg.artist_name).load_all()?;
            let preprocessor = Preprocessor::new();
            let texts: Vec<String> = songs.iter().map(|s| preprocessor.clean(&s.text)).collect();
            Vocabulary::build(&texts)
        };

        // ── Rebuild the architecture the checkpoint was trained with ──────────
        let model_cfg = store
            .load_config()
            .unwrap_or_else(|| LyricModelConfig::new(vocab.len()));
        if model_cfg.vocab_size != vocab.len() {
            return Err(LyricError::Checkpoint {
                path:   store.dir().display().to_string(),
                reason: format!(
                    "model was trained with {} tokens but the vocabulary has {}",
                    model_cfg.vocab_size,
                    vocab.len(),
                ),
            }
            .into());
        }

        let device = burn::backend::wgpu::WgpuDevice::default();
        let mut model = model_cfg.init::<InferBackend>(&device);

        // ── Restore parameters: explicit path, else the newest snapshot ───────
        match cfg.load_path.clone().or_else(|| store.latest()) {
            Some(path) => {
                let (restored, step) = CheckpointStore::load(model, &device, &path)?;
                model = restored;
                tracing::info!("Generating from step-{} parameters", step);
            }
            None => {
                tracing::warn!("No checkpoint found; generating from untrained weights");
            }
        }

        // ── Sample and print the song ─────────────────────────────────────────
        let mut generator = Generator::new(model, vocab, device, cfg.seed);
        let sample = generator.generate(cfg.prime.as_deref(), cfg.gen_len)?;

        println!("{sample}");
        Ok(())
    }
}
