// ============================================================
// Application — Train Use Case
// ============================================================
// Orchestrates the training pipeline in order:
//
//   Step 1: Load the artist's songs       (data)
//   Step 2: Clean the lyric text          (data)
//   Step 3: Build the vocabulary          (data)
//   Step 4: Encode the corpus             (data)
//   Step 5: Persist vocab + architecture  (infra)
//   Step 6: Build / restore the model     (ml, infra)
//   Step 7: Run the training loop         (ml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    batcher::LyricBatcher,
    loader::LyricsLoader,
    preprocessor::Preprocessor,
    sampler::BatchSampler,
    vocabulary::Vocabulary,
};
use crate::domain::traits::SongSource;
use crate::infra::{checkpoint::CheckpointStore, metrics::TrainingLog};
use crate::ml::model::LyricModelConfig;
use crate::ml::trainer::{run_training, TrainerContext};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run needs, resolved from the CLI. Serialisable
// so a run's exact settings can be recorded next to its checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:    PathBuf,
    pub artist_name: String,
    pub model_name:  String,
    pub load_path:   Option<PathBuf>,
    pub seq_len:     usize,
    pub batch_size:  usize,
    pub embed_size:  usize,
    pub cell_size:   usize,
    pub num_layers:  usize,
    pub lr:          f64,
    pub save_freq:   usize,
    pub max_steps:   Option<usize>,
    pub seed:        Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:    PathBuf::from("data"),
            artist_name: "kanye_west".to_string(),
            model_name:  "kanye_west".to_string(),
            load_path:   None,
            seq_len:     50,
            batch_size:  50,
            embed_size:  256,
            cell_size:   256,
            num_layers:  2,
            lr:          2e-3,
            save_freq:   1000,
            max_steps:   None,
            seed:        None,
        }
    }
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the artist's songs ───────────────────────────────────
        tracing::info!("Loading lyrics for '{}'", cfg.artist_name);
        let loader = LyricsLoader::new(&cfg.data_dir, &cfg.artist_name);
        let raw_songs = loader.load_all()?;

        // ── Step 2: Clean the lyric text ──────────────────────────────────────
        let preprocessor = Preprocessor::new();
        let clean_songs: Vec<String> = raw_songs
            .iter()
            .map(|s| preprocessor.clean(&s.text))
            .collect();

        // ── Step 3: Build the vocabulary ──────────────────────────────────────
        let vocab = Vocabulary::build(&clean_songs);
        tracing::info!("Vocabulary: {} tokens", vocab.len());

        // ── Step 4: Encode the corpus ─────────────────────────────────────────
        // Same-corpus text, so UnknownToken cannot fire here. Each
        // encoded song ends with a line-break terminator: the model has
        // to learn where lines and songs end.
        let corpus: Vec<Vec<usize>> = clean_songs
            .iter()
            .map(|text| {
                vocab.encode(text).map(|mut ids| {
                    ids.push(vocab.line_break_id());
                    ids
                })
            })
            .collect::<Result<_, _>>()?;
        let mut sampler = BatchSampler::new(corpus, cfg.seed);

        // ── Step 5: Persist vocab + architecture next to the checkpoints ──────
        let store = CheckpointStore::new(CheckpointStore::dir_for(&cfg.model_name), &cfg.artist_name);
        vocab.save(&store.dir().join("vocab.json"))?;

        let model_cfg = LyricModelConfig::new(vocab.len())
            .with_embed_size(cfg.embed_size)
            .with_cell_size(cfg.cell_size)
            .with_num_layers(cfg.num_layers);
        store.save_config(&model_cfg)?;

        // ── Step 6: Build the model, restoring a checkpoint if asked ──────────
        let device = burn::backend::wgpu::WgpuDevice::default();
        tracing::info!("Using WGPU device: {:?}", device);

        let mut model = model_cfg.init::<TrainBackend>(&device);
        let mut global_step = 0;
        if let Some(load_path) = &cfg.load_path {
            let (restored, step) = CheckpointStore::load(model, &device, load_path)?;
            model = restored;
            global_step = step;
        }
        tracing::info!(
            "Model ready: {} layers, cell_size={}, resuming at step {}",
            cfg.num_layers, cfg.cell_size, global_step,
        );

        // ── Step 7: Run the training loop ─────────────────────────────────────
        let mut ctx = TrainerContext::new(model, cfg.lr, global_step);
        let batcher = LyricBatcher::<TrainBackend>::new(device);
        let mut log = TrainingLog::new(store.dir());

        run_training(cfg, &mut sampler, &batcher, &mut ctx, &store, &mut log)
    }
}
