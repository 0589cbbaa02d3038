// ============================================================
// ML — Training Loop
// ============================================================
// Custom step-based training loop: sample a window batch, take one
// Adam step, log, and checkpoint every `save_freq` steps. There is no
// natural termination — the operator stops the process, or sets
// `max_steps` to bound the run explicitly.
//
// All mutable training state (parameters, optimizer moments, the
// global step counter) lives in one `TrainerContext` value created at
// process start and threaded through every call.

use anyhow::Result;
use burn::{
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::{LyricBatch, LyricBatcher};
use crate::data::sampler::BatchSampler;
use crate::error::LyricError;
use crate::infra::checkpoint::CheckpointStore;
use crate::infra::metrics::TrainingLog;
use crate::ml::model::LyricModel;

/// Consecutive non-finite losses tolerated before the loop aborts.
const MAX_CONSECUTIVE_UNSTABLE: usize = 5;

/// Owns everything the training loop mutates.
pub struct TrainerContext<B: AutodiffBackend> {
    pub model:       LyricModel<B>,
    pub global_step: usize,
    optim: OptimizerAdaptor<Adam<B::InnerBackend>, LyricModel<B>, B>,
    lr:    f64,
}

impl<B: AutodiffBackend> TrainerContext<B> {
    /// `global_step` is 0 for a fresh run, or the restored checkpoint's
    /// tag when resuming.
    pub fn new(model: LyricModel<B>, lr: f64, global_step: usize) -> Self {
        let optim = AdamConfig::new().with_epsilon(1e-8).init();
        Self { model, global_step, optim, lr }
    }

    /// One training step: batched forward, mean cross-entropy, backward,
    /// Adam update, step counter +1. Returns `(global_step, loss)`.
    ///
    /// A non-finite loss fails with `NumericInstability` BEFORE the
    /// update is applied, leaving the weights untouched for that batch.
    pub fn train_step(&mut self, batch: &LyricBatch<B>) -> Result<(usize, f64), LyricError> {
        let loss = self
            .model
            .forward_loss(batch.inputs.clone(), batch.targets.clone());
        let loss_val: f64 = loss.clone().into_scalar().elem();

        if !loss_val.is_finite() {
            return Err(LyricError::NumericInstability {
                step: self.global_step,
                loss: loss_val,
            });
        }

        let grads = GradientsParams::from_grads(loss.backward(), &self.model);
        self.model = self.optim.step(self.lr, self.model.clone(), grads);
        self.global_step += 1;

        Ok((self.global_step, loss_val))
    }
}

/// Drive the loop until `max_steps` is reached (or forever when unset).
pub fn run_training<B: AutodiffBackend>(
    cfg:     &TrainConfig,
    sampler: &mut BatchSampler,
    batcher: &LyricBatcher<B>,
    ctx:     &mut TrainerContext<B>,
    store:   &CheckpointStore,
    log:     &mut TrainingLog,
) -> Result<()> {
    let mut unstable_run = 0usize;

    while cfg.max_steps.map_or(true, |limit| ctx.global_step < limit) {
        let batch = sampler.next_batch(cfg.batch_size, cfg.seq_len)?;
        let tensors = batcher.batch(&batch);

        match ctx.train_step(&tensors) {
            Ok((step, loss)) => {
                unstable_run = 0;
                println!("Step: {} | loss: {:.6}", step, loss);
                log.append(step, loss)?;

                if step % cfg.save_freq == 0 {
                    let path = store.save(&ctx.model, step)?;
                    tracing::info!("Saved checkpoint '{}'", path.display());
                }
            }
            Err(err @ LyricError::NumericInstability { .. }) => {
                unstable_run += 1;
                tracing::warn!("{err}; skipping batch ({unstable_run} consecutive)");
                if unstable_run >= MAX_CONSECUTIVE_UNSTABLE {
                    return Err(err.into());
                }
            }
            Err(err) => return Err(err.into()),
        }
    }

    tracing::info!("Reached max_steps at step {}", ctx.global_step);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::LyricModelConfig;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray<f32>>;

    fn tiny_setup() -> (TrainerContext<TestBackend>, LyricBatcher<TestBackend>, BatchSampler) {
        let device = Default::default();
        let model = LyricModelConfig::new(6)
            .with_embed_size(8)
            .with_cell_size(8)
            .with_num_layers(1)
            .init::<TestBackend>(&device);
        let ctx = TrainerContext::new(model, 1e-2, 0);
        let batcher = LyricBatcher::new(device);
        let songs: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3, 4, 5, 1, 2, 3, 4]];
        (ctx, batcher, BatchSampler::new(songs, Some(1)))
    }

    #[test]
    fn test_train_step_increments_global_step_once() {
        let (mut ctx, batcher, mut sampler) = tiny_setup();
        let batch = batcher.batch(&sampler.next_batch(2, 3).unwrap());

        let (step, loss) = ctx.train_step(&batch).unwrap();
        assert_eq!(step, 1);
        assert_eq!(ctx.global_step, 1);
        assert!(loss.is_finite() && loss >= 0.0);

        let (step, _) = ctx.train_step(&batch).unwrap();
        assert_eq!(step, 2);
    }

    #[test]
    fn test_bounded_run_checkpoints_on_cadence() {
        // save_freq 5, max_steps 7: a snapshot must exist for step 5
        // and must not exist for step 3.
        let (mut ctx, batcher, mut sampler) = tiny_setup();

        let dir = std::env::temp_dir()
            .join(format!("lyric-gen-trainer-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let store = CheckpointStore::new(&dir, "test_artist");
        let mut log = TrainingLog::new(&dir);

        let cfg = TrainConfig {
            seq_len:    3,
            batch_size: 2,
            save_freq:  5,
            max_steps:  Some(7),
            ..TrainConfig::default()
        };

        run_training(&cfg, &mut sampler, &batcher, &mut ctx, &store, &mut log).unwrap();

        assert_eq!(ctx.global_step, 7);
        assert!(dir.join("test_artist.ckpt-5.mpk").exists());
        assert!(!dir.join("test_artist.ckpt-3.mpk").exists());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
