// ============================================================
// Infra — Checkpoint Store
// ============================================================
// Whole-snapshot persistence of model parameters, tagged with the
// global step that produced them.
//
// Files in the save directory:
//   {artist}.ckpt-{step}.mpk   ← parameters at that step (all kept)
//   latest.json                ← step of the newest snapshot
//   model_config.json          ← architecture, to rebuild before loading
//   vocab.json                 ← written by the training use case
//
// Every write goes to a hidden .tmp sibling first and is then renamed
// into place, so an interrupted save never corrupts an existing
// checkpoint. Snapshots use the full-precision named-MessagePack
// recorder; a restored model is bit-identical to the saved one.

use std::{
    fs,
    path::{Path, PathBuf},
};

use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};

use crate::error::LyricError;
use crate::ml::model::{LyricModel, LyricModelConfig};

pub struct CheckpointStore {
    dir:    PathBuf,
    artist: String,
}

impl CheckpointStore {
    /// The save directory derived from the model name.
    pub fn dir_for(model_name: &str) -> PathBuf {
        PathBuf::from("save").join("models").join(model_name)
    }

    pub fn new(dir: impl Into<PathBuf>, artist: impl Into<String>) -> Self {
        let dir = dir.into();
        fs::create_dir_all(&dir).ok();
        Self { dir, artist: artist.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist the parameters as `{artist}.ckpt-{step}.mpk` and advance
    /// the latest-step pointer. Returns the published path.
    pub fn save<B: Backend>(
        &self,
        model: &LyricModel<B>,
        step:  usize,
    ) -> Result<PathBuf, LyricError> {
        let stem = format!("{}.ckpt-{}", self.artist, step);
        // The recorder appends .mpk to whatever base it is given.
        let tmp_base   = self.dir.join(format!(".{stem}.tmp"));
        let tmp_file   = self.dir.join(format!(".{stem}.tmp.mpk"));
        let final_file = self.dir.join(format!("{stem}.mpk"));

        NamedMpkFileRecorder::<FullPrecisionSettings>::new()
            .record(model.clone().into_record(), tmp_base)
            .map_err(|e| checkpoint_err(&final_file, format!("cannot write snapshot: {e}")))?;

        fs::rename(&tmp_file, &final_file)
            .map_err(|e| checkpoint_err(&final_file, format!("cannot publish snapshot: {e}")))?;

        self.write_latest(step)?;
        Ok(final_file)
    }

    /// Restore parameters from a snapshot path (with or without the
    /// .mpk extension) and recover the global step from its name tag.
    pub fn load<B: Backend>(
        model:  LyricModel<B>,
        device: &B::Device,
        path:   &Path,
    ) -> Result<(LyricModel<B>, usize), LyricError> {
        let (base, file) = split_snapshot_path(path);

        if !file.exists() {
            return Err(checkpoint_err(&file, "file does not exist".into()));
        }
        let step = step_from_tag(&file)?;

        let record = NamedMpkFileRecorder::<FullPrecisionSettings>::new()
            .load(base, device)
            .map_err(|e| checkpoint_err(&file, format!("cannot read snapshot: {e}")))?;

        tracing::info!("Restored checkpoint '{}' at step {}", file.display(), step);
        Ok((model.load_record(record), step))
    }

    /// Path of the newest snapshot in this store, if one exists.
    pub fn latest(&self) -> Option<PathBuf> {
        let pointer = fs::read_to_string(self.dir.join("latest.json")).ok()?;
        let step: usize = serde_json::from_str(&pointer).ok()?;
        let path = self.dir.join(format!("{}.ckpt-{}.mpk", self.artist, step));
        path.exists().then_some(path)
    }

    /// Persist the architecture so a later generation run can rebuild
    /// the exact model before loading weights into it.
    pub fn save_config(&self, config: &LyricModelConfig) -> anyhow::Result<()> {
        let path = self.dir.join("model_config.json");
        config.save(&path)?;
        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Option<LyricModelConfig> {
        LyricModelConfig::load(self.dir.join("model_config.json")).ok()
    }

    fn write_latest(&self, step: usize) -> Result<(), LyricError> {
        let tmp   = self.dir.join(".latest.tmp");
        let path  = self.dir.join("latest.json");
        fs::write(&tmp, step.to_string())
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| checkpoint_err(&path, format!("cannot update latest pointer: {e}")))
    }
}

fn checkpoint_err(path: &Path, reason: String) -> LyricError {
    LyricError::Checkpoint { path: path.display().to_string(), reason }
}

/// Accepts `.../name.ckpt-500` or `.../name.ckpt-500.mpk` and returns
/// (recorder base path, actual file path).
fn split_snapshot_path(path: &Path) -> (PathBuf, PathBuf) {
    if path.extension().and_then(|e| e.to_str()) == Some("mpk") {
        (path.with_extension(""), path.to_path_buf())
    } else {
        let mut file = path.as_os_str().to_owned();
        file.push(".mpk");
        (path.to_path_buf(), PathBuf::from(file))
    }
}

/// Recover the global step from the `ckpt-{step}` filename tag.
fn step_from_tag(file: &Path) -> Result<usize, LyricError> {
    file.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.rsplit_once("ckpt-"))
        .and_then(|(_, tag)| tag.parse().ok())
        .ok_or_else(|| checkpoint_err(file, "filename carries no ckpt-{step} tag".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray<f32>;

    fn scratch_store(name: &str) -> CheckpointStore {
        let dir = std::env::temp_dir().join(format!("lyric-gen-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        CheckpointStore::new(dir, "test_artist")
    }

    fn tiny_model(device: &<TestBackend as Backend>::Device) -> LyricModel<TestBackend> {
        LyricModelConfig::new(5)
            .with_embed_size(4)
            .with_cell_size(4)
            .with_num_layers(1)
            .init(device)
    }

    #[test]
    fn test_save_then_load_restores_parameters_and_step() {
        let device = Default::default();
        let store = scratch_store("ckpt-roundtrip");
        let model = tiny_model(&device);

        let path = store.save(&model, 42).unwrap();
        let (restored, step) = CheckpointStore::load(tiny_model(&device), &device, &path).unwrap();
        assert_eq!(step, 42);

        // Full-precision recorder: the restored model must produce
        // bit-identical logits.
        let input = Tensor::<TestBackend, 1, Int>::from_ints([0, 1, 2].as_slice(), &device)
            .reshape([1, 3]);
        let (a, _) = model.forward(input.clone(), None);
        let (b, _) = restored.forward(input, None);
        let a: Vec<f32> = a.into_data().to_vec().unwrap();
        let b: Vec<f32> = b.into_data().to_vec().unwrap();
        assert_eq!(a, b);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_load_accepts_path_without_extension() {
        let device = Default::default();
        let store = scratch_store("ckpt-noext");
        let model = tiny_model(&device);

        let path = store.save(&model, 7).unwrap();
        let bare = path.with_extension("");
        let (_, step) = CheckpointStore::load(tiny_model(&device), &device, &bare).unwrap();
        assert_eq!(step, 7);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_missing_snapshot_is_a_checkpoint_error() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let missing = Path::new("/nonexistent/x.ckpt-3.mpk");
        let err = CheckpointStore::load(tiny_model(&device), &device, missing).unwrap_err();
        assert!(matches!(err, LyricError::Checkpoint { .. }));
    }

    #[test]
    fn test_no_tmp_files_left_after_save() {
        let device = Default::default();
        let store = scratch_store("ckpt-tmp");
        store.save(&tiny_model(&device), 1).unwrap();

        let leftovers = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_latest_points_at_newest_snapshot() {
        let device = Default::default();
        let store = scratch_store("ckpt-latest");
        let model = tiny_model(&device);
        store.save(&model, 5).unwrap();
        let newest = store.save(&model, 10).unwrap();

        assert_eq!(store.latest().unwrap(), newest);

        fs::remove_dir_all(store.dir()).unwrap();
    }
}
