// ============================================================
// Infra — Training Metrics Log
// ============================================================
// Appends one `step,loss` row per training step to a CSV file in the
// save directory, so a run's learning curve survives the process and
// can be plotted later.

use anyhow::Result;
use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
};

pub struct TrainingLog {
    path: PathBuf,
}

impl TrainingLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { path: dir.into().join("metrics.csv") }
    }

    /// Append one row, writing the header first on a fresh file.
    pub fn append(&mut self, step: usize, loss: f64) -> Result<()> {
        let fresh = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if fresh {
            writeln!(file, "step,loss")?;
        }
        writeln!(file, "{},{:.6}", step, loss)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_accumulate_with_single_header() {
        let dir = std::env::temp_dir()
            .join(format!("lyric-gen-metrics-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let mut log = TrainingLog::new(&dir);
        log.append(1, 5.25).unwrap();
        log.append(2, 4.75).unwrap();

        let contents = std::fs::read_to_string(dir.join("metrics.csv")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "step,loss");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1,"));

        std::fs::remove_dir_all(dir).unwrap();
    }
}
