//! Scoring a list of files against one shared scorer.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use synscore_ai::{InferenceBackend, ScoreError, Scorer};
use synscore_core::ClassificationResult;

use crate::input::load_image;

pub struct FileOutcome {
    pub path: PathBuf,
    pub result: anyhow::Result<Vec<ClassificationResult>>,
}

impl FileOutcome {
    /// Pipeline stage that failed, when the failure came from scoring rather than loading.
    pub fn failed_stage(&self) -> Option<&'static str> {
        self.result
            .as_ref()
            .err()
            .and_then(|e| e.downcast_ref::<ScoreError>())
            .map(|e| e.stage().as_str())
    }
}

/// Score every file, using up to `jobs` threads. Outcomes keep input order.
///
/// A failing file does not stop the others.
pub fn score_files<B: InferenceBackend>(
    scorer: &Scorer<B>,
    files: &[PathBuf],
    jobs: usize,
) -> Vec<FileOutcome> {
    let jobs = jobs.clamp(1, files.len().max(1));
    let next = AtomicUsize::new(0);

    let mut scored: Vec<(usize, FileOutcome)> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..jobs)
            .map(|_| {
                s.spawn(|| {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = files.get(i) else { break };
                        done.push((i, score_file(scorer, path)));
                    }
                    done
                })
            })
            .collect();

        workers
            .into_iter()
            .flat_map(|w| w.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });

    scored.sort_by_key(|(i, _)| *i);
    scored.into_iter().map(|(_, outcome)| outcome).collect()
}

fn score_file<B: InferenceBackend>(scorer: &Scorer<B>, path: &Path) -> FileOutcome {
    let result = load_image(path).and_then(|image| Ok(scorer.score(&image)?));
    FileOutcome {
        path: path.to_path_buf(),
        result,
    }
}
