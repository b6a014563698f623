use std::{
    fs::OpenOptions,
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};

use tracing::warn;

use crate::trace::trace::GenerationTrace;

/// Append-only JSONL sink for generation traces. Never fails the caller.
pub struct TraceLogger {
    file: Option<Arc<Mutex<std::fs::File>>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Arc::new(Mutex::new(f))),
            },
            Err(e) => {
                warn!("could not open trace file '{}': {}", path.display(), e);
                Self { file: None }
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    /// Append one record. The write happens on the blocking pool.
    pub async fn log(&self, event: &GenerationTrace) {
        let file = match &self.file {
            Some(f) => Arc::clone(f),
            None => return, // tracing disabled
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                warn!("failed to serialize trace event: {}", e);
                return;
            }
        };

        let written = tokio::task::spawn_blocking(move || {
            let mut file = file
                .lock()
                .map_err(|e| std::io::Error::other(format!("trace logger lock poisoned: {}", e)))?;
            writeln!(file, "{}", json)
        })
        .await;

        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("failed to write trace event: {}", e),
            Err(e) => warn!("trace write task failed: {}", e),
        }
    }
}
