use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::config::MirrorConfig;

/// An identity change to forward to the remote user directory.
/// Only ids and names ever leave the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum MirrorNotice {
    Upsert { id: String, name: String },
    Delete { id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("could not write mirror outbox {path}: {source}")]
    Outbox { path: PathBuf, source: io::Error },
    #[error("could not encode mirror notice: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Destination for identity notices
pub trait Mirror {
    fn send(&mut self, notice: &MirrorNotice) -> Result<(), MirrorError>;
}

/// Drops every notice
#[derive(Debug, Default)]
pub struct NullMirror;

impl Mirror for NullMirror {
    fn send(&mut self, _notice: &MirrorNotice) -> Result<(), MirrorError> {
        Ok(())
    }
}

/// Appends one JSON line per notice for an external uploader to drain
#[derive(Debug, Clone)]
pub struct OutboxMirror {
    path: PathBuf,
}

impl OutboxMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutboxMirror { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Mirror for OutboxMirror {
    fn send(&mut self, notice: &MirrorNotice) -> Result<(), MirrorError> {
        let line = serde_json::to_string(notice)?;
        let outbox_err = |e| MirrorError::Outbox {
            path: self.path.clone(),
            source: e,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(outbox_err)?;
        writeln!(file, "{}", line).map_err(outbox_err)
    }
}

/// Build the mirror described by the config
pub fn from_config(data_dir: &Path, config: &MirrorConfig) -> Box<dyn Mirror> {
    if config.enabled {
        Box::new(OutboxMirror::new(data_dir.join(&config.outbox)))
    } else {
        Box::new(NullMirror)
    }
}

/// Send every notice, best effort. Failures never reach the caller.
pub fn dispatch(mirror: &mut dyn Mirror, notices: &[MirrorNotice]) {
    for notice in notices {
        if let Err(e) = mirror.send(notice) {
            tracing::debug!(error = %e, "identity mirror failed");
        }
    }
}
