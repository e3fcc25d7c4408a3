//! One-time, single-flight loading of the reference catalogue.
//!
//! The fetch runs on a background thread and reports back over a channel.
//! Callers poll from their frame loop; a second `begin` while a load is in
//! flight (or after it resolved) does nothing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use tracing::{error, info};

use crate::card::ReferenceDeck;
use crate::error::{PopupError, Result};

/// Where the reference catalogue comes from
pub trait ReferenceSource: Send + Sync {
    fn fetch(&self) -> Result<ReferenceDeck>;

    /// Human readable origin, used in logs
    fn describe(&self) -> String;
}

/// Reads the catalogue from a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReferenceSource for JsonFileSource {
    fn fetch(&self) -> Result<ReferenceDeck> {
        let text = fs::read_to_string(&self.path).map_err(|source| PopupError::Io {
            path: self.path.clone(),
            source,
        })?;
        ReferenceDeck::from_json(&text).map_err(|source| PopupError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// An already-built catalogue, handy for embedding and tests
impl ReferenceSource for ReferenceDeck {
    fn fetch(&self) -> Result<ReferenceDeck> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory deck ({} cards)", self.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Unloaded,
    Loading,
    Loaded,
    Failed,
}

impl LoadStatus {
    /// Loaded or failed: either way nothing more will happen
    pub fn is_resolved(&self) -> bool {
        matches!(self, LoadStatus::Loaded | LoadStatus::Failed)
    }
}

enum LoadState {
    Unloaded,
    Loading(Receiver<Result<ReferenceDeck>>),
    Loaded(ReferenceDeck),
    Failed,
}

pub struct ReferenceLoader {
    source: Arc<dyn ReferenceSource>,
    state: LoadState,
}

impl ReferenceLoader {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self {
            source,
            state: LoadState::Unloaded,
        }
    }

    /// A loader that starts out resolved with `deck`
    pub fn preloaded(deck: ReferenceDeck) -> Self {
        Self {
            source: Arc::new(deck.clone()),
            state: LoadState::Loaded(deck),
        }
    }

    pub fn status(&self) -> LoadStatus {
        match self.state {
            LoadState::Unloaded => LoadStatus::Unloaded,
            LoadState::Loading(_) => LoadStatus::Loading,
            LoadState::Loaded(_) => LoadStatus::Loaded,
            LoadState::Failed => LoadStatus::Failed,
        }
    }

    /// The catalogue, once loaded. `None` while unloaded, loading or failed.
    pub fn deck(&self) -> Option<&ReferenceDeck> {
        match &self.state {
            LoadState::Loaded(deck) => Some(deck),
            _ => None,
        }
    }

    /// Start the fetch if nobody has yet. Returns true if this call started it.
    pub fn begin(&mut self) -> bool {
        if !matches!(self.state, LoadState::Unloaded) {
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        thread::spawn(move || {
            // Receiver may be gone if the popup was dropped mid-load
            let _ = tx.send(source.fetch());
        });
        self.state = LoadState::Loading(rx);
        true
    }

    /// Non-blocking check on an in-flight load
    pub fn poll(&mut self) -> LoadStatus {
        let outcome = match &self.state {
            LoadState::Loading(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return LoadStatus::Loading,
                Err(TryRecvError::Disconnected) => Err(PopupError::LoaderDisconnected),
            },
            _ => return self.status(),
        };
        self.settle(outcome);
        self.status()
    }

    /// Block until the load resolves, starting it if needed
    pub fn wait(&mut self) -> LoadStatus {
        self.begin();
        let outcome = match &self.state {
            LoadState::Loading(rx) => rx.recv().unwrap_or(Err(PopupError::LoaderDisconnected)),
            _ => return self.status(),
        };
        self.settle(outcome);
        self.status()
    }

    fn settle(&mut self, outcome: Result<ReferenceDeck>) {
        self.state = match outcome {
            Ok(deck) => {
                info!(
                    source = %self.source.describe(),
                    cards = deck.len(),
                    "reference deck loaded"
                );
                LoadState::Loaded(deck)
            }
            Err(err) => {
                error!(source = %self.source.describe(), "failed to load reference deck: {err}");
                LoadState::Failed
            }
        };
    }
}
