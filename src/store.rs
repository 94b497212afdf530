use indicatif::ParallelProgressIterator;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::records::{self, ParseError};
use super::stops::Tram;
use super::utils::progress_bar_for_count;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("load failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("load failed: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// All loaded trams plus the stop to tram lookup derived from them.
/// Filled once at startup, read-only while answering queries.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    trams: BTreeMap<u32, Tram>,
    stop_index: HashMap<String, Vec<u32>>,
    stop_column_width: usize,
}

impl ScheduleStore {
    /// Reads and parses one schedule file, returning the tram number it was stored under.
    pub fn add_tram(&mut self, path: &Path) -> Result<u32, LoadError> {
        let tram = read_tram(path)?;
        Ok(self.insert(tram))
    }

    /// Parses `paths` in parallel, then inserts them in order so a later file
    /// wins when two files share a tram number. Failed files are skipped.
    pub fn load_all(&mut self, paths: &[PathBuf]) -> Vec<(PathBuf, LoadError)> {
        info!("Loading {} schedule files", paths.len());
        let progress = progress_bar_for_count(paths.len());
        let parsed: Vec<(&PathBuf, Result<Tram, LoadError>)> = paths
            .par_iter()
            .progress_with(progress)
            .map(|path| (path, read_tram(path)))
            .collect();

        let mut failures = Vec::new();
        for (path, result) in parsed {
            match result {
                Ok(tram) => {
                    let number = self.insert(tram);
                    debug!("Loaded tram {} from {}", number, path.display());
                }
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    failures.push((path.clone(), err));
                }
            }
        }
        info!("Loaded {} trams", self.trams.len());
        failures
    }

    /// Stores `tram`, replacing any tram with the same number.
    pub fn insert(&mut self, tram: Tram) -> u32 {
        let number = tram.number;
        if self.trams.contains_key(&number) {
            warn!("Tram {} loaded twice, keeping the latest schedule", number);
            for trams in self.stop_index.values_mut() {
                trams.retain(|tram_number| *tram_number != number);
            }
            self.stop_index.retain(|_, trams| !trams.is_empty());
        }

        for stop in &tram.stops {
            self.stop_index
                .entry(stop.name.clone())
                .or_default()
                .push(number);
        }
        self.stop_column_width = self.stop_column_width.max(tram.longest_stop_name());
        self.trams.insert(number, tram);
        number
    }

    pub fn tram(&self, number: u32) -> Option<&Tram> {
        self.trams.get(&number)
    }

    /// Trams calling at `stop`, in the order they were loaded.
    pub fn trams_at_stop(&self, stop: &str) -> impl Iterator<Item = &Tram> {
        self.stop_index
            .get(stop)
            .into_iter()
            .flatten()
            .filter_map(|number| self.trams.get(number))
    }

    pub fn stop_column_width(&self) -> usize {
        self.stop_column_width
    }

    pub fn list_trams(&self) -> Vec<String> {
        self.trams.keys().map(|number| number.to_string()).collect()
    }

    pub fn list_stops(&self) -> Vec<String> {
        let mut stops: Vec<String> = self.stop_index.keys().cloned().collect();
        stops.sort();
        stops
    }
}

fn read_tram(path: &Path) -> Result<Tram, LoadError> {
    let text = records::read_file(path)?;
    records::parse(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
