use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thirtyone_core::game::trial::TrialRecord;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("{context} {path:?}: {source}")]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("trial {index} has {found} seats, expected {expected}")]
    RaggedRecords {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Writes one CSV per run into a directory, numbering files `0.csv`, `1.csv`, ...
pub struct RecordWriter {
    dir: PathBuf,
}

impl RecordWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RecorderError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| RecorderError::Io {
            context: "creating records directory",
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes every record to the first unused `N.csv`.
    ///
    /// Returns `Ok(None)` without touching the directory when there is
    /// nothing to export.
    pub fn write(&self, records: &[TrialRecord]) -> Result<Option<PathBuf>, RecorderError> {
        let Some(first) = records.first() else {
            warn!(dir = %self.dir.display(), "no data to export");
            return Ok(None);
        };
        let seats = first.players.len();
        for (index, record) in records.iter().enumerate() {
            if record.players.len() != seats {
                return Err(RecorderError::RaggedRecords {
                    index,
                    expected: seats,
                    found: record.players.len(),
                });
            }
        }

        let (path, file) = self.claim_next_file()?;
        let io_err = |source| RecorderError::Io {
            context: "writing records to",
            path: path.clone(),
            source,
        };

        let mut writer = BufWriter::new(file);
        write_header(&mut writer, seats).map_err(io_err)?;
        for record in records {
            write_row(&mut writer, record).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;

        info!(path = %path.display(), rows = records.len(), "records exported");
        Ok(Some(path))
    }

    /// Creates the lowest-numbered CSV that does not exist yet; never truncates.
    fn claim_next_file(&self) -> Result<(PathBuf, File), RecorderError> {
        let mut number = 0usize;
        loop {
            let path = self.dir.join(format!("{number}.csv"));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => number += 1,
                Err(source) => {
                    return Err(RecorderError::Io {
                        context: "creating records file",
                        path,
                        source,
                    });
                }
            }
        }
    }
}

fn write_header(writer: &mut impl Write, seats: usize) -> io::Result<()> {
    write!(writer, "winner,turns")?;
    for seat in 0..seats {
        write!(writer, ",{seat}_hand,{seat}_val")?;
    }
    writeln!(writer)
}

fn write_row(writer: &mut impl Write, record: &TrialRecord) -> io::Result<()> {
    write!(writer, "{},{}", record.winner, record.turns)?;
    for seat in &record.players {
        write!(writer, ",{},{}", seat.hand, seat.value)?;
    }
    writeln!(writer)
}
