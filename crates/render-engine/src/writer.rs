//! JSONL frame log.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use peeper_common::error::{PeeperError, PeeperResult};
use peeper_widget_model::PupilFrame;

/// First line of a frame log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLogHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Widget size the frames were painted at (the first size, if the
    /// widget was reconfigured mid-log).
    pub size: f64,

    /// Wall-clock time at mount (RFC 3339).
    pub epoch_wall: String,
}

/// Writes painted frames to a JSONL file, one frame per line.
pub struct FrameWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    frames_written: u64,
}

impl FrameWriter {
    /// Create the file, writing the header as a `#`-prefixed first line.
    pub fn create(path: impl AsRef<Path>, header: &FrameLogHeader) -> PeeperResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        let header_json = serde_json::to_string(header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| PeeperError::render(format!("Failed to write frame header: {e}")))?;

        Ok(Self {
            writer,
            path,
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, frame: &PupilFrame) -> PeeperResult<()> {
        let json = serde_json::to_string(frame)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| PeeperError::render(format!("Failed to write frame: {e}")))?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> PeeperResult<()> {
        self.writer
            .flush()
            .map_err(|e| PeeperError::render(format!("Failed to flush frames: {e}")))
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Parse frames from JSONL content, skipping the header and blank lines.
pub fn parse_frames(jsonl: &str) -> PeeperResult<Vec<PupilFrame>> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| serde_json::from_str(line).map_err(PeeperError::from))
        .collect()
}
