//! Batch script output
//!
//! This module provides functionality for:
//! - Choosing where a batch script is written
//! - Writing a finished [`BatchScript`] to disk in one go
//!
//! Scripts are only written once fully built, so a failed run never leaves a
//! truncated script behind that IGV could still execute.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::script::BatchScript;

/// Default script location for a variant file: `<input>.bat` next to it
pub fn default_batch_path(variant_path: &Path) -> PathBuf {
    let mut name = variant_path.as_os_str().to_owned();
    name.push(".bat");
    PathBuf::from(name)
}

/// Default script location for a session-only script: `<prefix>.bat`
pub fn session_batch_path(prefix: &str) -> PathBuf {
    PathBuf::from(format!("{prefix}.bat"))
}

/// Buffered writer for a batch script file
pub struct ScriptOutput {
    writer: BufWriter<File>,
    path: PathBuf,
    lines_written: usize,
}

impl ScriptOutput {
    /// Create (or truncate) the script file
    pub fn new(path: PathBuf) -> Result<Self> {
        let file = File::create(&path)
            .map_err(|e| Error::io(format!("creating batch script {}", path.display()), e))?;

        Ok(ScriptOutput {
            writer: BufWriter::new(file),
            path,
            lines_written: 0,
        })
    }

    /// Write one directive line
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}")
            .map_err(|e| Error::io(format!("writing {}", self.path.display()), e))?;
        self.lines_written += 1;
        Ok(())
    }

    /// Write every directive of a script
    pub fn write_script(&mut self, script: &BatchScript) -> Result<()> {
        for directive in script.directives() {
            self.write_line(&directive.to_string())?;
        }
        Ok(())
    }

    /// Flush and close the file, returning its path
    pub fn finalize(mut self) -> Result<PathBuf> {
        self.writer
            .flush()
            .map_err(|e| Error::io(format!("flushing {}", self.path.display()), e))?;
        debug!("Flushed {} lines to {}", self.lines_written, self.path.display());
        Ok(self.path)
    }
}

/// Write a complete script to `path` and return the path
pub fn write_batch_script(script: &BatchScript, path: &Path) -> Result<PathBuf> {
    let mut output = ScriptOutput::new(path.to_path_buf())?;
    output.write_script(script)?;
    let path = output.finalize()?;
    info!("Wrote {} directives to {}", script.len(), path.display());
    Ok(path)
}
