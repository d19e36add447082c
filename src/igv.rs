//! Headless IGV execution
//!
//! Runs a finished batch script through IGV under `xvfb-run`, so snapshots
//! can be taken on machines without a display.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::Instant;
use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_MEMORY_MB: u32 = 4000;

/// How to launch IGV
#[derive(Debug, Clone)]
pub struct IgvRunner {
    pub jar: PathBuf,
    pub java: PathBuf,
    pub xvfb_run: PathBuf,
    /// JVM heap limit, passed as `-Xmx<n>m`
    pub memory_mb: u32,
}

impl IgvRunner {
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        IgvRunner {
            jar: jar.into(),
            java: PathBuf::from("java"),
            xvfb_run: PathBuf::from("xvfb-run"),
            memory_mb: DEFAULT_MEMORY_MB,
        }
    }

    /// Arguments passed to `xvfb-run` for a given script
    pub fn command_args(&self, script: &Path) -> Vec<String> {
        vec![
            "--auto-servernum".to_string(),
            "--server-num=1".to_string(),
            self.java.display().to_string(),
            format!("-Xmx{}m", self.memory_mb),
            "-jar".to_string(),
            self.jar.display().to_string(),
            "-b".to_string(),
            script.display().to_string(),
        ]
    }

    /// Full command line, for logging
    pub fn command_line(&self, script: &Path) -> String {
        let mut parts = vec![self.xvfb_run.display().to_string()];
        parts.extend(self.command_args(script));
        parts.join(" ")
    }

    /// Run IGV on `script` and wait for it; returns the wall-clock time taken
    pub async fn run(&self, script: &Path) -> Result<Duration> {
        if self.memory_mb == 0 {
            return Err(Error::configuration("IGV memory limit must be positive"));
        }
        if !self.jar.is_file() {
            return Err(Error::external_tool(format!(
                "IGV jar not found at {}",
                self.jar.display()
            )));
        }

        info!("IGV command is: {}", self.command_line(script));
        let start_time = Instant::now();

        let status = Command::new(&self.xvfb_run)
            .args(self.command_args(script))
            .status()
            .await
            .map_err(|e| {
                Error::external_tool(format!(
                    "failed to launch {}: {e}",
                    self.xvfb_run.display()
                ))
            })?;

        let elapsed = start_time.elapsed();
        if !status.success() {
            return Err(Error::external_tool(format!(
                "IGV exited with {status} after {elapsed:.1?}"
            )));
        }

        info!("IGV finished; elapsed time is {:.1?}", elapsed);
        Ok(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let runner = IgvRunner {
            memory_mb: 2048,
            ..IgvRunner::new("/opt/igv/igv.jar")
        };
        assert_eq!(
            runner.command_line(Path::new("/data/calls.vcf.bat")),
            "xvfb-run --auto-servernum --server-num=1 java -Xmx2048m -jar /opt/igv/igv.jar -b /data/calls.vcf.bat"
        );
    }

    #[tokio::test]
    async fn test_missing_jar_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = IgvRunner::new(dir.path().join("igv.jar"));
        let err = runner.run(Path::new("script.bat")).await.unwrap_err();
        assert!(matches!(err, Error::ExternalTool { .. }));
    }

    #[tokio::test]
    async fn test_missing_launcher_is_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("igv.jar");
        std::fs::write(&jar, b"").unwrap();

        let runner = IgvRunner {
            xvfb_run: dir.path().join("no-such-xvfb-run"),
            ..IgvRunner::new(&jar)
        };
        let err = runner.run(Path::new("script.bat")).await.unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }

    #[tokio::test]
    async fn test_zero_memory_is_configuration_error() {
        let runner = IgvRunner {
            memory_mb: 0,
            ..IgvRunner::new("igv.jar")
        };
        let err = runner.run(Path::new("script.bat")).await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }
}
