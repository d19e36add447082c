//! Display options and script configuration

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

pub const DEFAULT_REFERENCE: &str = "hg19";
pub const DEFAULT_WINDOW: u64 = 100;
pub const DEFAULT_PANEL_HEIGHT: u32 = 500;

// Everything from the character before the first "vcf" onwards
static VCF_SUFFIX_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".vcf.*").expect("vcf suffix pattern is valid"));

/// How IGV lays out reads in alignment tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayMode {
    #[default]
    Squish,
    Collapse,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Squish => "squish",
            DisplayMode::Collapse => "collapse",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "squish" => Ok(DisplayMode::Squish),
            "collapse" => Ok(DisplayMode::Collapse),
            other => Err(Error::configuration(format!(
                "unknown display mode '{other}' (expected squish or collapse)"
            ))),
        }
    }
}

/// Read ordering applied at each locus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortMode {
    #[default]
    Strand,
    Base,
    Position,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Strand => "strand",
            SortMode::Base => "base",
            SortMode::Position => "position",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strand" => Ok(SortMode::Strand),
            "base" => Ok(SortMode::Base),
            "position" => Ok(SortMode::Position),
            other => Err(Error::configuration(format!(
                "unknown sort mode '{other}' (expected strand, base or position)"
            ))),
        }
    }
}

/// Everything the script builder needs besides the variants themselves
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    /// Reference genome identifier passed to `genome`
    pub reference: String,
    /// Auxiliary tracks (BAM/BED/VCF), loaded in order
    pub tracks: Vec<PathBuf>,
    /// The variant file itself, loaded after the auxiliary tracks when set
    pub variant_track: Option<PathBuf>,
    pub snapshot_dir: PathBuf,
    pub panel_height: u32,
    /// Flank in bp on each side of a locus
    pub window: u64,
    pub display: DisplayMode,
    pub sort: SortMode,
    pub view_as_pairs: bool,
    pub prefix: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        ScriptConfig {
            reference: DEFAULT_REFERENCE.to_string(),
            tracks: Vec::new(),
            variant_track: None,
            snapshot_dir: PathBuf::from("."),
            panel_height: DEFAULT_PANEL_HEIGHT,
            window: DEFAULT_WINDOW,
            display: DisplayMode::default(),
            sort: SortMode::default(),
            view_as_pairs: true,
            prefix: String::new(),
        }
    }
}

impl ScriptConfig {
    /// Reject values IGV would choke on before any input is read
    pub fn validate(&self) -> Result<()> {
        if self.reference.trim().is_empty() {
            return Err(Error::configuration("reference genome must not be empty"));
        }
        if self.panel_height == 0 {
            return Err(Error::configuration("panel height must be positive"));
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(Error::configuration(format!(
                "snapshot prefix '{}' must not contain whitespace",
                self.prefix
            )));
        }
        Ok(())
    }
}

/// Derive a snapshot prefix from the variant file name
///
/// `sample.tumor.vcf.gz` becomes `sample_tumor`; names without `vcf` keep
/// their full basename with dots replaced.
pub fn derive_prefix(variant_path: &Path) -> String {
    let basename = variant_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    VCF_SUFFIX_PATTERN
        .replace(&basename, "")
        .replace('.', "_")
}
