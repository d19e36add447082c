//! IGV batch script construction
//!
//! This module provides functionality for:
//! - Representing IGV batch directives as typed values
//! - Writing the session preamble (genome, tracks, snapshot settings)
//! - Turning each classified variant into goto/sort/display/snapshot blocks
//!
//! Directives run strictly top to bottom in IGV, so the order in which they
//! are pushed is the order of the final script.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{DisplayMode, ScriptConfig, SortMode};
use crate::error::Result;
use crate::types::{ClassifiedVariant, Locus, Loci, Region, VariantKind};

/// One line of an IGV batch script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    New,
    Genome(String),
    Load(PathBuf),
    SnapshotDirectory(PathBuf),
    MaxPanelHeight(u32),
    Goto(Region),
    Sort(SortMode),
    Display(DisplayMode),
    ViewAsPairs,
    Snapshot(String),
    Exit,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::New => f.write_str("new"),
            Directive::Genome(reference) => write!(f, "genome {reference}"),
            Directive::Load(path) => write!(f, "Load {}", path.display()),
            Directive::SnapshotDirectory(path) => write!(f, "snapshotDirectory {}", path.display()),
            Directive::MaxPanelHeight(height) => write!(f, "maxPanelHeight {height}"),
            Directive::Goto(region) => write!(f, "goto {region}"),
            Directive::Sort(mode) => write!(f, "sort {mode}"),
            Directive::Display(mode) => write!(f, "{mode}"),
            Directive::ViewAsPairs => f.write_str("viewaspairs"),
            Directive::Snapshot(name) => write!(f, "snapshot {name}"),
            Directive::Exit => f.write_str("exit"),
        }
    }
}

/// An ordered, append-only list of directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchScript {
    directives: Vec<Directive>,
}

impl BatchScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Render the script text, one directive per line
    pub fn render(&self) -> String {
        let mut text = String::new();
        for directive in &self.directives {
            text.push_str(&directive.to_string());
            text.push('\n');
        }
        text
    }
}

/// Builds a batch script from classified variants
pub struct ScriptBuilder<'a> {
    config: &'a ScriptConfig,
    script: BatchScript,
    variant_count: usize,
}

impl<'a> ScriptBuilder<'a> {
    /// Start a script and write the session preamble
    pub fn new(config: &'a ScriptConfig) -> Self {
        let mut builder = ScriptBuilder {
            config,
            script: BatchScript::new(),
            variant_count: 0,
        };
        builder.push_session();
        builder.push_snapshot_settings();
        builder
    }

    fn push_session(&mut self) {
        self.script.push(Directive::New);
        self.script.push(Directive::Genome(self.config.reference.clone()));
        for track in &self.config.tracks {
            self.script.push(Directive::Load(track.clone()));
        }
        if let Some(variant_track) = &self.config.variant_track {
            self.script.push(Directive::Load(variant_track.clone()));
        }
    }

    fn push_snapshot_settings(&mut self) {
        self.script
            .push(Directive::SnapshotDirectory(self.config.snapshot_dir.clone()));
        self.script
            .push(Directive::MaxPanelHeight(self.config.panel_height));
    }

    /// Append the snapshot block(s) for one variant
    pub fn add_variant(&mut self, variant: &ClassifiedVariant) {
        self.variant_count += 1;
        let kind = variant.kind();

        match variant.loci() {
            Loci::Single(locus) => {
                let name = format!("{}_{kind}_{locus}", self.config.prefix);
                self.push_locus_block(locus, name);
            }
            Loci::Pair(first, second) => {
                let stem = format!("{}_{kind}_{first}_{second}", self.config.prefix);
                self.push_locus_block(first, format!("{stem}_bp1"));
                self.push_locus_block(second, format!("{stem}_bp2"));
            }
        }

        if matches!(kind, VariantKind::Structural(_) | VariantKind::Bnd) {
            debug!("Queued two breakpoints for {}", variant.variant_summary());
        }
    }

    fn push_locus_block(&mut self, locus: &Locus, snapshot_name: String) {
        self.script
            .push(Directive::Goto(Region::around(locus, self.config.window)));
        self.script.push(Directive::Sort(self.config.sort));
        self.script.push(Directive::Display(self.config.display));
        if self.config.view_as_pairs {
            self.script.push(Directive::ViewAsPairs);
        }
        self.script.push(Directive::Snapshot(snapshot_name));
    }

    /// Number of variants added so far
    pub fn variant_count(&self) -> usize {
        self.variant_count
    }

    /// Append `exit` and hand back the script
    pub fn finish(mut self) -> BatchScript {
        self.script.push(Directive::Exit);
        self.script
    }
}

/// Build a complete snapshot script from a stream of classified variants
///
/// Stops at the first error from the stream; nothing is returned in that
/// case, so no half-built script can reach disk.
pub fn build_script<I>(variants: I, config: &ScriptConfig) -> Result<BatchScript>
where
    I: IntoIterator<Item = Result<ClassifiedVariant>>,
{
    let mut builder = ScriptBuilder::new(config);
    for variant in variants {
        builder.add_variant(&variant?);
    }
    debug!("Built snapshot blocks for {} variants", builder.variant_count());
    Ok(builder.finish())
}

/// Build a load-only session script: `new`, `genome`, and the tracks
///
/// No snapshot settings, no navigation, and no `exit`, so IGV stays open on
/// the loaded session.
pub fn build_session_script(config: &ScriptConfig) -> BatchScript {
    let mut script = BatchScript::new();
    script.push(Directive::New);
    script.push(Directive::Genome(config.reference.clone()));
    for track in &config.tracks {
        script.push(Directive::Load(track.clone()));
    }
    script
}
