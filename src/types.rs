// Common data structures and types used throughout varsnap

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A single genomic position, written `chrom:pos`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locus {
    pub chrom: String,
    pub pos: u64,
}

impl Locus {
    pub fn new(chrom: impl Into<String>, pos: u64) -> Self {
        Locus {
            chrom: chrom.into(),
            pos,
        }
    }
}

impl FromStr for Locus {
    type Err = Error;

    /// Parse `chrom:pos`. The coordinate follows the last colon so contig
    /// names such as `HLA-A*01:01` stay intact.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some((chrom, pos_str)) = s.rsplit_once(':') else {
            return Err(Error::input_format(format!(
                "locus '{s}' is not of the form chromosome:position"
            )));
        };

        if chrom.is_empty() {
            return Err(Error::input_format(format!(
                "locus '{s}' has an empty chromosome name"
            )));
        }

        let pos = pos_str.parse::<u64>().map_err(|_| {
            Error::input_format(format!(
                "locus '{s}' has a non-numeric coordinate '{pos_str}'"
            ))
        })?;

        Ok(Locus::new(chrom, pos))
    }
}

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chrom, self.pos)
    }
}

/// A viewable interval `chrom:start-end` centred on a locus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    /// Extend a locus by `window` bases on both sides.
    ///
    /// The start is clamped at 0, so a locus closer to the chromosome start
    /// than the window yields an asymmetric region.
    pub fn around(locus: &Locus, window: u64) -> Self {
        Region {
            chrom: locus.chrom.clone(),
            start: locus.pos.saturating_sub(window),
            end: locus.pos.saturating_add(window),
        }
    }

    pub fn contains(&self, locus: &Locus) -> bool {
        self.chrom == locus.chrom && self.start <= locus.pos && locus.pos <= self.end
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// What kind of variant a record was classified as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantKind {
    /// Single-nucleotide (or any non-symbolic) variant
    Snv,
    /// Breakend with a mate locus
    Bnd,
    /// Symbolic structural variant; holds the SVTYPE value verbatim
    Structural(String),
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantKind::Snv => f.write_str("SNV"),
            VariantKind::Bnd => f.write_str("BND"),
            VariantKind::Structural(svtype) => f.write_str(svtype),
        }
    }
}

/// The loci to snapshot for one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loci {
    Single(Locus),
    /// First and second breakpoint
    Pair(Locus, Locus),
}

impl Loci {
    /// Number of loci: 1 or 2
    pub fn count(&self) -> usize {
        match self {
            Loci::Single(_) => 1,
            Loci::Pair(..) => 2,
        }
    }

    pub fn first(&self) -> &Locus {
        match self {
            Loci::Single(locus) | Loci::Pair(locus, _) => locus,
        }
    }
}

/// A variant reduced to its kind and the loci to visit
///
/// SNVs always carry one locus; breakends and structural variants always
/// carry two. The fields are private so the pairing cannot be broken after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedVariant {
    kind: VariantKind,
    loci: Loci,
}

impl ClassifiedVariant {
    pub fn snv(locus: Locus) -> Self {
        ClassifiedVariant {
            kind: VariantKind::Snv,
            loci: Loci::Single(locus),
        }
    }

    pub fn breakend(locus: Locus, mate: Locus) -> Self {
        ClassifiedVariant {
            kind: VariantKind::Bnd,
            loci: Loci::Pair(locus, mate),
        }
    }

    pub fn structural(svtype: impl Into<String>, start: Locus, end: Locus) -> Self {
        ClassifiedVariant {
            kind: VariantKind::Structural(svtype.into()),
            loci: Loci::Pair(start, end),
        }
    }

    pub fn kind(&self) -> &VariantKind {
        &self.kind
    }

    pub fn loci(&self) -> &Loci {
        &self.loci
    }

    /// Loci rendered as `chrom:pos` strings, in order
    pub fn positions(&self) -> Vec<String> {
        match &self.loci {
            Loci::Single(locus) => vec![locus.to_string()],
            Loci::Pair(first, second) => vec![first.to_string(), second.to_string()],
        }
    }

    /// Get a human-readable variant summary
    pub fn variant_summary(&self) -> String {
        format!("{} {}", self.kind, self.positions().join(" -> "))
    }
}
