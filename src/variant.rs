//! Variant classification
//!
//! This module provides functionality for:
//! - Recognising breakend and symbolic structural-variant ALT alleles
//! - Extracting the mate locus embedded in breakend notation
//! - Reducing a VCF record to a [`ClassifiedVariant`] with one or two loci

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::types::{ClassifiedVariant, Locus};

/// INFO key holding the end coordinate of a structural variant
pub const END_KEY: &str = "END";
/// INFO key holding the structural variant type
pub const SVTYPE_KEY: &str = "SVTYPE";

// First `contig:position` inside a breakend ALT such as `N[chr2:500[`.
// Matched against the whole ALT text, so a multi-allelic or nested-bracket
// ALT may yield the wrong mate.
static MATE_LOCUS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+:\d+").expect("mate locus pattern is valid"));

/// The fields of one VCF row that classification needs
///
/// Only `END` and `SVTYPE` are ever looked up in `info`, so readers are free
/// to copy just those keys.
#[derive(Debug, Clone, Default)]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: u64,
    pub alt: String,
    pub info: BTreeMap<String, String>,
}

impl VariantRecord {
    pub fn new(chrom: impl Into<String>, pos: u64, alt: impl Into<String>) -> Self {
        VariantRecord {
            chrom: chrom.into(),
            pos,
            alt: alt.into(),
            info: BTreeMap::new(),
        }
    }

    /// Builder-style INFO insertion, mostly for tests
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    fn locus(&self) -> Locus {
        Locus::new(self.chrom.clone(), self.pos)
    }
}

/// Check for breakend bracket notation (`t[p[`, `t]p]`, `]p]t`, `[p[t`)
pub fn is_breakend_allele(alt_allele: &str) -> bool {
    alt_allele.contains('[') || alt_allele.contains(']')
}

/// Check for a symbolic allele such as `<DEL>` or `<DUP:TANDEM>`
pub fn is_symbolic_allele(alt_allele: &str) -> bool {
    alt_allele.contains('<') || alt_allele.contains('>')
}

/// Extract the mate breakpoint from a breakend ALT allele
///
/// Returns the first `word:digits` substring as a [`Locus`], or `None` if the
/// allele carries no such coordinate.
pub fn parse_breakend_mate_locus(alt_allele: &str) -> Option<Locus> {
    let hit = MATE_LOCUS_PATTERN.find(alt_allele)?;
    hit.as_str().parse().ok()
}

/// Classify a VCF record into SNV, breakend, or structural variant
///
/// Precedence:
/// 1. Brackets in ALT: breakend, second locus is the mate from the ALT text
/// 2. Angle brackets in ALT: structural variant of type `SVTYPE`, second
///    locus is `chrom:END`
/// 3. Anything else: SNV at `chrom:pos`
///
/// **Errors:**
/// - breakend ALT without a mate coordinate
/// - symbolic ALT without an integer `END` or without `SVTYPE`
pub fn classify_record(record: &VariantRecord) -> Result<ClassifiedVariant> {
    if is_breakend_allele(&record.alt) {
        let mate = parse_breakend_mate_locus(&record.alt).ok_or_else(|| {
            Error::input_format(format!(
                "breakend at {}:{} has no mate locus in ALT '{}'",
                record.chrom, record.pos, record.alt
            ))
        })?;
        return Ok(ClassifiedVariant::breakend(record.locus(), mate));
    }

    if is_symbolic_allele(&record.alt) {
        let end = structural_end(record)?;
        let svtype = record.info.get(SVTYPE_KEY).ok_or_else(|| {
            Error::input_format(format!(
                "structural variant at {}:{} ({}) has no INFO/{SVTYPE_KEY}",
                record.chrom, record.pos, record.alt
            ))
        })?;
        return Ok(ClassifiedVariant::structural(
            svtype.clone(),
            record.locus(),
            Locus::new(record.chrom.clone(), end),
        ));
    }

    Ok(ClassifiedVariant::snv(record.locus()))
}

fn structural_end(record: &VariantRecord) -> Result<u64> {
    let raw = record.info.get(END_KEY).ok_or_else(|| {
        Error::input_format(format!(
            "structural variant at {}:{} ({}) has no INFO/{END_KEY}",
            record.chrom, record.pos, record.alt
        ))
    })?;

    raw.trim().parse::<u64>().map_err(|_| {
        Error::input_format(format!(
            "structural variant at {}:{} has non-integer INFO/{END_KEY}={raw}",
            record.chrom, record.pos
        ))
    })
}

/// Classify one line of a plain-text locus list
///
/// Lines are always SNVs; classification by ALT never applies.
pub fn classify_locus_line(line: &str) -> Result<ClassifiedVariant> {
    Ok(ClassifiedVariant::snv(line.parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Loci, VariantKind};

    #[test]
    fn test_allele_shape_checks() {
        assert!(is_breakend_allele("N[chr2:500["));
        assert!(is_breakend_allele("]chr3:5000]T"));
        assert!(!is_breakend_allele("<DEL>"));
        assert!(!is_breakend_allele("T"));

        assert!(is_symbolic_allele("<DEL>"));
        assert!(is_symbolic_allele("<DUP:TANDEM>"));
        assert!(!is_symbolic_allele("ACGT"));
    }

    #[test]
    fn test_parse_breakend_mate_locus() {
        assert_eq!(
            parse_breakend_mate_locus("A[chr12:11875518["),
            Some(Locus::new("chr12", 11875518))
        );
        assert_eq!(
            parse_breakend_mate_locus("]chr3:5000]T"),
            Some(Locus::new("chr3", 5000))
        );
        // Case is preserved, contigs are not renamed
        assert_eq!(
            parse_breakend_mate_locus("T[CHR5:10443321["),
            Some(Locus::new("CHR5", 10443321))
        );
        assert_eq!(
            parse_breakend_mate_locus("G]7:2000]"),
            Some(Locus::new("7", 2000))
        );

        assert_eq!(parse_breakend_mate_locus("A[invalid["), None);
        assert_eq!(parse_breakend_mate_locus("N[chr2:["), None);
    }

    #[test]
    fn test_classify_breakend() {
        let record = VariantRecord::new("chrom1", 100, "N[chr2:500[");
        let variant = classify_record(&record).unwrap();

        assert_eq!(variant.kind(), &VariantKind::Bnd);
        assert_eq!(variant.positions(), vec!["chrom1:100", "chr2:500"]);
    }

    #[test]
    fn test_classify_breakend_ignores_info() {
        // Bracket check wins even if the record also carries SV INFO
        let record = VariantRecord::new("chr1", 10, "]chr4:77]A")
            .with_info(SVTYPE_KEY, "BND")
            .with_info(END_KEY, "999");
        let variant = classify_record(&record).unwrap();

        assert_eq!(variant.kind(), &VariantKind::Bnd);
        assert_eq!(variant.positions(), vec!["chr1:10", "chr4:77"]);
    }

    #[test]
    fn test_classify_breakend_without_mate_is_error() {
        let record = VariantRecord::new("chr1", 10, "N[[");
        let err = classify_record(&record).unwrap_err();
        assert!(matches!(err, Error::InputFormat { .. }));
        assert!(err.to_string().contains("mate locus"));
    }

    #[test]
    fn test_classify_structural() {
        let record = VariantRecord::new("chrom1", 100, "<DEL>")
            .with_info(SVTYPE_KEY, "DEL")
            .with_info(END_KEY, "900");
        let variant = classify_record(&record).unwrap();

        assert_eq!(variant.kind(), &VariantKind::Structural("DEL".to_string()));
        assert_eq!(variant.positions(), vec!["chrom1:100", "chrom1:900"]);
    }

    #[test]
    fn test_classify_structural_keeps_svtype_verbatim() {
        let record = VariantRecord::new("chr9", 1_000, "<DUP:TANDEM>")
            .with_info(SVTYPE_KEY, "DUP:TANDEM")
            .with_info(END_KEY, "2000");
        let variant = classify_record(&record).unwrap();

        assert_eq!(variant.kind().to_string(), "DUP:TANDEM");
        assert_eq!(
            variant.loci(),
            &Loci::Pair(Locus::new("chr9", 1_000), Locus::new("chr9", 2_000))
        );
    }

    #[test]
    fn test_classify_structural_missing_fields() {
        let no_end = VariantRecord::new("chr1", 100, "<DEL>").with_info(SVTYPE_KEY, "DEL");
        let err = classify_record(&no_end).unwrap_err();
        assert!(err.to_string().contains("INFO/END"));

        let bad_end = VariantRecord::new("chr1", 100, "<DEL>")
            .with_info(SVTYPE_KEY, "DEL")
            .with_info(END_KEY, "far");
        assert!(classify_record(&bad_end).is_err());

        let no_svtype = VariantRecord::new("chr1", 100, "<INV>").with_info(END_KEY, "500");
        let err = classify_record(&no_svtype).unwrap_err();
        assert!(err.to_string().contains("INFO/SVTYPE"));
    }

    #[test]
    fn test_classify_snv() {
        let variant = classify_record(&VariantRecord::new("chrom", 1234, "T")).unwrap();
        assert_eq!(variant.kind(), &VariantKind::Snv);
        assert_eq!(variant.positions(), vec!["chrom:1234"]);

        // Indels are not symbolic and fall through to a single locus
        let variant = classify_record(&VariantRecord::new("chrom", 77, "ACGT")).unwrap();
        assert_eq!(variant.loci().count(), 1);
    }

    #[test]
    fn test_classify_locus_line() {
        let variant = classify_locus_line("chr17:7577120").unwrap();
        assert_eq!(variant.kind(), &VariantKind::Snv);
        assert_eq!(variant.positions(), vec!["chr17:7577120"]);

        // Bracket-looking text is still a single locus in plain-text mode
        assert!(classify_locus_line("N[chr2:500[").is_err());
        assert!(classify_locus_line("chr17").is_err());
    }
}
