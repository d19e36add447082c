//! Variant source reading
//!
//! This module provides functionality for:
//! - Opening plain or gzip-compressed VCF files and plain-text locus lists
//! - Streaming records one at a time without holding the file in memory
//! - Handing each record to the classifier and yielding [`ClassifiedVariant`]s
//!
//! The source is a single forward pass. To start over, open the file again.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use noodles_vcf as vcf;
use tracing::debug;

// Import the AlternateBases trait to use iter() method
use noodles_vcf::variant::record::AlternateBases;

use crate::error::{Error, Result};
use crate::types::ClassifiedVariant;
use crate::variant::{END_KEY, SVTYPE_KEY, VariantRecord, classify_locus_line, classify_record};

/// Which layout the variant file uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Vcf,
    /// One `chrom:pos` per line
    PlainText,
}

/// Check whether a path names a gzip/bgzip file
pub fn is_gzipped(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// Open a file for buffered reading, decompressing `.gz` transparently
///
/// bgzip output is a series of gzip members, hence the multi-member decoder.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| Error::io(format!("opening {}", path.display()), e))?;

    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

enum Source {
    Vcf {
        reader: vcf::io::Reader<Box<dyn BufRead>>,
        header: vcf::Header,
        record: vcf::variant::RecordBuf,
        record_count: usize,
    },
    PlainText {
        lines: Lines<Box<dyn BufRead>>,
        line_number: usize,
    },
}

/// Lazy iterator of classified variants read from a file
///
/// Yields `Err` at most once; after an error or end of input it only returns
/// `None`.
pub struct VariantSource {
    source: Source,
    done: bool,
}

impl VariantSource {
    /// Open `path` in the given format
    pub fn open(path: &Path, format: InputFormat) -> Result<Self> {
        debug!("Opening {:?} as {:?}", path, format);
        let reader = open_input(path)?;
        Self::from_reader(reader, format)
    }

    /// Wrap an already-open reader; reads the VCF header immediately
    pub fn from_reader(reader: Box<dyn BufRead>, format: InputFormat) -> Result<Self> {
        let source = match format {
            InputFormat::Vcf => {
                let mut reader = vcf::io::Reader::new(reader);
                let header = reader
                    .read_header()
                    .map_err(|e| Error::input_format(format!("failed to read VCF header: {e}")))?;
                Source::Vcf {
                    reader,
                    header,
                    record: vcf::variant::RecordBuf::default(),
                    record_count: 0,
                }
            }
            InputFormat::PlainText => Source::PlainText {
                lines: reader.lines(),
                line_number: 0,
            },
        };

        Ok(VariantSource {
            source,
            done: false,
        })
    }

    fn next_variant(&mut self) -> Result<Option<ClassifiedVariant>> {
        match &mut self.source {
            Source::Vcf {
                reader,
                header,
                record,
                record_count,
            } => match reader.read_record_buf(header, record) {
                Ok(0) => {
                    debug!("Reached end of VCF after {} records", record_count);
                    Ok(None)
                }
                Ok(_) => {
                    *record_count += 1;
                    let fields = variant_record_from_vcf(record, *record_count)?;
                    classify_record(&fields).map(Some)
                }
                Err(e) => Err(Error::input_format(format!(
                    "failed to read VCF record #{}: {e}",
                    *record_count + 1
                ))),
            },
            Source::PlainText { lines, line_number } => loop {
                let Some(line) = lines.next() else {
                    return Ok(None);
                };
                *line_number += 1;
                let line = line.map_err(|e| Error::io(format!("reading line {line_number}"), e))?;

                if line.trim().is_empty() {
                    continue;
                }

                return classify_locus_line(&line).map(Some).map_err(|e| match e {
                    Error::InputFormat { msg } => Error::input_format(format!("line {line_number}: {msg}")),
                    other => other,
                });
            },
        }
    }
}

impl Iterator for VariantSource {
    type Item = Result<ClassifiedVariant>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_variant() {
            Ok(Some(variant)) => Some(Ok(variant)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Copy the fields classification needs out of a noodles record
fn variant_record_from_vcf(
    record: &vcf::variant::RecordBuf,
    record_number: usize,
) -> Result<VariantRecord> {
    let chrom = record.reference_sequence_name().to_string();

    let pos = record
        .variant_start()
        .map(|p| usize::from(p) as u64)
        .ok_or_else(|| {
            Error::input_format(format!("VCF record #{record_number} on {chrom} has no position"))
        })?;

    // Only the first ALT allele drives classification
    let alt = match record.alternate_bases().iter().next() {
        Some(Ok(alt_allele)) => alt_allele.to_string(),
        Some(Err(e)) => {
            return Err(Error::input_format(format!(
                "VCF record #{record_number} at {chrom}:{pos} has an unreadable ALT: {e}"
            )));
        }
        None => ".".to_string(),
    };

    let mut fields = VariantRecord::new(chrom, pos, alt);

    for (key, value) in record.info().as_ref() {
        if key != END_KEY && key != SVTYPE_KEY {
            continue;
        }
        if let Some(text) = value.as_ref().and_then(info_value_to_string) {
            fields.info.insert(key.to_string(), text);
        }
    }

    Ok(fields)
}

fn info_value_to_string(value: &vcf::variant::record_buf::info::field::Value) -> Option<String> {
    use vcf::variant::record_buf::info::field::Value;
    use vcf::variant::record_buf::info::field::value::Array;

    match value {
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(n) => Some(n.to_string()),
        Value::Character(c) => Some(c.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Flag => None,
        Value::Array(Array::Integer(values)) => Some(
            values
                .iter()
                .map(|v| v.map(|n| n.to_string()).unwrap_or_else(|| ".".to_string()))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Array(Array::String(values)) => Some(
            values
                .iter()
                .map(|v| v.clone().unwrap_or_else(|| ".".to_string()))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Array(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VariantKind;

    const VCF_HEADER: &str = "##fileformat=VCFv4.3\n\
##INFO=<ID=SVTYPE,Number=1,Type=String,Description=\"Type of structural variant\">\n\
##INFO=<ID=END,Number=1,Type=Integer,Description=\"End position of the variant\">\n\
##contig=<ID=chrom1>\n\
##contig=<ID=chr2>\n\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";

    fn vcf_source(body: &str) -> VariantSource {
        let text = format!("{VCF_HEADER}{body}");
        let reader: Box<dyn BufRead> = Box::new(std::io::Cursor::new(text.into_bytes()));
        VariantSource::from_reader(reader, InputFormat::Vcf).unwrap()
    }

    fn text_source(body: &str) -> VariantSource {
        let reader: Box<dyn BufRead> = Box::new(std::io::Cursor::new(body.as_bytes().to_vec()));
        VariantSource::from_reader(reader, InputFormat::PlainText).unwrap()
    }

    #[test]
    fn test_vcf_records_are_classified_in_order() {
        let source = vcf_source(
            "chrom1\t100\t.\tA\tT\t.\tPASS\t.\n\
chrom1\t100\tbnd1\tN\tN[chr2:500[\t.\tPASS\tSVTYPE=BND\n\
chrom1\t100\tdel1\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL;END=900\n",
        );
        let variants: Vec<_> = source.collect::<Result<_>>().unwrap();

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].kind(), &VariantKind::Snv);
        assert_eq!(variants[0].positions(), vec!["chrom1:100"]);
        assert_eq!(variants[1].kind(), &VariantKind::Bnd);
        assert_eq!(variants[1].positions(), vec!["chrom1:100", "chr2:500"]);
        assert_eq!(variants[2].kind().to_string(), "DEL");
        assert_eq!(variants[2].positions(), vec!["chrom1:100", "chrom1:900"]);
    }

    #[test]
    fn test_vcf_missing_end_stops_iteration() {
        let mut source = vcf_source(
            "chrom1\t100\tdel1\tN\t<DEL>\t.\tPASS\tSVTYPE=DEL\n\
chrom1\t200\t.\tA\tT\t.\tPASS\t.\n",
        );

        let first = source.next().unwrap();
        assert!(matches!(first, Err(Error::InputFormat { .. })));
        assert!(source.next().is_none());
    }

    #[test]
    fn test_vcf_empty_body() {
        let mut source = vcf_source("");
        assert!(source.next().is_none());
        assert!(source.next().is_none());
    }

    #[test]
    fn test_plain_text_lines_are_snvs() {
        let source = text_source("chr1:100\n\nchr2:250  \nchrX:5\n");
        let variants: Vec<_> = source.collect::<Result<_>>().unwrap();

        assert_eq!(variants.len(), 3);
        assert!(variants.iter().all(|v| v.kind() == &VariantKind::Snv));
        assert_eq!(variants[1].positions(), vec!["chr2:250"]);
    }

    #[test]
    fn test_plain_text_bad_line_reports_line_number() {
        let mut source = text_source("chr1:100\nchr1-200\n");
        assert!(source.next().unwrap().is_ok());

        let err = source.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(source.next().is_none());
    }

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("calls.vcf.gz")));
        assert!(!is_gzipped(Path::new("calls.vcf")));
        assert!(!is_gzipped(Path::new("positions.txt")));
    }
}
