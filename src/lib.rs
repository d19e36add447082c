// varsnap Library - IGV batch snapshots for variant loci
//
// This library turns variant calls into IGV batch scripts by:
// 1. Reading variants from VCF (plain or gzip) or plain-text locus lists
// 2. Classifying each variant as SNV, breakend, or structural variant
// 3. Extending each locus into a flanked region
// 4. Emitting goto/sort/display/snapshot directives per region
// 5. Optionally running the script through headless IGV

pub mod config; // Display options, defaults and prefix derivation
pub mod error; // Crate-wide error type
pub mod igv; // Headless IGV execution under xvfb-run
pub mod output; // Batch script file writing
pub mod script; // Directive model and script builder
pub mod types; // Loci, regions and classified variants
pub mod variant; // Variant classification
pub mod vcf; // VCF / plain-text variant sources

// Re-export commonly used types for convenience
pub use config::{DisplayMode, ScriptConfig, SortMode, derive_prefix};
pub use error::{Error, Result};
pub use igv::IgvRunner;
pub use output::{default_batch_path, write_batch_script};
pub use script::{BatchScript, Directive, ScriptBuilder, build_script, build_session_script};
pub use types::{ClassifiedVariant, Locus, Loci, Region, VariantKind};
pub use variant::{VariantRecord, classify_record, parse_breakend_mate_locus};
pub use vcf::{InputFormat, VariantSource};
