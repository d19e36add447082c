//! Error types for varsnap
//!
//! Every fallible operation in the crate returns [`Error`]. The variants map
//! onto the failure classes a run can hit:
//! - malformed input records or loci
//! - invalid configuration, rejected before any input is read
//! - the external IGV step failing
//! - plain file I/O

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while classifying variants, building scripts, or running IGV
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed VCF record, missing INFO field, or unparseable locus
    #[error("input format error: {msg}")]
    InputFormat { msg: String },

    /// Invalid option value supplied by the caller
    #[error("configuration error: {msg}")]
    Configuration { msg: String },

    /// IGV, java or xvfb-run missing or exiting unsuccessfully
    #[error("external tool error: {msg}")]
    ExternalTool { msg: String },

    /// File system failure
    #[error("I/O error: {msg}")]
    Io { msg: String },
}

impl Error {
    pub fn input_format(msg: impl Into<String>) -> Self {
        Error::InputFormat { msg: msg.into() }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration { msg: msg.into() }
    }

    pub fn external_tool(msg: impl Into<String>) -> Self {
        Error::ExternalTool { msg: msg.into() }
    }

    /// Wrap an I/O error with a short description of what was being done
    pub fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        Error::Io {
            msg: format!("{context}: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_category() {
        let err = Error::input_format("missing END");
        assert_eq!(err.to_string(), "input format error: missing END");

        let err = Error::configuration("unknown display mode 'tiny'");
        assert!(err.to_string().starts_with("configuration error"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::io("opening calls.vcf", io);
        assert_eq!(err.to_string(), "I/O error: opening calls.vcf: no such file");
    }
}
