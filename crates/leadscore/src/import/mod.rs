//! CSV roster import: turns a CRM lead export into leads plus their
//! attached signals, ready for the scoring pipeline. Sparse cells become
//! absent signals; only a structurally unreadable file is an error.

mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use crate::scoring::domain::{Lead, LeadSignals};

/// One roster line: the lead record plus whatever enrichment/engagement
/// data the export carried for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub lead: Lead,
    pub signals: LeadSignals,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RosterEntry>, RosterImportError> {
        Ok(parser::parse_entries(reader)?)
    }
}
