use super::domain::{Lead, LeadId};

/// Read-only view into the lead repository collaborator. A missing lead is
/// `Ok(None)`, never an error; the aggregator degrades such lookups to a
/// null lead with a fallback display label.
pub trait LeadRepository: Send + Sync {
    fn get(&self, id: LeadId) -> Result<Option<Lead>, LeadRepositoryError>;
    fn list_all(&self) -> Result<Vec<Lead>, LeadRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum LeadRepositoryError {
    #[error("lead repository unavailable: {0}")]
    Unavailable(String),
}
