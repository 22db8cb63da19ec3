mod connector_pairs;
mod deletion_attempts;
mod documents;
mod index_attempts;
mod users;

pub use connector_pairs::ConnectorPairRepo;
pub use deletion_attempts::DeletionAttemptRepo;
pub use documents::DocumentRepo;
pub use index_attempts::IndexAttemptRepo;
pub use users::UserRepo;
