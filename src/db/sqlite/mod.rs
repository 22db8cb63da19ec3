mod common;
mod connector_pairs;
mod deletion_attempts;
mod documents;
mod index_attempts;
mod users;

pub use connector_pairs::SqliteConnectorPairRepo;
pub use deletion_attempts::SqliteDeletionAttemptRepo;
pub use documents::SqliteDocumentRepo;
pub use index_attempts::SqliteIndexAttemptRepo;
pub use users::SqliteUserRepo;
