//! Background workers for the management server.
//!
//! - **Connector Cleanup**: consumes admitted deletion requests from the
//!   task queue, purges the pair's documents from every active index, and
//!   reaps its database records.
//!
//! Workers follow a consistent pattern: a worker function that loops until
//! its input closes, a run function performing a single pass, and a
//! structured result type for logging.

mod connector_cleanup;

pub use connector_cleanup::{CleanupRunResult, start_connector_cleanup_worker};
