
mod connector_pairs;
mod index_attempts;
