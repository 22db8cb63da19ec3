mod connector;
mod document;
mod token_budget;
mod user;

pub use connector::*;
pub use document::*;
pub use token_budget::*;
pub use user::*;
