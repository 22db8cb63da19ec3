mod admin;

pub use admin::{AdminAuth, admin_auth_middleware};
