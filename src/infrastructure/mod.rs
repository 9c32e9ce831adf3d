pub mod http;
pub mod repositories;
pub mod session;
