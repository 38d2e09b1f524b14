// Library root for the stats proxy server. Exposed as a library so the
// router can be exercised end-to-end from integration tests.

pub mod cache;
pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod state;
pub mod upstream;
