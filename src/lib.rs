// Library for tests to access modules

pub mod config;
pub mod error;
pub mod filter;
pub mod forwarder;
pub mod models;
pub mod naming;
pub mod routes;
pub mod translate;
pub mod version;
