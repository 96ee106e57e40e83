//! Remote publishing: package repository and release assets over HTTP

pub mod http;
pub mod release;
pub mod repository;

pub use http::{Transport, UreqTransport};
pub use release::ReleasePublisher;
pub use repository::RepositoryClient;
