//! CLI commands for pts
//!
//! - **build**: cross-compile, archive and checksum a Go project
//! - **checksum**: write `.sha256` files for existing artifacts
//! - **repository**: create repositories, packages and versions; upload files
//! - **release**: upload files as assets of an existing release
//!
//! Each command validates its inputs before the first side effect and prints
//! `Completed!` once everything succeeded.

pub mod build;
pub mod checksum;
pub mod release;
pub mod repository;

pub use build::run_build;
pub use checksum::run_checksum;
pub use release::run_release_upload;
pub use repository::{run_create_package, run_create_repo, run_create_version, run_upload};
