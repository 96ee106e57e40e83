//! Multi-target build pipeline
//!
//! - **matrix**: binaries x platforms -> ordered [`BuildJob`](matrix::BuildJob)s
//! - **metadata**: version, build date and git revision, captured once per run
//! - **toolchain**: the [`Compiler`](toolchain::Compiler) seam and `go build`
//! - **archive**: single-entry zip / tar.gz packaging
//! - **checksum**: `.sha256` sidecar files
//! - **pipeline**: runs all of the above in matrix order, stopping at the first error

pub mod archive;
pub mod checksum;
pub mod matrix;
pub mod metadata;
pub mod pipeline;
pub mod toolchain;

pub use archive::ArchiveFormat;
pub use pipeline::{Artifact, BuildOptions, Pipeline};
pub use toolchain::GoToolchain;
