//! `pts checksum`: write `.sha256` files for existing artifacts

use crate::build::checksum;
use crate::core::error::PtsResult;
use crate::utils;
use std::path::PathBuf;

/// Run the checksum command
pub fn run_checksum(paths: Vec<PathBuf>) -> PtsResult<()> {
  let files = utils::collect_files(&paths)?;

  for file in &files {
    if let Some(target) = checksum::write_checksum(file)? {
      println!("🔒 {}", target.display());
    }
  }

  println!("Completed!");
  Ok(())
}
