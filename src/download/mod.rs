// src/download/mod.rs
// =============================================================================
// Saving accepted candidates to the download directory.
//
// Submodules:
// - naming: deterministic, collision-free file names (URL hash)
// - file: streaming a body to disk through a ".part" file
// =============================================================================

mod file;
mod naming;

pub use file::{download_candidate, Saved};
pub use naming::file_name_for;
