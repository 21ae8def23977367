//! imagedb - script-driven batch import of images into SQLite
//!
//! imagedb reads a plain-text command script, executes its directives in
//! order, and persists letterbox-normalized images as binary records in a
//! SQLite database.

pub mod imaging;
pub mod runner;
pub mod script;
pub mod storage;
