//! SQLite persistence for imported image records.

pub mod db;
pub mod models;

pub use db::Database;
pub use models::ImageRecord;
