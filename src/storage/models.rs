//! Row types for the image store.

/// A persisted image: one row of the `images` table.
///
/// Records are only ever inserted. `id` is assigned by SQLite and `data`
/// holds the JPEG re-encoding of the normalized canvas, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: i64,
    /// Source filename with the extension stripped.
    pub name: String,
    /// Caller-supplied label from the import directive.
    pub category: Option<String>,
    pub data: Vec<u8>,
}
