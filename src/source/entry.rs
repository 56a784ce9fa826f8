/// Location of one header inside a `MemorySource` arena
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Byte offset into the arena
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
    /// Sanitized virtual path (e.g., "detail/utilities.h")
    pub virtual_path: String,
}
