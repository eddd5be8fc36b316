use std::path::PathBuf;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// What is known about an incoming file before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub field_name: String,
    pub original_name: String,
    pub content_type: String,
}

/// Decides where an incoming file lands on disk.
pub trait StorageStrategy: Send + Sync + 'static {
    /// Directory the file is written into. Must already exist.
    fn destination(&self, file: &FileInfo) -> PathBuf;

    /// Name of the file inside [`StorageStrategy::destination`].
    fn filename(&self, file: &FileInfo) -> String;
}

/// Writes every upload into one directory under the name the client sent.
// NOTE: the name is used verbatim, so a second upload with the same name
//  replaces the first. Directory parts are stripped before it gets here.
#[derive(Debug, Clone)]
pub struct DiskStorage {
    root: PathBuf,
}

impl Default for DiskStorage {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DIR)
    }
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl StorageStrategy for DiskStorage {
    fn destination(&self, _file: &FileInfo) -> PathBuf {
        self.root.clone()
    }

    fn filename(&self, file: &FileInfo) -> String {
        file.original_name.clone()
    }
}
