//! Named asset access
//!
//! The predictor never touches the filesystem directly; it asks an
//! [`AssetSource`] for assets by name.

use std::collections::HashMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Opens bundled assets by name
pub trait AssetSource {
    /// Open a named asset for reading
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;

    /// Read a whole asset into memory
    fn read_bytes(&self, name: &str) -> io::Result<Vec<u8>> {
        let mut reader = self.open(name)?;
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Assets stored as files under a root directory
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl AsRef<Path>) -> Self {
        DirAssets {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a named asset
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl AssetSource for DirAssets {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let file = std::fs::File::open(self.path_of(name))?;
        Ok(Box::new(io::BufReader::new(file)))
    }
}

/// In-memory asset map, for embedding hosts and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset, builder style
    pub fn with(mut self, name: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: &str, contents: impl Into<Vec<u8>>) {
        self.entries.insert(name.to_string(), contents.into());
    }
}

impl AssetSource for MemoryAssets {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        self.entries
            .get(name)
            .map(|bytes| Box::new(bytes.as_slice()) as Box<dyn Read + '_>)
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, format!("asset not found: {}", name))
            })
    }
}
