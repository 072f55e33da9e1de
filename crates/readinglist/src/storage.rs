use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tempfile::NamedTempFile;
use thiserror::Error;

pub trait Store {
    type Error: std::error::Error;

    /// Stores a rendered page under the given file name, replacing any
    /// existing page with that name.
    fn store_page(&self, name: &str, rendered_html: &str) -> Result<(), Self::Error>;
}

pub struct DiskStorage {
    output_path: PathBuf,
}

impl DiskStorage {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl Store for DiskStorage {
    type Error = io::Error;

    fn store_page(&self, name: &str, rendered_html: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.output_path)?;

        // Write next to the target and rename over it so a failed write never
        // leaves a truncated page behind.
        let mut output_file = NamedTempFile::new_in(&self.output_path)?;
        output_file.write_all(rendered_html.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            output_file
                .as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }

        output_file
            .persist(self.output_path.join(name))
            .map_err(|err| err.error)?;

        Ok(())
    }
}

pub struct InMemoryStorage {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryStorage {
    pub fn new(storage: Arc<RwLock<HashMap<String, String>>>) -> Self {
        Self { storage }
    }
}

#[derive(Error, Debug)]
pub enum InMemoryStorageError {
    #[error("poisoned")]
    Poisoned,
}

impl Store for InMemoryStorage {
    type Error = InMemoryStorageError;

    fn store_page(&self, name: &str, rendered_html: &str) -> Result<(), Self::Error> {
        self.storage
            .write()
            .map_err(|_| InMemoryStorageError::Poisoned)?
            .insert(name.to_owned(), rendered_html.to_owned());

        Ok(())
    }
}
