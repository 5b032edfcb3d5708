use std::fmt;

/// Errors from the attachment storage backend.
#[derive(Debug, PartialEq)]
pub enum StorageError {
    /// No backend has been wired up yet.
    NotImplemented,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotImplemented => write!(f, "Not implemented"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Object storage for application attachments (resumes, cover letters).
///
/// Placeholder collaborator: no backend has been chosen yet, so every
/// operation fails with [`StorageError::NotImplemented`]. Handlers must not
/// depend on it until a real implementation lands.
pub struct StorageService;

impl StorageService {
    pub fn new() -> Self {
        Self
    }

    /// Store `data` under `key` and return its public URL.
    pub async fn upload(
        &self,
        _key: &str,
        _data: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        Err(StorageError::NotImplemented)
    }

    pub async fn download(&self, _key: &str) -> Result<Vec<u8>, StorageError> {
        Err(StorageError::NotImplemented)
    }

    pub async fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::NotImplemented)
    }

    pub async fn get_url(&self, _key: &str) -> Result<String, StorageError> {
        Err(StorageError::NotImplemented)
    }
}

impl Default for StorageService {
    fn default() -> Self {
        Self::new()
    }
}
