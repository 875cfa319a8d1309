use std::fmt;

// === StoreError ===

/// Errors from the key-value store facade and storage adapters.
#[derive(Debug)]
pub enum StoreError {
    /// Durable-area I/O failed.
    Io(String),
    /// A stored value could not be serialized or deserialized.
    Serialization(String),
    /// The remote backend rejected a write or delete.
    Remote(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            StoreError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StoreError::Remote(msg) => write!(f, "Remote storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === RegistryError ===

/// Errors from workspace registry operations.
#[derive(Debug)]
pub enum RegistryError {
    /// Workspace with the given ID was not found.
    NotFound(String),
    /// The underlying key-value store failed.
    Store(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound(id) => write!(f, "Workspace not found: {}", id),
            RegistryError::Store(msg) => write!(f, "Registry storage error: {}", msg),
        }
    }
}

impl std::error::Error for RegistryError {}

// === RemoteError ===

/// Errors from the remote (network-backed) storage adapter.
#[derive(Debug)]
pub enum RemoteError {
    /// The request never produced a response.
    Network(String),
    /// A bearer token could not be obtained from the auth collaborator.
    Auth(String),
    /// The backend answered with a non-2xx status. Carries the backend's
    /// own `message` when one was parseable, else a status-derived one.
    Backend(u16, String),
    /// A 2xx response body could not be parsed.
    Parse(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Network(msg) => write!(f, "Remote network error: {}", msg),
            RemoteError::Auth(msg) => write!(f, "Remote auth error: {}", msg),
            RemoteError::Backend(status, msg) => {
                write!(f, "Remote backend error ({}): {}", status, msg)
            }
            RemoteError::Parse(msg) => write!(f, "Remote response parse error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

// === TransferError ===

/// Errors from the copy/move engine.
#[derive(Debug)]
pub enum TransferError {
    /// The source group to copy was not found.
    SourceGroupNotFound(String),
    /// Targeted-bookmark copy requires the destination group to exist.
    DestinationGroupNotFound(String),
    /// Reading or writing a collection failed.
    Store(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::SourceGroupNotFound(id) => {
                write!(f, "Source group not found: {}", id)
            }
            TransferError::DestinationGroupNotFound(id) => {
                write!(f, "Destination group not found: {}", id)
            }
            TransferError::Store(msg) => write!(f, "Transfer storage error: {}", msg),
        }
    }
}

impl std::error::Error for TransferError {}
