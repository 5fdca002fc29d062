//! Connection management: one writer, optional readers.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use vigil_core::errors::VigilResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Default number of read connections for file-backed databases.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

pub struct ConnectionPool {
    pub writer: WriteConnection,
    /// `None` for in-memory databases, where a second connection would
    /// open a separate, empty database.
    pub readers: Option<ReadPool>,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    pub fn open(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> VigilResult<Self> {
        let writer = WriteConnection::open(path, busy_timeout_ms)?;
        let readers = ReadPool::open(path, read_pool_size, busy_timeout_ms)?;
        Ok(Self {
            writer,
            readers: Some(readers),
            db_path: Some(path.to_path_buf()),
        })
    }

    pub fn open_in_memory() -> VigilResult<Self> {
        Ok(Self {
            writer: WriteConnection::open_in_memory()?,
            readers: None,
            db_path: None,
        })
    }
}
