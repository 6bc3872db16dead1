//! Read-only bare-repository access and chunked bulk listing

pub mod chunks;
pub mod error;
pub mod repo;

pub use chunks::{Chunk, FileChunkBuilder};
pub use error::{GitError, Result};
pub use repo::{FileEntry, GitRepoFiles};
