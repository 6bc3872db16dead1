//! Size-bounded assembly of directory-grouped file entries into upload chunks.

use serde::Serialize;
use tracing::debug;

use super::repo::FileEntry;

/// An ordered group of file entries bounded by a maximum aggregate content
/// size. Never mutated after assembly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chunk {
    pub entries: Vec<FileEntry>,
    pub size: u64,
}

/// Accumulates `(directory, entries)` groups and finalizes them into
/// size-bounded chunks. A directory whose entries fit the bound lands in one
/// chunk; a directory exceeding the bound is split across chunks. The union
/// of all chunks' entries equals the union of all `add_files` calls.
pub struct FileChunkBuilder {
    max_chunk_bytes: u64,
    chunks: Vec<Chunk>,
    current: Chunk,
}

impl FileChunkBuilder {
    pub fn new(max_chunk_bytes: u64) -> Self {
        Self {
            max_chunk_bytes,
            chunks: Vec::new(),
            current: Chunk::default(),
        }
    }

    /// Accumulate one directory's entries, in the order supplied
    pub fn add_files(&mut self, directory: &str, entries: Vec<FileEntry>) {
        let group_size: u64 = entries.iter().map(|e| e.size).sum();
        debug!(
            "Adding {} files from directory `{}` ({} bytes)",
            entries.len(),
            directory,
            group_size
        );

        if group_size <= self.max_chunk_bytes {
            // Keep the whole directory in one chunk
            if self.current.size + group_size > self.max_chunk_bytes {
                self.flush();
            }
            for entry in entries {
                self.push_entry(entry);
            }
        } else {
            // Directory exceeds the bound: split entry by entry
            for entry in entries {
                if !self.current.entries.is_empty()
                    && self.current.size + entry.size > self.max_chunk_bytes
                {
                    self.flush();
                }
                self.push_entry(entry);
            }
        }
    }

    /// Finalize the accumulated entries into chunks
    pub fn into_chunks(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }

    fn push_entry(&mut self, entry: FileEntry) {
        self.current.size += entry.size;
        self.current.entries.push(entry);
    }

    fn flush(&mut self) {
        if !self.current.entries.is_empty() {
            debug!(
                "Chunk closed with {} entries ({} bytes)",
                self.current.entries.len(),
                self.current.size
            );
            self.chunks.push(std::mem::take(&mut self.current));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, content: &str) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            content: content.to_string(),
            size: content.len() as u64,
        }
    }

    fn all_paths(chunks: &[Chunk]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|c| c.entries.iter().map(|e| e.path.clone()))
            .collect()
    }

    #[test]
    fn test_single_chunk_when_under_bound() {
        let mut builder = FileChunkBuilder::new(100);
        builder.add_files("pkg", vec![entry("pkg/a.py", "aaaa"), entry("pkg/b.py", "bb")]);

        let chunks = builder.into_chunks();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].size, 6);
        assert_eq!(all_paths(&chunks), vec!["pkg/a.py", "pkg/b.py"]);
    }

    #[test]
    fn test_directory_fitting_bound_closes_previous_chunk() {
        let mut builder = FileChunkBuilder::new(10);
        builder.add_files("a", vec![entry("a/one.py", "123456")]);
        builder.add_files("b", vec![entry("b/two.py", "1234567")]);

        let chunks = builder.into_chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].entries[0].path, "a/one.py");
        assert_eq!(chunks[1].entries[0].path, "b/two.py");
    }

    #[test]
    fn test_oversized_directory_splits_across_chunks() {
        let mut builder = FileChunkBuilder::new(10);
        builder.add_files(
            "big",
            vec![
                entry("big/a.py", "123456"),
                entry("big/b.py", "123456"),
                entry("big/c.py", "123456"),
            ],
        );

        let chunks = builder.into_chunks();
        assert!(chunks.len() >= 2);
        assert_eq!(all_paths(&chunks), vec!["big/a.py", "big/b.py", "big/c.py"]);
    }

    #[test]
    fn test_entry_larger_than_bound_gets_own_chunk() {
        let mut builder = FileChunkBuilder::new(4);
        builder.add_files("d", vec![entry("d/huge.py", "12345678"), entry("d/tiny.py", "1")]);

        let chunks = builder.into_chunks();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].entries[0].path, "d/huge.py");
        assert_eq!(chunks[1].entries[0].path, "d/tiny.py");
    }

    #[test]
    fn test_no_entries_no_chunks() {
        let builder = FileChunkBuilder::new(10);
        assert!(builder.into_chunks().is_empty());
    }

    #[test]
    fn test_union_of_chunks_matches_input_exactly_once() {
        let mut builder = FileChunkBuilder::new(8);
        builder.add_files("x", vec![entry("x/a.py", "1234"), entry("x/b.py", "1234")]);
        builder.add_files("y", vec![entry("y/c.py", "1234"), entry("y/d.py", "12345678")]);

        let chunks = builder.into_chunks();
        let mut paths = all_paths(&chunks);
        paths.sort();
        assert_eq!(paths, vec!["x/a.py", "x/b.py", "y/c.py", "y/d.py"]);
    }
}
