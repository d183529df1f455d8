//! Chunked persistence for the VPN configuration blob.
//!
//! The record store caps individual value sizes well below what a pasted
//! VPN configuration can reach, so the blob is stored as a count record
//! plus N fixed-size chunk records:
//!
//! - `config/VpnData_Count` — decimal chunk count
//! - `config/VpnData_Chunk/<i>` — chunk `i`, at most [`CHUNK_SIZE`] bytes
//! - `config/VpnData` — legacy single-record form, read as a fallback when
//!   no count record exists and removed by the next save
//!
//! Chunks are read back by constructing each indexed key explicitly, never
//! by iterating the store, so key ordering ("10" before "2") can't corrupt
//! reassembly. A save is a multi-key sequence with no transaction around
//! it: if it fails part-way the blob stays inconsistent until the next
//! successful save. Reads are deliberately lenient — a missing chunk
//! contributes nothing instead of failing the whole load.

use std::sync::Arc;

use vpanel_store::{RecordStore, StoreError};

/// Maximum stored size of one chunk, in bytes.
pub const CHUNK_SIZE: usize = 8000;

const COUNT_KEY: &str = "config/VpnData_Count";
const LEGACY_KEY: &str = "config/VpnData";
const CHUNK_PREFIX: &str = "config/VpnData_Chunk/";

fn chunk_key(index: usize) -> String {
    format!("{CHUNK_PREFIX}{index}")
}

/// Store for one large text value, chunked across records.
#[derive(Clone)]
pub struct BlobStore {
    store: Arc<dyn RecordStore>,
}

impl BlobStore {
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// The chunk count from the last completed save, or 0.
    ///
    /// An unreadable count (absent, non-UTF-8, non-numeric) is treated as
    /// 0 so a damaged count record degrades to the legacy fallback instead
    /// of wedging every read.
    async fn chunk_count(&self) -> Result<usize, StoreError> {
        let Some(bytes) = self.store.get(COUNT_KEY).await? else {
            return Ok(0);
        };
        Ok(String::from_utf8_lossy(&bytes).trim().parse().unwrap_or(0))
    }

    /// Replace the stored blob with `text`.
    ///
    /// Deletes every chunk of the previous generation first (so shrinking
    /// leaves no orphaned tail chunks) along with the legacy record, then
    /// writes the new count followed by the chunks in index order. All
    /// chunks except possibly the last are exactly [`CHUNK_SIZE`] bytes.
    /// An empty `text` stores a count of 0 and no chunks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on the first failing store operation. Earlier
    /// writes in the sequence are not rolled back; the blob is repaired by
    /// the next successful save.
    pub async fn save(&self, text: &str) -> Result<(), StoreError> {
        let previous = self.chunk_count().await?;
        for index in 0..previous {
            self.store.delete(&chunk_key(index)).await?;
        }
        // The legacy record is superseded the moment a chunked generation
        // exists; dropping it here also lets an empty save read back empty.
        self.store.delete(LEGACY_KEY).await?;

        let chunks: Vec<&[u8]> = text.as_bytes().chunks(CHUNK_SIZE).collect();
        self.store
            .set(COUNT_KEY, chunks.len().to_string().as_bytes())
            .await?;
        for (index, chunk) in chunks.iter().enumerate() {
            self.store.set(&chunk_key(index), chunk).await?;
        }
        Ok(())
    }

    /// Reassemble the stored blob.
    ///
    /// With a positive chunk count, concatenates chunks `0..count` in
    /// index order; a chunk that has gone missing contributes empty bytes.
    /// With no usable count, falls back to the legacy single record, and
    /// finally to the empty string. Decoding happens once over the
    /// reassembled bytes, so a multi-byte character split across a chunk
    /// boundary survives intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if a store read fails.
    pub async fn load(&self) -> Result<String, StoreError> {
        let count = self.chunk_count().await?;
        if count == 0 {
            let legacy = self.store.get(LEGACY_KEY).await?;
            return Ok(legacy
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default());
        }

        let mut buffer = Vec::with_capacity(count * CHUNK_SIZE);
        for index in 0..count {
            if let Some(chunk) = self.store.get(&chunk_key(index)).await? {
                buffer.extend_from_slice(&chunk);
            }
        }
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl std::fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vpanel_store::MemoryStore;

    fn harness() -> (Arc<MemoryStore>, BlobStore) {
        let store = Arc::new(MemoryStore::new());
        let blob = BlobStore::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        (store, blob)
    }

    #[tokio::test]
    async fn empty_store_loads_empty_string() {
        let (_store, blob) = harness();
        assert_eq!(blob.load().await.unwrap(), "");
    }

    #[tokio::test]
    async fn small_blob_round_trips() {
        let (_store, blob) = harness();
        blob.save("client1=key1\nclient2=key2\n").await.unwrap();
        assert_eq!(blob.load().await.unwrap(), "client1=key1\nclient2=key2\n");
    }

    #[tokio::test]
    async fn multi_chunk_blob_round_trips() {
        let (store, blob) = harness();
        let text: String = "abcdefgh".repeat(2500); // 20 000 bytes
        blob.save(&text).await.unwrap();
        assert_eq!(blob.load().await.unwrap(), text);

        // 20 000 bytes must land as 8000 + 8000 + 4000.
        let chunks = store.list(CHUNK_PREFIX).await.unwrap();
        assert_eq!(chunks.len(), 3);
        let first = store.get(&chunk_key(0)).await.unwrap().unwrap();
        assert_eq!(first.len(), CHUNK_SIZE);
        let last = store.get(&chunk_key(2)).await.unwrap().unwrap();
        assert_eq!(last.len(), 4000);
    }

    #[tokio::test]
    async fn exact_chunk_boundary_round_trips() {
        let (store, blob) = harness();
        let text = "x".repeat(CHUNK_SIZE * 2);
        blob.save(&text).await.unwrap();
        assert_eq!(blob.load().await.unwrap(), text);
        assert_eq!(store.list(CHUNK_PREFIX).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn multibyte_character_split_across_chunks_survives() {
        let (_store, blob) = harness();
        // 7999 ASCII bytes then a 3-byte character straddling the boundary.
        let text = format!("{}\u{20AC}tail", "a".repeat(CHUNK_SIZE - 1));
        blob.save(&text).await.unwrap();
        assert_eq!(blob.load().await.unwrap(), text);
    }

    #[tokio::test]
    async fn shrink_leaves_no_orphaned_chunks() {
        let (store, blob) = harness();
        blob.save(&"y".repeat(CHUNK_SIZE * 4)).await.unwrap();
        blob.save("tiny").await.unwrap();

        assert_eq!(store.list(CHUNK_PREFIX).await.unwrap(), vec![chunk_key(0)]);
        assert_eq!(blob.load().await.unwrap(), "tiny");
    }

    #[tokio::test]
    async fn empty_save_clears_everything() {
        let (store, blob) = harness();
        blob.save(&"z".repeat(CHUNK_SIZE + 5)).await.unwrap();
        blob.save("").await.unwrap();

        assert_eq!(blob.load().await.unwrap(), "");
        assert!(store.list(CHUNK_PREFIX).await.unwrap().is_empty());
        assert_eq!(
            store.get(COUNT_KEY).await.unwrap(),
            Some(b"0".to_vec())
        );
    }

    #[tokio::test]
    async fn legacy_record_is_the_fallback() {
        let (store, blob) = harness();
        store.set(LEGACY_KEY, b"pre-chunking config").await.unwrap();
        assert_eq!(blob.load().await.unwrap(), "pre-chunking config");
    }

    #[tokio::test]
    async fn save_migrates_away_from_legacy_record() {
        let (store, blob) = harness();
        store.set(LEGACY_KEY, b"old form").await.unwrap();
        blob.save("new form").await.unwrap();

        assert_eq!(store.get(LEGACY_KEY).await.unwrap(), None);
        assert_eq!(blob.load().await.unwrap(), "new form");

        // And an empty save afterwards must not resurrect anything.
        blob.save("").await.unwrap();
        assert_eq!(blob.load().await.unwrap(), "");
    }

    #[tokio::test]
    async fn missing_chunk_reads_as_empty_not_error() {
        let (store, blob) = harness();
        blob.save(&"m".repeat(CHUNK_SIZE * 2)).await.unwrap();
        store.delete(&chunk_key(0)).await.unwrap();

        assert_eq!(blob.load().await.unwrap(), "m".repeat(CHUNK_SIZE));
    }

    #[tokio::test]
    async fn garbage_count_degrades_to_legacy() {
        let (store, blob) = harness();
        store.set(COUNT_KEY, b"not a number").await.unwrap();
        store.set(LEGACY_KEY, b"still here").await.unwrap();
        assert_eq!(blob.load().await.unwrap(), "still here");
    }
}
