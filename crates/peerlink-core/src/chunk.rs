//! Chunk split and reassembly for oversized payloads
//!
//! Payloads larger than the per-chunk data cap are split into ordered
//! fragments sharing a freshly generated parent identifier, and rejoined
//! on the receiving side once every index has arrived. Arrival order
//! does not matter; duplicate indices overwrite silently. Partial
//! reassemblies that stop receiving chunks are reclaimed after an
//! inactivity window so an abandoned transfer cannot leak buffers.

use std::time::{Duration, Instant};

use bytes::{Bytes, BytesMut};
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::ChunkMeta;
use crate::DEFAULT_REASSEMBLY_TTL;

/// One fragment of a payload, ready for enveloping
#[derive(Debug, Clone)]
pub struct ChunkDescriptor {
    /// Ordering metadata; `None` when the payload fit in a single frame
    pub meta: Option<ChunkMeta>,
    /// Raw fragment bytes
    pub data: Bytes,
}

/// Split a payload into fragments of at most `max_chunk_size` bytes
///
/// A payload that already fits passes through as a single descriptor
/// with no chunk metadata. Larger payloads produce exactly
/// `ceil(len / max_chunk_size)` contiguous fragments in original order,
/// sharing one collision-resistant parent identifier. Fragment bodies
/// are zero-copy slices of the input.
pub fn split(payload: Bytes, max_chunk_size: usize) -> Vec<ChunkDescriptor> {
    assert!(max_chunk_size > 0, "max chunk size must be nonzero");

    if payload.len() <= max_chunk_size {
        return vec![ChunkDescriptor {
            meta: None,
            data: payload,
        }];
    }

    let parent = Uuid::new_v4().to_string();
    let total = payload.len().div_ceil(max_chunk_size) as u32;
    let mut chunks = Vec::with_capacity(total as usize);

    for index in 0..total {
        let start = index as usize * max_chunk_size;
        let end = usize::min(start + max_chunk_size, payload.len());
        chunks.push(ChunkDescriptor {
            meta: Some(ChunkMeta {
                parent: parent.clone(),
                index,
                total,
            }),
            data: payload.slice(start..end),
        });
    }

    debug!(parent = %parent, total, bytes = payload.len(), "split oversized payload");
    chunks
}

/// Buffer for one in-flight payload, indexed by sequence index
#[derive(Debug)]
struct ReassemblyBuffer {
    slots: Vec<Option<Bytes>>,
    received: u32,
    last_touched: Instant,
}

impl ReassemblyBuffer {
    fn new(total: u32) -> Self {
        Self {
            slots: vec![None; total as usize],
            received: 0,
            last_touched: Instant::now(),
        }
    }

    fn insert(&mut self, index: u32, data: Bytes) {
        let slot = &mut self.slots[index as usize];
        if slot.is_none() {
            self.received += 1;
        }
        // duplicate delivery overwrites the same slot
        *slot = Some(data);
        self.last_touched = Instant::now();
    }

    fn is_complete(&self) -> bool {
        self.received as usize == self.slots.len()
    }

    /// Byte-for-byte join in index order, no padding, no separators
    fn join(self) -> Bytes {
        let len = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().map_or(0, |data| data.len()))
            .sum();
        let mut out = BytesMut::with_capacity(len);
        for slot in self.slots {
            if let Some(data) = slot {
                out.extend_from_slice(&data);
            }
        }
        out.freeze()
    }
}

/// Reassembles chunked payloads, keyed by parent identifier
///
/// Arrivals for different parents never contend; arrivals for the same
/// parent are serialized by the map's per-entry lock, so out-of-order
/// delivery from independent execution contexts cannot lose updates.
pub struct Reassembler {
    buffers: DashMap<String, ReassemblyBuffer>,
    ttl: Duration,
    sweep_interval: Duration,
    last_sweep: Mutex<Instant>,
}

impl Reassembler {
    /// Reassembler with the default inactivity bound
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_REASSEMBLY_TTL)
    }

    /// Reassembler reclaiming partial payloads idle longer than `ttl`
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            buffers: DashMap::new(),
            ttl,
            sweep_interval: ttl / 2,
            last_sweep: Mutex::new(Instant::now()),
        }
    }

    /// Accept one chunk
    ///
    /// Returns the rejoined payload once every index for the parent has
    /// arrived, `None` while the payload is still incomplete. A chunk
    /// whose declared total conflicts with the open buffer drops the
    /// whole in-flight payload.
    pub fn accept(&self, meta: &ChunkMeta, data: Bytes) -> Result<Option<Bytes>> {
        self.maybe_sweep();

        if meta.total == 0 || meta.index >= meta.total {
            return Err(Error::ChunkIndexOutOfRange {
                index: meta.index,
                total: meta.total,
            });
        }

        let mut entry = self
            .buffers
            .entry(meta.parent.clone())
            .or_insert_with(|| ReassemblyBuffer::new(meta.total));

        if entry.slots.len() != meta.total as usize {
            let expected = entry.slots.len() as u32;
            drop(entry);
            self.buffers.remove(&meta.parent);
            warn!(
                parent = %meta.parent,
                expected,
                got = meta.total,
                "conflicting chunk totals, dropping in-flight payload"
            );
            return Err(Error::InconsistentChunkMetadata {
                parent: meta.parent.clone(),
                expected,
                got: meta.total,
            });
        }

        entry.insert(meta.index, data);

        if entry.is_complete() {
            drop(entry);
            if let Some((_, buffer)) = self.buffers.remove(&meta.parent) {
                debug!(parent = %meta.parent, total = meta.total, "payload reassembled");
                return Ok(Some(buffer.join()));
            }
        }

        Ok(None)
    }

    /// Number of in-flight partial payloads
    pub fn pending(&self) -> usize {
        self.buffers.len()
    }

    /// Drop buffers idle longer than the inactivity bound
    ///
    /// Runs lazily from [`Reassembler::accept`]; callable from a
    /// periodic task as well. Returns the number of buffers reclaimed.
    pub fn evict_stale(&self) -> usize {
        let before = self.buffers.len();
        self.buffers.retain(|parent, buffer| {
            let keep = buffer.last_touched.elapsed() < self.ttl;
            if !keep {
                warn!(
                    parent = %parent,
                    received = buffer.received,
                    total = buffer.slots.len(),
                    "evicting stale partial reassembly"
                );
            }
            keep
        });
        before - self.buffers.len()
    }

    fn maybe_sweep(&self) {
        {
            let mut last = self.last_sweep.lock();
            if last.elapsed() < self.sweep_interval {
                return;
            }
            *last = Instant::now();
        }
        self.evict_stale();
    }
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_payload_passthrough() {
        let payload = Bytes::from(vec![7u8; 100]);
        let chunks = split(payload.clone(), 100);
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].meta.is_none());
        assert_eq!(chunks[0].data, payload);
    }

    #[test]
    fn test_split_shares_parent_and_indexes_contiguously() {
        let chunks = split(Bytes::from(vec![0u8; 250]), 100);
        assert_eq!(chunks.len(), 3);
        let parent = &chunks[0].meta.as_ref().unwrap().parent;
        for (i, chunk) in chunks.iter().enumerate() {
            let meta = chunk.meta.as_ref().unwrap();
            assert_eq!(&meta.parent, parent);
            assert_eq!(meta.index, i as u32);
            assert_eq!(meta.total, 3);
        }
        assert_eq!(chunks[0].data.len(), 100);
        assert_eq!(chunks[2].data.len(), 50);
    }

    #[test]
    fn test_distinct_payloads_get_distinct_parents() {
        let a = split(Bytes::from(vec![0u8; 20]), 10);
        let b = split(Bytes::from(vec![0u8; 20]), 10);
        assert_ne!(
            a[0].meta.as_ref().unwrap().parent,
            b[0].meta.as_ref().unwrap().parent
        );
    }

    #[test]
    fn test_zero_total_rejected() {
        let reassembler = Reassembler::new();
        let meta = ChunkMeta {
            parent: "p".to_string(),
            index: 0,
            total: 0,
        };
        let result = reassembler.accept(&meta, Bytes::new());
        assert!(matches!(result, Err(Error::ChunkIndexOutOfRange { .. })));
    }
}
