//! Fixed worker pool and parallel chunk execution
//!
//! A pool of OS threads created once per engine and reused across calls.
//! Idle workers block on a condvar; a call publishes one batch of chunks,
//! workers claim indices from an atomic cursor, and the calling thread
//! blocks at the join barrier until the last chunk reports completion.
//! Each work slot's output buffer is written by exactly one worker and
//! handed to the caller read-only through a Release/Acquire pair.

use std::cell::UnsafeCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex};
use tracing::trace;

use blazejson_simd::{minify_scalar, SimdBackend};

use crate::chunk::Chunk;
use crate::error::{MinifyError, Result};

/// Kernel workers run on each chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelChoice {
    Scalar,
    Simd,
}

/// Per-chunk outcome recorded by the worker that processed it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStatus {
    Ok,
    AllocationFailed,
    OutputOverflow,
    Panicked,
}

const STATUS_PENDING: u8 = 0;
const STATUS_OK: u8 = 1;
const STATUS_ALLOC_FAILED: u8 = 2;
const STATUS_OUTPUT_OVERFLOW: u8 = 3;
const STATUS_PANICKED: u8 = 4;

impl ChunkStatus {
    fn from_code(code: u8) -> Self {
        match code {
            STATUS_OK => ChunkStatus::Ok,
            STATUS_ALLOC_FAILED => ChunkStatus::AllocationFailed,
            STATUS_OUTPUT_OVERFLOW => ChunkStatus::OutputOverflow,
            _ => ChunkStatus::Panicked,
        }
    }
}

/// Completed unit of work, ready for the merger.
///
/// `output[..written]` holds the minified bytes for `chunk`.
#[derive(Debug)]
pub struct WorkItem {
    pub chunk: Chunk,
    pub output: Vec<u8>,
    pub written: usize,
    pub status: ChunkStatus,
}

impl WorkItem {
    /// Minified bytes for this chunk
    pub fn minified(&self) -> &[u8] {
        &self.output[..self.written]
    }

    /// Error recorded for this chunk, if any
    pub fn failure(&self) -> Option<MinifyError> {
        match self.status {
            ChunkStatus::Ok => None,
            ChunkStatus::AllocationFailed => Some(MinifyError::AllocationFailed {
                chunk_index: self.chunk.index,
            }),
            ChunkStatus::OutputOverflow => Some(MinifyError::BufferTooSmall {
                needed: self.chunk.len,
                available: self.output.len(),
            }),
            ChunkStatus::Panicked => Some(MinifyError::WorkerPanicked {
                chunk_index: self.chunk.index,
            }),
        }
    }
}

/// Raw view of the caller's input buffer, shared read-only with workers.
///
/// `execute` blocks at the join barrier until every worker is done with
/// the batch, so the borrow this was created from is still live for any
/// worker read.
struct SharedInput {
    ptr: *const u8,
    len: usize,
}

unsafe impl Send for SharedInput {}
unsafe impl Sync for SharedInput {}

impl SharedInput {
    unsafe fn as_slice(&self) -> &[u8] {
        std::slice::from_raw_parts(self.ptr, self.len)
    }
}

/// One chunk's slot in a batch. The claiming worker is the only writer of
/// `output` and `written`; setting `completed` with Release transfers the
/// buffer read-only to the caller.
struct WorkSlot {
    chunk: Chunk,
    output: UnsafeCell<Vec<u8>>,
    written: AtomicU32,
    status: AtomicU8,
    completed: AtomicBool,
}

unsafe impl Sync for WorkSlot {}

/// One call's worth of chunks, shared between the caller and the pool
struct Batch {
    input: SharedInput,
    backend: SimdBackend,
    kernel: KernelChoice,
    next: AtomicUsize,
    remaining: AtomicUsize,
    slots: Vec<WorkSlot>,
}

impl Batch {
    fn run_slot(&self, idx: usize) {
        let slot = &self.slots[idx];
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.minify_slot(slot)));
        let status = outcome.unwrap_or(STATUS_PANICKED);
        slot.status.store(status, Ordering::Relaxed);
        slot.completed.store(true, Ordering::Release);
    }

    fn minify_slot(&self, slot: &WorkSlot) -> u8 {
        let input = unsafe { self.input.as_slice() };
        let chunk_input = &input[slot.chunk.offset..slot.chunk.end()];

        let mut buffer = Vec::new();
        if buffer.try_reserve_exact(chunk_input.len()).is_err() {
            return STATUS_ALLOC_FAILED;
        }
        buffer.resize(chunk_input.len(), 0);

        let result = match self.kernel {
            KernelChoice::Scalar => minify_scalar(chunk_input, &mut buffer),
            KernelChoice::Simd => self.backend.minify(chunk_input, &mut buffer),
        };

        match result {
            Ok(written) => {
                slot.written.store(written as u32, Ordering::Relaxed);
                // Sole writer for this slot until `completed` is set
                unsafe {
                    *slot.output.get() = buffer;
                }
                STATUS_OK
            }
            Err(_) => STATUS_OUTPUT_OVERFLOW,
        }
    }
}

struct PoolState {
    batch: Option<Arc<Batch>>,
}

struct PoolShared {
    state: Mutex<PoolState>,
    work_cv: Condvar,
    done_cv: Condvar,
    shutdown: AtomicBool,
}

/// Fixed-size worker pool.
///
/// Threads are spawned once at construction and torn down on drop via a
/// shutdown flag plus wake broadcast. Calls are serialized: one batch is
/// in flight at a time, and the calling thread is never part of the pool.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    handles: Vec<JoinHandle<()>>,
    call_lock: Mutex<()>,
    workers: usize,
}

impl WorkerPool {
    /// Spawn a pool with `workers` threads (minimum one).
    ///
    /// A spawn failure tears down any threads already started and is
    /// fatal to engine construction.
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState { batch: None }),
            work_cv: Condvar::new(),
            done_cv: Condvar::new(),
            shutdown: AtomicBool::new(false),
        });

        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let worker_shared = Arc::clone(&shared);
            let spawned = std::thread::Builder::new()
                .name(format!("blazejson-worker-{id}"))
                .spawn(move || worker_loop(&worker_shared));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    shared.shutdown.store(true, Ordering::Relaxed);
                    shared.work_cv.notify_all();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(MinifyError::ThreadSpawnFailed(err));
                }
            }
        }

        trace!(workers, "worker pool started");
        Ok(Self {
            shared,
            handles,
            call_lock: Mutex::new(()),
            workers,
        })
    }

    /// Number of worker threads
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Run every chunk through the chosen kernel on the pool and block
    /// until all of them report completion.
    ///
    /// Chunk processing order is unspecified; the returned items are in
    /// chunk index order regardless. A failing chunk is recorded in its
    /// `WorkItem` and does not abort siblings.
    pub fn execute(
        &self,
        chunks: Vec<Chunk>,
        input: &[u8],
        kernel: KernelChoice,
        backend: &SimdBackend,
    ) -> Result<Vec<WorkItem>> {
        if chunks.is_empty() {
            return Ok(Vec::new());
        }

        let slots: Vec<WorkSlot> = chunks
            .into_iter()
            .map(|chunk| WorkSlot {
                chunk,
                output: UnsafeCell::new(Vec::new()),
                written: AtomicU32::new(0),
                status: AtomicU8::new(STATUS_PENDING),
                completed: AtomicBool::new(false),
            })
            .collect();

        let batch = Arc::new(Batch {
            input: SharedInput {
                ptr: input.as_ptr(),
                len: input.len(),
            },
            backend: backend.clone(),
            kernel,
            next: AtomicUsize::new(0),
            remaining: AtomicUsize::new(slots.len()),
            slots,
        });

        let _call = self.call_lock.lock();
        trace!(chunks = batch.slots.len(), "dispatching batch");
        {
            let mut state = self.shared.state.lock();
            state.batch = Some(Arc::clone(&batch));
            self.shared.work_cv.notify_all();

            // Join barrier: the only suspension point of the calling thread
            while batch.remaining.load(Ordering::Acquire) != 0 {
                self.shared.done_cv.wait(&mut state);
            }
        }

        // remaining hit zero with Release ordering on every worker's
        // decrement, so all slot writes happened before this point and no
        // worker touches a slot again
        let items = batch
            .slots
            .iter()
            .map(|slot| {
                debug_assert!(slot.completed.load(Ordering::Acquire));
                let output = unsafe { std::mem::take(&mut *slot.output.get()) };
                WorkItem {
                    chunk: slot.chunk,
                    written: slot.written.load(Ordering::Relaxed) as usize,
                    status: ChunkStatus::from_code(slot.status.load(Ordering::Relaxed)),
                    output,
                }
            })
            .collect();

        Ok(items)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Relaxed);
        {
            let _state = self.shared.state.lock();
            self.shared.work_cv.notify_all();
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let (batch, idx) = {
            let mut state = shared.state.lock();
            loop {
                if shared.shutdown.load(Ordering::Relaxed) {
                    return;
                }
                if let Some(batch) = state.batch.as_ref() {
                    let idx = batch.next.fetch_add(1, Ordering::Relaxed);
                    if idx < batch.slots.len() {
                        break (Arc::clone(batch), idx);
                    }
                    // Batch exhausted: stop handing it out
                    state.batch = None;
                }
                shared.work_cv.wait(&mut state);
            }
        };

        batch.run_slot(idx);

        if batch.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Last chunk: wake the caller blocked at the join barrier
            let _state = shared.state.lock();
            shared.done_cv.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::partition;

    fn minify_reference(input: &[u8]) -> Vec<u8> {
        let mut output = vec![0u8; input.len()];
        let written = minify_scalar(input, &mut output).unwrap();
        output.truncate(written);
        output
    }

    fn sample_input() -> Vec<u8> {
        let mut input = Vec::from(&b"[ "[..]);
        for i in 0..5_000 {
            if i > 0 {
                input.extend_from_slice(b" ,\n ");
            }
            input.extend_from_slice(format!("{{ \"id\" : {i} , \"tag\" : \"item {i}\" }}").as_bytes());
        }
        input.extend_from_slice(b" ]");
        input
    }

    #[test]
    fn test_execute_matches_scalar_reference() {
        let input = sample_input();
        let pool = WorkerPool::new(4).unwrap();
        let backend = SimdBackend::auto_detect();

        let chunks = partition(&input, 8, 256);
        let items = pool
            .execute(chunks, &input, KernelChoice::Simd, &backend)
            .unwrap();

        let mut merged = Vec::new();
        for item in &items {
            assert_eq!(item.status, ChunkStatus::Ok);
            merged.extend_from_slice(item.minified());
        }
        assert_eq!(merged, minify_reference(&input));
    }

    #[test]
    fn test_items_come_back_in_index_order() {
        let input = sample_input();
        let pool = WorkerPool::new(8).unwrap();
        let backend = SimdBackend::scalar();

        let chunks = partition(&input, 16, 64);
        let items = pool
            .execute(chunks, &input, KernelChoice::Scalar, &backend)
            .unwrap();
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.chunk.index as usize, i);
        }
    }

    #[test]
    fn test_pool_reused_across_calls() {
        let input = sample_input();
        let pool = WorkerPool::new(2).unwrap();
        let backend = SimdBackend::auto_detect();
        let expected = minify_reference(&input);

        for _ in 0..5 {
            let chunks = partition(&input, 4, 256);
            let items = pool
                .execute(chunks, &input, KernelChoice::Simd, &backend)
                .unwrap();
            let merged: Vec<u8> = items.iter().flat_map(|i| i.minified().to_vec()).collect();
            assert_eq!(merged, expected);
        }
    }

    #[test]
    fn test_empty_chunk_list() {
        let pool = WorkerPool::new(2).unwrap();
        let backend = SimdBackend::scalar();
        let items = pool
            .execute(Vec::new(), b"", KernelChoice::Scalar, &backend)
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_pool_drops_cleanly_without_work() {
        let pool = WorkerPool::new(4).unwrap();
        assert_eq!(pool.worker_count(), 4);
        drop(pool);
    }

    #[test]
    fn test_single_worker_pool() {
        let input = sample_input();
        let pool = WorkerPool::new(1).unwrap();
        let backend = SimdBackend::auto_detect();

        let chunks = partition(&input, 4, 256);
        let items = pool
            .execute(chunks, &input, KernelChoice::Simd, &backend)
            .unwrap();
        let merged: Vec<u8> = items.iter().flat_map(|i| i.minified().to_vec()).collect();
        assert_eq!(merged, minify_reference(&input));
    }
}
