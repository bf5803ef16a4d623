//! Deterministic result assembly
//!
//! Concatenates per-chunk outputs strictly in chunk index order,
//! independent of the order workers finished in. Any failure recorded in
//! a work item fails the whole merge; there is no partial-success path.

use crate::error::{MinifyError, Result};
use crate::executor::WorkItem;

fn first_failure(items: &[WorkItem]) -> Option<MinifyError> {
    items.iter().find_map(WorkItem::failure)
}

/// Total minified size across all items
pub fn merged_len(items: &[WorkItem]) -> usize {
    items.iter().map(|item| item.written).sum()
}

/// Assemble chunk outputs into a freshly allocated buffer.
pub fn merge(items: &[WorkItem]) -> Result<Vec<u8>> {
    if let Some(err) = first_failure(items) {
        return Err(err);
    }

    let mut output = Vec::with_capacity(merged_len(items));
    for (i, item) in items.iter().enumerate() {
        debug_assert_eq!(item.chunk.index as usize, i);
        output.extend_from_slice(item.minified());
    }
    Ok(output)
}

/// Assemble chunk outputs into a caller-owned buffer, returning the
/// number of bytes written.
pub fn merge_into(items: &[WorkItem], output: &mut [u8]) -> Result<usize> {
    if let Some(err) = first_failure(items) {
        return Err(err);
    }

    let total = merged_len(items);
    if total > output.len() {
        return Err(MinifyError::BufferTooSmall {
            needed: total,
            available: output.len(),
        });
    }

    let mut written = 0usize;
    for (i, item) in items.iter().enumerate() {
        debug_assert_eq!(item.chunk.index as usize, i);
        let bytes = item.minified();
        output[written..written + bytes.len()].copy_from_slice(bytes);
        written += bytes.len();
    }
    Ok(written)
}
