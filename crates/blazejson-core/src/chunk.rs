//! Safe-boundary chunk partitioning
//!
//! Splits a large input into contiguous byte ranges that can be minified
//! independently. A cut is only taken outside string literals, never
//! between a backslash and its escaped byte, and only right after a
//! comma or closing bracket once the nesting depth has come back to the
//! level seen at the chunk's target offset. Each chunk records the depth
//! it starts at; the start depth of chunk `i + 1` always equals the depth
//! at the end of chunk `i`.

/// What kind of safe boundary terminated a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Input end (always the final chunk)
    None,
    /// Cut right after a `}`
    ObjectClose,
    /// Cut right after a `]`
    ArrayClose,
    /// Cut right after a `,` at the reference depth
    TopLevelComma,
}

/// One independently-processable byte range of the input.
///
/// Read-only once created; the range references the shared input buffer
/// and is never copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Position in the ordered chunk sequence
    pub index: u32,
    /// Byte offset into the input
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
    /// Nesting depth at the first byte of this chunk
    pub start_depth: i32,
    /// Boundary that terminated this chunk
    pub boundary_kind: BoundaryKind,
}

impl Chunk {
    /// End offset (exclusive)
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

fn single_chunk(input: &[u8]) -> Vec<Chunk> {
    vec![Chunk {
        index: 0,
        offset: 0,
        len: input.len(),
        start_depth: 0,
        boundary_kind: BoundaryKind::None,
    }]
}

/// Partition `input` into at most `target_chunk_count` depth-balanced
/// chunks.
///
/// One sequential pass tracks `in_string`, escape parity, and nesting
/// depth; every candidate boundary shares that state, so the whole
/// partition costs O(n). Inputs below `min_chunk_size` degenerate to a
/// single chunk (callers should run a kernel directly below that size).
/// The ranges are contiguous, non-overlapping, cover the input exactly,
/// and are ordered by index.
pub fn partition(input: &[u8], target_chunk_count: usize, min_chunk_size: usize) -> Vec<Chunk> {
    // A chunk's minified length is recorded in a u32
    let floor = input.len().div_ceil(u32::MAX as usize).max(1);
    let target = target_chunk_count.max(floor);

    if input.len() < min_chunk_size.max(1) || target <= 1 {
        return single_chunk(input);
    }

    let stride = (input.len() / target).max(1);
    let mut chunks: Vec<Chunk> = Vec::with_capacity(target);

    let mut in_string = false;
    let mut escape_active = false;
    let mut depth = 0i32;

    let mut chunk_start = 0usize;
    let mut chunk_start_depth = 0i32;

    // Next even target offset and the depth captured when crossing it
    let mut next_target = stride;
    let mut target_depth: Option<i32> = None;

    for (i, &byte) in input.iter().enumerate() {
        if target_depth.is_none() && i >= next_target {
            target_depth = Some(depth);
        }

        if escape_active {
            escape_active = false;
        } else if in_string {
            match byte {
                b'\\' => escape_active = true,
                b'"' => in_string = false,
                _ => {}
            }
        } else {
            match byte {
                b'"' => in_string = true,
                b'{' | b'[' => depth += 1,
                b'}' | b']' => depth -= 1,
                _ => {}
            }
        }

        if chunks.len() + 1 >= target {
            // The final chunk absorbs the rest
            break;
        }

        let reference_depth = match target_depth {
            Some(d) => d,
            None => continue,
        };

        let boundary_kind = match byte {
            _ if in_string => continue,
            b'}' => BoundaryKind::ObjectClose,
            b']' => BoundaryKind::ArrayClose,
            b',' => BoundaryKind::TopLevelComma,
            _ => continue,
        };

        // Cut after this byte once depth is back at (or above) the level
        // seen at the target offset
        if depth > reference_depth {
            continue;
        }

        let cut = i + 1;
        if cut >= input.len() {
            break;
        }

        chunks.push(Chunk {
            index: chunks.len() as u32,
            offset: chunk_start,
            len: cut - chunk_start,
            start_depth: chunk_start_depth,
            boundary_kind,
        });
        chunk_start = cut;
        chunk_start_depth = depth;
        target_depth = None;
        while next_target <= cut {
            next_target += stride;
        }
    }

    chunks.push(Chunk {
        index: chunks.len() as u32,
        offset: chunk_start,
        len: input.len() - chunk_start,
        start_depth: chunk_start_depth,
        boundary_kind: BoundaryKind::None,
    });

    chunks
}
