//! Ownership of native vertex buffers.
//!
//! A [`GeometryBuffer`] releases its native storage when dropped. A
//! [`LineSlot`] holds at most one of them and always drops the old buffer
//! before asking the allocator for its replacement.

use crate::error::SketchError;

pub trait GeometryBuffer {
    /// Number of `xyz` vertices currently uploaded.
    fn vertex_count(&self) -> usize;

    /// Overwrites the buffer contents in place. `positions` must keep the
    /// allocated vertex count.
    fn write(&mut self, positions: &[f32]) -> Result<(), SketchError>;
}

pub trait GeometryAllocator {
    type Buffer: GeometryBuffer;

    fn allocate(&self, positions: &[f32]) -> Result<Self::Buffer, SketchError>;
}

#[derive(Debug)]
pub struct LineSlot<B> {
    current: Option<B>,
}

impl<B> Default for LineSlot<B> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<B: GeometryBuffer> LineSlot<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&B> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Discards the current buffer and uploads `positions` into a fresh one.
    /// An empty `positions` just clears the slot.
    pub fn replace<A>(&mut self, allocator: &A, positions: &[f32]) -> Result<(), SketchError>
    where
        A: GeometryAllocator<Buffer = B>,
    {
        self.clear();
        if positions.is_empty() {
            return Ok(());
        }
        self.current = Some(allocator.allocate(positions)?);
        Ok(())
    }

    /// Writes into the existing buffer when the vertex count matches,
    /// otherwise falls back to [`LineSlot::replace`].
    pub fn upload<A>(&mut self, allocator: &A, positions: &[f32]) -> Result<(), SketchError>
    where
        A: GeometryAllocator<Buffer = B>,
    {
        match self.current.as_mut() {
            Some(buf) if buf.vertex_count() * 3 == positions.len() => buf.write(positions),
            _ => self.replace(allocator, positions),
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// Interleaves `xyz` components for upload.
pub fn flatten(points: &[glam::Vec3]) -> Vec<f32> {
    let mut out = Vec::with_capacity(points.len() * 3);
    for p in points {
        out.extend_from_slice(&[p.x, p.y, p.z]);
    }
    out
}
