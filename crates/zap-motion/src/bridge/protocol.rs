/// Shared motion buffer layout.
/// Must stay in sync with the TypeScript reader.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 4 floats]
/// [Translate: 2 floats]
/// ```
///
/// Written once per frame by the runner; JS reads it through a raw pointer.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 4;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_RUNNING: usize = 2;
pub const HEADER_COMPLETED: usize = 3;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Latest offset produced by a motion sequence.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Translate {
    pub x: f32,
    pub y: f32,
}

impl Translate {
    pub const FLOATS: usize = 2;
}

impl From<Vec2> for Translate {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Total floats in the buffer.
pub const BUFFER_FLOATS: usize = HEADER_FLOATS + Translate::FLOATS;

/// Flat f32 buffer read by JS.
#[derive(Debug, Clone)]
pub struct MotionBuffer {
    data: [f32; BUFFER_FLOATS],
}

impl MotionBuffer {
    pub fn new() -> Self {
        let mut data = [0.0; BUFFER_FLOATS];
        data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        Self { data }
    }

    /// Store the latest offset and bump the frame counter.
    pub fn write_translate(&mut self, translate: Translate) {
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&translate));
        self.data[HEADER_FLOATS..].copy_from_slice(floats);
        self.data[HEADER_FRAME_COUNTER] += 1.0;
    }

    pub fn set_running(&mut self, running: bool) {
        self.data[HEADER_RUNNING] = if running { 1.0 } else { 0.0 };
    }

    pub fn set_completed(&mut self, completed: bool) {
        self.data[HEADER_COMPLETED] = if completed { 1.0 } else { 0.0 };
    }

    /// Last written offset.
    pub fn translate(&self) -> Translate {
        *bytemuck::from_bytes(bytemuck::cast_slice(&self.data[HEADER_FLOATS..]))
    }

    pub fn frame_counter(&self) -> u32 {
        self.data[HEADER_FRAME_COUNTER] as u32
    }

    pub fn is_running(&self) -> bool {
        self.data[HEADER_RUNNING] != 0.0
    }

    pub fn is_completed(&self) -> bool {
        self.data[HEADER_COMPLETED] != 0.0
    }

    /// Raw pointer for JS reads.
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        BUFFER_FLOATS
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for MotionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
