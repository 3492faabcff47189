//! DMA 二进制格式
//!
//! ```text
//! Container := Chunk*
//! Chunk     := chunkId chunkSize chunkVersion payload
//! Action    := 1 declaredSize chunkVersion animVersion animFlags targetsCount framesTotal Target*
//! Target    := frameCount Frame*
//! Frame     := startVal endVal duration recipDuration nextFrame
//! ```
//!
//! 所有整数与浮点数均为小端。

mod action;
mod chunk;
mod frame;
pub mod primitive;
mod target;

pub use action::DmaAction;
pub use chunk::{Chunk, ChunkPayload, DmaFile, ReadOptions};
pub use frame::DmaFrame;
pub use target::DmaTarget;
