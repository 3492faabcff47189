//! Frame：一段分段线性曲线

use std::io::{Read, Write};

use super::primitive::{read_f32_array, read_u32, write_f32_slice, write_u32};
use crate::config::FRAME_SIZE;
use crate::Result;

/// 单个 Frame（20 字节）
///
/// `recip_duration` 是 `1 / duration` 的缓存值，由生成方负责保持一致。
/// `next_frame` 是同一 Target 内后继 Frame 的索引。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DmaFrame {
    pub start_val: f32,
    pub end_val: f32,
    pub duration: f32,
    pub recip_duration: f32,
    pub next_frame: u32,
}

impl DmaFrame {
    pub fn new(start_val: f32, end_val: f32, duration: f32, next_frame: u32) -> Self {
        Self {
            start_val,
            end_val,
            duration,
            recip_duration: 1.0 / duration,
            next_frame,
        }
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let [start_val, end_val, duration, recip_duration] = read_f32_array::<_, 4>(reader)?;
        let next_frame = read_u32(reader)?;
        Ok(Self {
            start_val,
            end_val,
            duration,
            recip_duration,
            next_frame,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_f32_slice(
            writer,
            &[self.start_val, self.end_val, self.duration, self.recip_duration],
        )?;
        write_u32(writer, self.next_frame)?;
        Ok(())
    }

    pub const fn size() -> u32 {
        FRAME_SIZE
    }
}
