//! Action：一个网格全部形态键通道的动画片段

use std::io::{Read, Write};

use super::primitive::{read_u32, read_u32_array, write_u32_slice};
use super::target::DmaTarget;
use crate::config::{ACTION_HEADER_SIZE, ACTION_INFO_SIZE, ACTION_RESERVED, DMA_ANIM_VERSION};
use crate::Result;

#[derive(Clone, Debug, PartialEq)]
pub struct DmaAction {
    pub anim_version: u32,
    pub anim_flags: u32,
    pub targets: Vec<DmaTarget>,
}

/// Action 头中与外层 Chunk 重复的字段，只用于诊断
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ActionHeader {
    pub declared_size: u32,
    pub version: u32,
    pub frames_total: u32,
}

impl DmaAction {
    pub fn new(anim_version: u32, anim_flags: u32, targets: Vec<DmaTarget>) -> Self {
        Self {
            anim_version,
            anim_flags,
            targets,
        }
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_with_header(reader).map(|(action, _)| action)
    }

    pub(crate) fn read_with_header<R: Read>(reader: &mut R) -> Result<(Self, ActionHeader)> {
        // 保留字段，总是 1
        let _reserved = read_u32(reader)?;
        let [declared_size, version] = read_u32_array::<_, 2>(reader)?;
        let [anim_version, anim_flags, target_count, frames_total] = read_u32_array::<_, 4>(reader)?;

        let targets = (0..target_count)
            .map(|_| DmaTarget::read(reader))
            .collect::<Result<Vec<_>>>()?;

        let header = ActionHeader {
            declared_size,
            version,
            frames_total,
        };
        Ok((Self::new(anim_version, anim_flags, targets), header))
    }

    /// 写出 Action，`version` 与外层 Chunk 头中的版本相同
    pub fn write<W: Write>(&self, writer: &mut W, version: u32) -> Result<()> {
        self.write_sized(writer, version, self.size())
    }

    /// `size` 必须等于 `self.size()`，由 Chunk 写入时只计算一次
    pub(crate) fn write_sized<W: Write>(&self, writer: &mut W, version: u32, size: u32) -> Result<()> {
        write_u32_slice(
            writer,
            &[
                ACTION_RESERVED,
                size - ACTION_HEADER_SIZE,
                version,
                self.anim_version,
                self.anim_flags,
                self.targets.len() as u32,
                self.frame_count() as u32,
            ],
        )?;
        for target in &self.targets {
            target.write(writer)?;
        }
        Ok(())
    }

    /// 写出的字节数
    pub fn size(&self) -> u32 {
        ACTION_HEADER_SIZE + ACTION_INFO_SIZE + self.targets.iter().map(DmaTarget::size).sum::<u32>()
    }

    /// 所有 Target 的 Frame 总数
    pub fn frame_count(&self) -> usize {
        self.targets.iter().map(|t| t.frames.len()).sum()
    }
}

impl Default for DmaAction {
    fn default() -> Self {
        Self::new(DMA_ANIM_VERSION, 0, Vec::new())
    }
}
