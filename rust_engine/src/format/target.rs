//! Target：一个形态键通道的全部 Frame

use std::io::{Read, Write};

use super::frame::DmaFrame;
use super::primitive::{read_u32, write_u32};
use crate::Result;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DmaTarget {
    pub frames: Vec<DmaFrame>,
}

impl DmaTarget {
    pub fn new(frames: Vec<DmaFrame>) -> Self {
        Self { frames }
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let frame_count = read_u32(reader)?;
        let frames = (0..frame_count)
            .map(|_| DmaFrame::read(reader))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { frames })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u32(writer, self.frames.len() as u32)?;
        for frame in &self.frames {
            frame.write(writer)?;
        }
        Ok(())
    }

    /// 写出的字节数：4 + 20 × Frame 数
    pub fn size(&self) -> u32 {
        4 + DmaFrame::size() * self.frames.len() as u32
    }

    /// 所有 Frame 的总时长（秒）
    pub fn duration(&self) -> f32 {
        self.frames.iter().map(|f| f.duration).sum()
    }
}
