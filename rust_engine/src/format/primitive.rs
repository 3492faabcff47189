//! 小端定长基本类型读写

use std::io::{self, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    reader.read_u32::<LittleEndian>()
}

pub fn read_f32<R: Read>(reader: &mut R) -> io::Result<f32> {
    reader.read_f32::<LittleEndian>()
}

/// 连续读取 N 个 u32
pub fn read_u32_array<R: Read, const N: usize>(reader: &mut R) -> io::Result<[u32; N]> {
    let mut values = [0u32; N];
    reader.read_u32_into::<LittleEndian>(&mut values)?;
    Ok(values)
}

/// 连续读取 N 个 f32
pub fn read_f32_array<R: Read, const N: usize>(reader: &mut R) -> io::Result<[f32; N]> {
    let mut values = [0f32; N];
    reader.read_f32_into::<LittleEndian>(&mut values)?;
    Ok(values)
}

pub fn write_u32<W: Write>(writer: &mut W, value: u32) -> io::Result<()> {
    writer.write_u32::<LittleEndian>(value)
}

pub fn write_f32<W: Write>(writer: &mut W, value: f32) -> io::Result<()> {
    writer.write_f32::<LittleEndian>(value)
}

pub fn write_u32_slice<W: Write>(writer: &mut W, values: &[u32]) -> io::Result<()> {
    values.iter().try_for_each(|&v| write_u32(writer, v))
}

pub fn write_f32_slice<W: Write>(writer: &mut W, values: &[f32]) -> io::Result<()> {
    values.iter().try_for_each(|&v| write_f32(writer, v))
}

/// 获取流总长度，读指针恢复到原位置
pub fn stream_len<S: Seek>(stream: &mut S) -> io::Result<u64> {
    let position = stream.stream_position()?;
    let len = stream.seek(SeekFrom::End(0))?;
    if position != len {
        stream.seek(SeekFrom::Start(position))?;
    }
    Ok(len)
}
