//! DMA 容器：扁平的 Chunk 序列
//!
//! 每个 Chunk 以 12 字节头（id、size、version）开始。
//! id 为 0x1e 的 Chunk 携带一个 Action，其余 Chunk 按 size 跳过，
//! 或在 `keep_unknown_chunks` 打开时原样保留。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use super::action::DmaAction;
use super::primitive::{read_u32_array, stream_len, write_u32_slice};
use crate::config::{DmaConfig, ACTION_HEADER_SIZE, CHUNK_HEADER_SIZE, DEFAULT_CHUNK_VERSION, DMA_CHUNK_ID};
use crate::version::LibraryVersion;
use crate::Result;

/// Chunk 负载
#[derive(Clone, Debug, PartialEq)]
pub enum ChunkPayload {
    /// 动画数据（id 0x1e）
    Action(DmaAction),
    /// 未识别的 Chunk，保存原始字节
    Opaque(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub chunk_id: u32,
    pub version: u32,
    pub payload: ChunkPayload,
}

impl Chunk {
    /// 创建动画 Chunk
    pub fn action(version: u32, action: DmaAction) -> Self {
        Self {
            chunk_id: DMA_CHUNK_ID,
            version,
            payload: ChunkPayload::Action(action),
        }
    }

    /// 创建未知类型的 Chunk
    pub fn opaque(chunk_id: u32, version: u32, data: Vec<u8>) -> Self {
        Self {
            chunk_id,
            version,
            payload: ChunkPayload::Opaque(data),
        }
    }

    /// 负载字节数，即 Chunk 头中的 size 字段
    pub fn payload_size(&self) -> u32 {
        match &self.payload {
            ChunkPayload::Action(action) => action.size(),
            ChunkPayload::Opaque(data) => data.len() as u32,
        }
    }

    /// 包含 Chunk 头在内的总字节数
    pub fn size(&self) -> u32 {
        CHUNK_HEADER_SIZE + self.payload_size()
    }

    pub fn as_action(&self) -> Option<&DmaAction> {
        match &self.payload {
            ChunkPayload::Action(action) => Some(action),
            ChunkPayload::Opaque(_) => None,
        }
    }

    /// 解包后的库版本
    pub fn library_version(&self) -> LibraryVersion {
        LibraryVersion::unpack(self.version)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let size = self.payload_size();
        write_u32_slice(writer, &[self.chunk_id, size, self.version])?;
        match &self.payload {
            ChunkPayload::Action(action) => action.write_sized(writer, self.version, size),
            ChunkPayload::Opaque(data) => Ok(writer.write_all(data)?),
        }
    }
}

/// 读取选项
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// 保留未知 Chunk 的原始字节；关闭时直接跳过
    pub keep_unknown_chunks: bool,
}

/// DMA 文件数据
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DmaFile {
    pub chunks: Vec<Chunk>,
}

impl DmaFile {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// 只包含一个动画 Chunk 的文件
    pub fn from_action(version: u32, action: DmaAction) -> Self {
        Self::new(vec![Chunk::action(version, action)])
    }

    /// 从文件路径加载 DMA
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_options(path, ReadOptions::default())
    }

    /// 按配置中的读取选项加载
    pub fn load_with_config<P: AsRef<Path>>(path: P, config: &DmaConfig) -> Result<Self> {
        Self::load_with_options(path, config.read_options())
    }

    pub fn load_with_options<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let dma = Self::read_with_options(&mut reader, options)?;
        log::info!(
            "DMA 加载完成: {}, {} 个 Chunk, {} 个动画",
            path.display(),
            dma.chunks.len(),
            dma.actions().count()
        );
        Ok(dma)
    }

    /// 从字节切片加载 DMA
    pub fn load_from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut Cursor::new(bytes))
    }

    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        Self::read_with_options(reader, ReadOptions::default())
    }

    /// 从 Reader 当前位置读到流末尾
    ///
    /// 失败时不返回任何已解析的 Chunk。
    pub fn read_with_options<R: Read + Seek>(reader: &mut R, options: ReadOptions) -> Result<Self> {
        let file_size = stream_len(reader)?;
        let mut chunks = Vec::new();

        while reader.stream_position()? < file_size {
            let [chunk_id, chunk_size, version] = read_u32_array::<_, 3>(reader)?;

            if chunk_id == DMA_CHUNK_ID {
                let (action, header) = DmaAction::read_with_header(reader)?;
                if header.version != version {
                    log::debug!(
                        "Chunk 头版本 0x{:08x} 与 Action 内版本 0x{:08x} 不一致",
                        version,
                        header.version
                    );
                }
                if header.declared_size.wrapping_add(ACTION_HEADER_SIZE) != chunk_size {
                    log::debug!(
                        "Chunk size {} 与 Action 声明大小 {} 不一致",
                        chunk_size,
                        header.declared_size
                    );
                }
                if header.frames_total as usize != action.frame_count() {
                    log::debug!(
                        "Action 声明 {} 个 Frame，实际 {} 个",
                        header.frames_total,
                        action.frame_count()
                    );
                }
                chunks.push(Chunk {
                    chunk_id,
                    version,
                    payload: ChunkPayload::Action(action),
                });
                continue;
            }

            let position = reader.stream_position()?;
            if position + chunk_size as u64 > file_size {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "Chunk 0x{:x} at {} declares {} bytes past end of stream",
                        chunk_id,
                        position - CHUNK_HEADER_SIZE as u64,
                        chunk_size
                    ),
                )
                .into());
            }

            if options.keep_unknown_chunks {
                let mut data = vec![0u8; chunk_size as usize];
                reader.read_exact(&mut data)?;
                log::debug!("保留未知 Chunk 0x{:x} ({} 字节)", chunk_id, chunk_size);
                chunks.push(Chunk::opaque(chunk_id, version, data));
            } else {
                reader.seek(SeekFrom::Current(chunk_size as i64))?;
                log::debug!("跳过未知 Chunk 0x{:x} ({} 字节)", chunk_id, chunk_size);
            }
        }

        Ok(Self { chunks })
    }

    /// 保存到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        log::info!("DMA 保存完成: {}, {} 个 Chunk", path.display(), self.chunks.len());
        Ok(())
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for chunk in &self.chunks {
            chunk.write(writer)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.size() as usize);
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// 写出的总字节数
    pub fn size(&self) -> u32 {
        self.chunks.iter().map(Chunk::size).sum()
    }

    /// 所有动画 Chunk 中的 Action
    pub fn actions(&self) -> impl Iterator<Item = &DmaAction> {
        self.chunks.iter().filter_map(Chunk::as_action)
    }
}

impl Default for Chunk {
    fn default() -> Self {
        Self::action(DEFAULT_CHUNK_VERSION, DmaAction::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DmaFrame, DmaTarget};

    fn sample_action() -> DmaAction {
        DmaAction::new(
            0x100,
            0,
            vec![DmaTarget::new(vec![
                DmaFrame::new(0.0, 10.0, 1.0, 1),
                DmaFrame::new(10.0, 20.0, 1.0, 0),
            ])],
        )
    }

    #[test]
    fn test_empty_file() {
        let dma = DmaFile::default();
        let bytes = dma.to_bytes().unwrap();
        assert!(bytes.is_empty());
        assert_eq!(DmaFile::load_from_bytes(&bytes).unwrap(), dma);
    }

    #[test]
    fn test_action_chunk_roundtrip() {
        let dma = DmaFile::from_action(DEFAULT_CHUNK_VERSION, sample_action());
        let bytes = dma.to_bytes().unwrap();
        assert_eq!(bytes.len() as u32, dma.size());
        // Chunk 头 size 等于 Action 大小，Action 内 size 少 12
        assert_eq!(&bytes[4..8], &(sample_action().size()).to_le_bytes());
        assert_eq!(&bytes[16..20], &(sample_action().size() - 12).to_le_bytes());
        assert_eq!(&bytes[20..24], &DEFAULT_CHUNK_VERSION.to_le_bytes());

        assert_eq!(DmaFile::load_from_bytes(&bytes).unwrap(), dma);
    }

    #[test]
    fn test_unknown_chunk_skipped() {
        let mut bytes = Vec::new();
        Chunk::opaque(0x10, 0x1234, vec![0xaa; 37]).write(&mut bytes).unwrap();
        Chunk::action(DEFAULT_CHUNK_VERSION, sample_action()).write(&mut bytes).unwrap();

        let dma = DmaFile::load_from_bytes(&bytes).unwrap();
        assert_eq!(dma.chunks.len(), 1);
        assert_eq!(dma.chunks[0].chunk_id, DMA_CHUNK_ID);
        assert_eq!(dma.chunks[0].as_action(), Some(&sample_action()));
    }

    #[test]
    fn test_unknown_chunk_kept() {
        let dma = DmaFile::new(vec![
            Chunk::opaque(0x10, 0x1234, vec![1, 2, 3, 4, 5]),
            Chunk::action(DEFAULT_CHUNK_VERSION, sample_action()),
            Chunk::opaque(0x253f2fe, 7, Vec::new()),
        ]);
        let bytes = dma.to_bytes().unwrap();

        let options = ReadOptions { keep_unknown_chunks: true };
        let read = DmaFile::read_with_options(&mut Cursor::new(bytes.as_slice()), options).unwrap();
        assert_eq!(read, dma);
        assert_eq!(read.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_truncated_header_is_io_error() {
        let mut bytes = DmaFile::from_action(DEFAULT_CHUNK_VERSION, sample_action())
            .to_bytes()
            .unwrap();
        bytes.extend_from_slice(&[0x1e, 0, 0, 0, 8]);
        assert!(DmaFile::load_from_bytes(&bytes).unwrap_err().is_io_error());
    }

    #[test]
    fn test_truncated_action_is_io_error() {
        let bytes = DmaFile::from_action(DEFAULT_CHUNK_VERSION, sample_action())
            .to_bytes()
            .unwrap();
        let err = DmaFile::load_from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(err.is_io_error());
    }

    #[test]
    fn test_unknown_chunk_past_end_is_io_error() {
        let mut bytes = Vec::new();
        write_u32_slice(&mut bytes, &[0x10, 100, 0]).unwrap();
        bytes.extend_from_slice(&[0u8; 20]);
        assert!(DmaFile::load_from_bytes(&bytes).unwrap_err().is_io_error());
    }

    #[test]
    fn test_library_version() {
        let chunk = Chunk::default();
        assert_eq!(chunk.library_version().to_string(), "3.7.0.2");
    }
}
