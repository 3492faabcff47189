//! DMA Engine - Sonic Heroes Delta Morph Animation 编解码
//!
//! 提供以下功能：
//! - DMA 容器的 Chunk 读写（未知 Chunk 跳过或原样保留）
//! - Action / Target / Frame 二进制记录编解码
//! - RenderWare 库版本号的打包与解包
//! - 分段线性 Frame 与关键帧曲线之间的转换
//! - 形态键动画的导入与导出

pub mod animation;
pub mod config;
pub mod format;
pub mod version;

pub use animation::{Interpolation, LinkPolicy, MorphCurve, MorphKeyframe, ShapeKeyAnimation};
pub use config::DmaConfig;
pub use format::{
    Chunk, ChunkPayload, DmaAction, DmaFile, DmaFrame, DmaTarget, ReadOptions,
};
pub use version::LibraryVersion;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DmaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zero duration segment in target {target} at keyframe {keyframe} (time {time})")]
    ZeroDuration {
        target: usize,
        keyframe: usize,
        time: f32,
    },

    #[error("Channel count mismatch: expected {expected}, found {found}")]
    ChannelCountMismatch { expected: usize, found: usize },

    #[error("Invalid version string: {0:?}")]
    InvalidVersionString(String),
}

impl DmaError {
    /// 是否为数据错误（结构完整但语义无效）
    pub fn is_data_error(&self) -> bool {
        !self.is_io_error()
    }

    /// 是否为 IO 错误（流提前结束、文件打开/写入失败）
    pub fn is_io_error(&self) -> bool {
        matches!(self, DmaError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, DmaError>;
