//! DMA 格式常量与运行时配置
//!
//! 格式常量不可变；运行时默认值扁平化存放在 `DmaConfig` 中，
//! 仅供 `ShapeKeyAnimation::import` / `export` 这类便捷入口读取。

use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock};

use crate::format::ReadOptions;

/// 动画 Chunk 的标识
pub const DMA_CHUNK_ID: u32 = 0x1e;

/// 旧版导出器使用的 Chunk 版本（RenderWare 3.7.0.2）
pub const DEFAULT_CHUNK_VERSION: u32 = 0x1c02002d;

/// Action 内部的动画版本
pub const DMA_ANIM_VERSION: u32 = 0x100;

/// 默认帧率，秒与帧号之间的换算系数
pub const DEFAULT_FPS: f32 = 30.0;

/// Chunk 头：id、size、version
pub const CHUNK_HEADER_SIZE: u32 = 12;

/// Action 头中不计入 declaredSize 的部分：reserved、size、version
pub const ACTION_HEADER_SIZE: u32 = 12;

/// Action 头中计入 declaredSize 的部分：animVersion、animFlags、targets、frames
pub const ACTION_INFO_SIZE: u32 = 16;

/// 单个 Frame 的固定大小
pub const FRAME_SIZE: u32 = 20;

/// Action 头中的保留字段，总是 1
pub const ACTION_RESERVED: u32 = 1;

/// DMA 运行时配置（扁平化，不嵌套）
#[derive(Debug, Clone, PartialEq)]
pub struct DmaConfig {
    /// 帧率，导入时秒 × fps 得到帧号，导出时帧号 / fps 得到秒
    pub fps: f32,
    /// 导出时写入 Chunk 头的版本
    pub chunk_version: u32,
    /// 导出时写入 Action 的动画版本
    pub anim_version: u32,
    /// 导出时写入 Action 的标志位
    pub anim_flags: u32,
    /// 最后一个 Frame 的 nextFrame 是否写 0（旧版导出器的行为）
    pub legacy_zero_terminated_links: bool,
    /// 是否保留未知 Chunk 的原始字节
    pub keep_unknown_chunks: bool,
}

impl Default for DmaConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            chunk_version: DEFAULT_CHUNK_VERSION,
            anim_version: DMA_ANIM_VERSION,
            anim_flags: 0,
            legacy_zero_terminated_links: true,
            keep_unknown_chunks: false,
        }
    }
}

impl DmaConfig {
    /// 读取文件时使用的选项
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            keep_unknown_chunks: self.keep_unknown_chunks,
        }
    }
}

/// 全局配置实例
static DMA_CONFIG: Lazy<RwLock<DmaConfig>> = Lazy::new(|| RwLock::new(DmaConfig::default()));

/// 获取当前配置（只读）
pub fn get_config() -> DmaConfig {
    DMA_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// 手动设置配置
pub fn set_config(config: DmaConfig) {
    *DMA_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = config;
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(DmaConfig::default());
}
