//! 形态键动画的导入与导出
//!
//! 一个 Action 的 Target 与网格的形态键（不含 Basis）一一对应。

use std::path::Path;

use super::curve::{action_from_curves, curves_from_action, LinkPolicy};
use super::keyframe::MorphCurve;
use crate::config::{self, DmaConfig, DMA_ANIM_VERSION};
use crate::format::{DmaAction, DmaFile};
use crate::{DmaError, Result};

/// 形态键动画（运行时使用）
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeKeyAnimation {
    /// 动画名称，导入时取文件名
    pub name: String,
    /// 每个形态键一条曲线，顺序与 Target 相同
    pub curves: Vec<MorphCurve>,
    /// 动画结束帧
    pub end_frame: f32,
}

impl ShapeKeyAnimation {
    pub fn new(name: impl Into<String>, curves: Vec<MorphCurve>) -> Self {
        let end_frame = curves.iter().map(MorphCurve::end_frame).fold(0.0, f32::max);
        Self {
            name: name.into(),
            curves,
            end_frame,
        }
    }

    /// 从 DmaFile 创建
    ///
    /// 每个动画 Chunk 的 Target 数必须等于 `channel_names` 的长度；
    /// 有多个动画 Chunk 时取最后一个。没有动画 Chunk 时返回 `None`。
    pub fn from_dma_file<S: AsRef<str>>(
        dma: &DmaFile,
        name: impl Into<String>,
        channel_names: &[S],
        fps: f32,
        policy: LinkPolicy,
    ) -> Result<Option<Self>> {
        let mut last = None;
        for action in dma.actions() {
            if action.targets.len() != channel_names.len() {
                return Err(DmaError::ChannelCountMismatch {
                    expected: channel_names.len(),
                    found: action.targets.len(),
                });
            }
            last = Some(action);
        }

        Ok(last.map(|action| Self::from_action(action, name, channel_names, fps, policy)))
    }

    fn from_action<S: AsRef<str>>(
        action: &DmaAction,
        name: impl Into<String>,
        channel_names: &[S],
        fps: f32,
        policy: LinkPolicy,
    ) -> Self {
        let mut curves = curves_from_action(action, fps, policy);
        for (curve, channel) in curves.iter_mut().zip(channel_names) {
            curve.name = channel.as_ref().to_string();
        }

        // 场景帧范围取最后一个 Target 的累计时长
        let end_frame = action.targets.last().map_or(0.0, |t| t.duration() * fps);

        Self {
            name: name.into(),
            curves,
            end_frame,
        }
    }

    /// 从文件路径加载
    pub fn from_file<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        channel_names: &[S],
        fps: f32,
        policy: LinkPolicy,
    ) -> Result<Option<Self>> {
        let path = path.as_ref();
        let dma = DmaFile::load(path)?;
        Self::from_dma_file(&dma, file_name(path), channel_names, fps, policy)
    }

    /// 使用全局配置导入
    pub fn import<P: AsRef<Path>, S: AsRef<str>>(path: P, channel_names: &[S]) -> Result<Option<Self>> {
        Self::import_with_config(path, channel_names, &config::get_config())
    }

    /// 使用指定配置导入，fps、nextFrame 写法与未知 Chunk 处理均取自 `config`
    pub fn import_with_config<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        channel_names: &[S],
        config: &DmaConfig,
    ) -> Result<Option<Self>> {
        let path = path.as_ref();
        let dma = DmaFile::load_with_config(path, config)?;
        let policy = LinkPolicy::from_legacy_flag(config.legacy_zero_terminated_links);
        Self::from_dma_file(&dma, file_name(path), channel_names, config.fps, policy)
    }

    /// 编码为 Action，每条曲线一个 Target
    pub fn to_action(
        &self,
        fps: f32,
        anim_version: u32,
        anim_flags: u32,
        policy: LinkPolicy,
    ) -> Result<DmaAction> {
        action_from_curves(&self.curves, fps, anim_version, anim_flags, policy)
    }

    /// 编码为只含一个动画 Chunk 的 DmaFile
    pub fn to_dma_file(&self, chunk_version: u32, fps: f32, policy: LinkPolicy) -> Result<DmaFile> {
        let action = self.to_action(fps, DMA_ANIM_VERSION, 0, policy)?;
        Ok(DmaFile::from_action(chunk_version, action))
    }

    /// 保存到文件
    pub fn to_file<P: AsRef<Path>>(
        &self,
        path: P,
        chunk_version: u32,
        fps: f32,
        policy: LinkPolicy,
    ) -> Result<()> {
        self.to_dma_file(chunk_version, fps, policy)?.save(path)
    }

    /// 使用全局配置导出
    pub fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = config::get_config();
        let policy = LinkPolicy::from_legacy_flag(config.legacy_zero_terminated_links);
        let action = self.to_action(config.fps, config.anim_version, config.anim_flags, policy)?;
        DmaFile::from_action(config.chunk_version, action).save(path)
    }

    /// 求值所有通道在指定帧的权重
    pub fn evaluate(&self, frame: f32) -> Vec<f32> {
        self.curves.iter().map(|c| c.evaluate(frame)).collect()
    }
}

/// 动画名称取文件名
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
