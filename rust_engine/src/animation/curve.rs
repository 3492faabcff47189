//! Frame 序列与关键帧曲线之间的转换
//!
//! 解码：每个 Frame 在当前时间插入 `start_val`，时间前进 `duration`，
//! 最后在累计时间插入最后一个 Frame 的 `end_val`，共 `frames + 1` 个关键帧
//! （同一时刻重复插入时后者覆盖前者）。
//! 编码：相邻关键帧两两组成一个 Frame，`duration = Δframe / fps`。

use super::keyframe::{MorphCurve, MorphKeyframe};
use crate::format::{DmaAction, DmaFrame, DmaTarget};
use crate::{DmaError, Result};

/// nextFrame 字段的写法
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkPolicy {
    /// 每个 Frame 指向下一个索引
    Forward,
    /// 最后一个 Frame 写 0（旧版导出器）
    #[default]
    LegacyZeroTerminated,
}

impl LinkPolicy {
    pub fn from_legacy_flag(legacy_zero_terminated_links: bool) -> Self {
        if legacy_zero_terminated_links {
            LinkPolicy::LegacyZeroTerminated
        } else {
            LinkPolicy::Forward
        }
    }

    /// 第 `index` 个 Frame（共 `frame_count` 个）的 nextFrame
    pub fn next_frame(self, index: usize, frame_count: usize) -> u32 {
        let next = index + 1;
        match self {
            LinkPolicy::LegacyZeroTerminated if next >= frame_count => 0,
            _ => next as u32,
        }
    }
}

/// 将一个 Target 还原为关键帧曲线
pub fn curve_from_target(target: &DmaTarget, fps: f32, policy: LinkPolicy) -> MorphCurve {
    let mut curve = MorphCurve::new(String::new());
    let Some(last) = target.frames.last() else {
        return curve;
    };

    let frame_count = target.frames.len();
    let mut mismatched_links = 0usize;
    let mut current_time = 0.0f32;

    curve.keyframes.reserve(frame_count + 1);
    for (i, frame) in target.frames.iter().enumerate() {
        if frame.next_frame != policy.next_frame(i, frame_count) {
            mismatched_links += 1;
        }
        curve.insert_keyframe(MorphKeyframe::new(current_time * fps, frame.start_val));
        current_time += frame.duration;
    }
    curve.insert_keyframe(MorphKeyframe::new(current_time * fps, last.end_val));

    if mismatched_links > 0 {
        log::warn!(
            "{} / {} 个 Frame 的 nextFrame 与 {:?} 不符",
            mismatched_links,
            frame_count,
            policy
        );
    }

    curve
}

/// 将 Action 的每个 Target 还原为关键帧曲线
pub fn curves_from_action(action: &DmaAction, fps: f32, policy: LinkPolicy) -> Vec<MorphCurve> {
    action
        .targets
        .iter()
        .enumerate()
        .map(|(i, target)| {
            if target.frames.is_empty() {
                log::warn!("Target {} 没有 Frame，生成空曲线", i);
            }
            curve_from_target(target, fps, policy)
        })
        .collect()
}

/// 由相邻关键帧生成一个 Frame
///
/// 两个关键帧帧号相同时返回 `ZeroDuration`，索引相对这一对关键帧（target 0，keyframe 1）。
pub fn frame_from_keyframes(
    start: &MorphKeyframe,
    end: &MorphKeyframe,
    fps: f32,
    next_frame: u32,
) -> Result<DmaFrame> {
    let duration = (end.frame - start.frame) / fps;
    if duration == 0.0 {
        return Err(DmaError::ZeroDuration {
            target: 0,
            keyframe: 1,
            time: end.frame,
        });
    }
    Ok(DmaFrame::new(start.value, end.value, duration, next_frame))
}

/// 将一条曲线编码为 Target，关键帧按帧号排序后使用
pub fn target_from_curve(
    curve: &MorphCurve,
    target_index: usize,
    fps: f32,
    policy: LinkPolicy,
) -> Result<DmaTarget> {
    let mut keyframes = curve.keyframes.clone();
    keyframes.sort_by(|a, b| a.frame.total_cmp(&b.frame));

    let frame_count = keyframes.len().saturating_sub(1);
    let frames = keyframes
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            frame_from_keyframes(&pair[0], &pair[1], fps, policy.next_frame(i, frame_count))
                .map_err(|err| match err {
                    DmaError::ZeroDuration { time, .. } => DmaError::ZeroDuration {
                        target: target_index,
                        keyframe: i + 1,
                        time,
                    },
                    other => other,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DmaTarget::new(frames))
}

/// 将多条曲线编码为一个 Action，每条曲线一个 Target
pub fn action_from_curves(
    curves: &[MorphCurve],
    fps: f32,
    anim_version: u32,
    anim_flags: u32,
    policy: LinkPolicy,
) -> Result<DmaAction> {
    let targets = curves
        .iter()
        .enumerate()
        .map(|(i, curve)| target_from_curve(curve, i, fps, policy))
        .collect::<Result<Vec<_>>>()?;
    Ok(DmaAction::new(anim_version, anim_flags, targets))
}
