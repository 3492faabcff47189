//! 形态键关键帧与曲线

/// 关键帧之间的插值方式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// DMA 只存储线性段
    #[default]
    Linear,
}

/// Morph 关键帧
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MorphKeyframe {
    /// 帧号（秒 × fps）
    pub frame: f32,
    /// 形态键权重
    pub value: f32,
    pub interpolation: Interpolation,
}

impl MorphKeyframe {
    pub fn new(frame: f32, value: f32) -> Self {
        Self {
            frame,
            value,
            interpolation: Interpolation::Linear,
        }
    }
}

/// 单个形态键通道的关键帧曲线，按帧号升序
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MorphCurve {
    pub name: String,
    pub keyframes: Vec<MorphKeyframe>,
}

impl MorphCurve {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keyframes: Vec::new(),
        }
    }

    /// 从 (帧号, 权重) 列表创建
    pub fn from_points(name: impl Into<String>, points: &[(f32, f32)]) -> Self {
        Self {
            name: name.into(),
            keyframes: points
                .iter()
                .map(|&(frame, value)| MorphKeyframe::new(frame, value))
                .collect(),
        }
    }

    /// 插入关键帧，保持升序；帧号相同则覆盖
    pub fn insert_keyframe(&mut self, keyframe: MorphKeyframe) {
        match self
            .keyframes
            .binary_search_by(|k| k.frame.total_cmp(&keyframe.frame))
        {
            Ok(i) => self.keyframes[i] = keyframe,
            Err(i) => self.keyframes.insert(i, keyframe),
        }
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// 最后一个关键帧的帧号
    pub fn end_frame(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.frame)
    }

    /// 求值指定帧，区间外取端点值
    pub fn evaluate(&self, frame: f32) -> f32 {
        let upper = self.keyframes.partition_point(|k| k.frame <= frame);
        match (upper.checked_sub(1).map(|i| &self.keyframes[i]), self.keyframes.get(upper)) {
            (Some(prev), Some(next)) => {
                let interval = next.frame - prev.frame;
                let coef = if interval > 0.0 {
                    (frame - prev.frame) / interval
                } else {
                    0.0
                };
                prev.value + (next.value - prev.value) * coef
            }
            (Some(prev), None) => prev.value,
            (None, Some(next)) => next.value,
            (None, None) => 0.0,
        }
    }
}
