//! 动画系统
//!
//! 提供 DMA Frame 与形态键关键帧曲线之间的转换，以及形态键动画的导入导出。

mod curve;
mod keyframe;
mod shape_key;

pub use curve::{
    action_from_curves, curve_from_target, curves_from_action, frame_from_keyframes,
    target_from_curve, LinkPolicy,
};
pub use keyframe::{Interpolation, MorphCurve, MorphKeyframe};
pub use shape_key::ShapeKeyAnimation;
