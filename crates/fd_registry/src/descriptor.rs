// crates/fd_registry/src/descriptor.rs

//! 字段描述符
//!
//! 每个字段的显示元数据与等值图网格定义。显示元数据（名称、
//! 标签、色标）对聚合引擎是不透明配置，原样透传进文档。

use crate::field::FieldId;

/// 等值图的规范压力轴
///
/// 固定边界、等步长的压力网格。所有剖面的该字段观测都被
/// 重采样到同一条轴上，保证矩阵列之间逐行可比。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureGrid {
    /// 最浅压力 (dBar)
    pub min: f64,
    /// 最深压力 (dBar)
    pub max: f64,
    /// 网格步长 (dBar)
    pub step: f64,
}

impl PressureGrid {
    /// 网格点数
    pub fn len(&self) -> usize {
        ((self.max - self.min) / self.step) as usize + 1
    }

    /// 网格是否为空
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// 展开为压力点序列
    pub fn points(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}

/// 字段描述符（注册表条目）
///
/// `colorscale` 与 `grid` 仅对等值图视图的字段有值。
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// 字段标识
    pub id: FieldId,
    /// 人类可读名称
    pub name: &'static str,
    /// 显示标签（可含 HTML 上下标）
    pub label: &'static str,
    /// 等值图色标
    pub colorscale: Option<&'static str>,
    /// 是否反转色标
    pub reverse_scale: bool,
    /// 显示精度（小数位数）
    pub precision: u32,
    /// 等值图规范压力轴
    pub grid: Option<PressureGrid>,
}
