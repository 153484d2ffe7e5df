// floatdash\crates\fd_foundation\src/gap.rs

//! 缺测值（gap value）处理
//!
//! 剖面观测中"已测量但无效"的样本以缺测哨兵值表示，与
//! "本次未测量"（字段整体缺失）严格区分。
//!
//! # 表示约定
//!
//! - 内存中：`f64::NAN`（非有限值一律视为缺测）
//! - JSON 中：`null`，序列内部的缺测值不得被省略，
//!   以保证文档内各序列长度互相一致
//!
//! # 示例
//!
//! ```
//! use fd_foundation::gap::{GAP, GapSeries, is_gap, round_to};
//!
//! let series = GapSeries::from(vec![1.0, GAP, 3.0]);
//! assert!(is_gap(series[1]));
//! assert_eq!(round_to(19.7512, 2), 19.75);
//! ```

use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut, Index};

/// 缺测哨兵值
pub const GAP: f64 = f64::NAN;

/// 判断是否为缺测值
///
/// NaN 与无穷值均视为缺测（上游解码器可能产出越界的哨兵值）。
#[inline]
pub fn is_gap(value: f64) -> bool {
    !value.is_finite()
}

/// 按显示精度做十进制舍入（四舍五入，远离零）
///
/// 缺测值原样透传。持久化文档中的数值在追加时即按注册表精度
/// 舍入，保证任何序列化器产出的文档可逐字节复现。
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if is_gap(value) {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// ============================================================
// GapSeries - 可含缺测值的数值序列
// ============================================================

/// 可含缺测值的数值序列
///
/// `Vec<f64>` 的透明包装，序列化时把缺测值写为 JSON `null`，
/// 反序列化时把 `null` 还原为 [`GAP`]。所有持久化文档中的
/// 数值序列均使用本类型。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapSeries(pub Vec<f64>);

impl GapSeries {
    /// 创建空序列
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 创建指定长度的全缺测序列
    pub fn gaps(len: usize) -> Self {
        Self(vec![GAP; len])
    }

    /// 追加一个值
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.0.push(value);
    }

    /// 内部向量
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// 非缺测样本数
    pub fn valid_count(&self) -> usize {
        self.0.iter().filter(|v| !is_gap(**v)).count()
    }
}

impl From<Vec<f64>> for GapSeries {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl Deref for GapSeries {
    type Target = Vec<f64>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for GapSeries {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Index<usize> for GapSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl Serialize for GapSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for &value in &self.0 {
            if is_gap(value) {
                seq.serialize_element(&Option::<f64>::None)?;
            } else {
                seq.serialize_element(&Some(value))?;
            }
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for GapSeries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GapSeriesVisitor;

        impl<'de> Visitor<'de> for GapSeriesVisitor {
            type Value = GapSeries;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("数值或 null 组成的序列")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(value) = seq.next_element::<Option<f64>>()? {
                    values.push(value.unwrap_or(GAP));
                }
                Ok(GapSeries(values))
            }
        }

        deserializer.deserialize_seq(GapSeriesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_gap() {
        assert!(is_gap(GAP));
        assert!(is_gap(f64::INFINITY));
        assert!(!is_gap(0.0));
        assert!(!is_gap(-12.5));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(19.7512, 2), 19.75);
        assert_eq!(round_to(0.123456, 5), 0.12346);
        // 半值远离零舍入
        assert_eq!(round_to(1.25, 1), 1.3);
        assert_eq!(round_to(-1.25, 1), -1.3);
        assert!(round_to(GAP, 3).is_nan());
    }

    #[test]
    fn test_gap_series_serialize_null() {
        let series = GapSeries::from(vec![1.0, GAP, 3.0]);
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, "[1.0,null,3.0]");
    }

    #[test]
    fn test_gap_series_roundtrip() {
        let series = GapSeries::from(vec![1.0, GAP, 3.0]);
        let json = serde_json::to_string(&series).unwrap();
        let back: GapSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back[0], 1.0);
        assert!(back[1].is_nan());
        assert_eq!(back[2], 3.0);
    }

    #[test]
    fn test_valid_count() {
        let series = GapSeries::from(vec![1.0, GAP, 3.0, GAP]);
        assert_eq!(series.valid_count(), 2);
    }

    #[test]
    fn test_gaps_constructor() {
        let series = GapSeries::gaps(4);
        assert_eq!(series.len(), 4);
        assert_eq!(series.valid_count(), 0);
    }
}
