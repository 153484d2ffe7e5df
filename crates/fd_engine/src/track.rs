// crates/fd_engine/src/track.rs

//! 地理轨迹构建
//!
//! 维护每个浮标的 GeoJSON 轨迹文档：一个 Point 要素给出最新
//! 位置，一个 LineString 要素给出完整位置历史。几何类型在
//! 本 crate 内以 serde 建模，序列化形状即标准 GeoJSON。
//!
//! # 文档结构不变量
//!
//! 给定用户标识，输出文档恒含恰好一个 Point 要素，
//! 以及至多一个 LineString 要素（首条位置时没有）。

use crate::message::ProfileMessage;
use chrono::{DateTime, Utc};
use fd_foundation::gap::round_to;
use serde::{Deserialize, Serialize};

/// 轨迹坐标的显示精度（小数位数）
const TRACK_PRECISION: u32 = 3;

/// 经纬度位置，`[lon, lat]` 顺序（GeoJSON 约定）
pub type Position = [f64; 2];

/// GeoJSON 几何体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// 单点
    Point(Position),
    /// 折线
    LineString(Vec<Position>),
}

/// 要素属性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackProperties {
    /// 浮标用户标识
    pub usr_id: String,
    /// 剖面编号（仅 Point 要素携带）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<u32>,
    /// 观测时刻（仅 Point 要素携带）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<DateTime<Utc>>,
}

/// GeoJSON 要素
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    /// 几何体
    pub geometry: Geometry,
    /// 属性
    pub properties: TrackProperties,
}

/// 轨迹文档（GeoJSON FeatureCollection）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct TrackDoc {
    /// 要素列表
    pub features: Vec<Feature>,
}

impl TrackDoc {
    /// 指定用户的既有位置历史
    ///
    /// 优先读取 LineString 的坐标序列；没有 LineString 时回退到
    /// Point 的单点坐标作为单元素历史。
    fn history_for(&self, usr_id: &str) -> Vec<Position> {
        for feature in &self.features {
            if feature.properties.usr_id != usr_id {
                continue;
            }
            if let Geometry::LineString(coords) = &feature.geometry {
                return coords.clone();
            }
        }
        for feature in &self.features {
            if feature.properties.usr_id != usr_id {
                continue;
            }
            if let Geometry::Point(pos) = &feature.geometry {
                return vec![*pos];
            }
        }
        Vec::new()
    }

    /// 指定用户的 Point 要素数
    pub fn point_count(&self, usr_id: &str) -> usize {
        self.features
            .iter()
            .filter(|f| {
                f.properties.usr_id == usr_id && matches!(f.geometry, Geometry::Point(_))
            })
            .count()
    }

    /// 指定用户的 LineString 要素
    pub fn line(&self, usr_id: &str) -> Option<&Vec<Position>> {
        self.features.iter().find_map(|f| {
            if f.properties.usr_id != usr_id {
                return None;
            }
            match &f.geometry {
                Geometry::LineString(coords) => Some(coords),
                _ => None,
            }
        })
    }
}

/// 在轨迹文档上追加当前位置
///
/// 总是发出新的 Point 要素标记最新位置；存在既有历史时，
/// 追加当前位置并发出覆盖完整历史的 LineString 要素。
pub fn append_position(
    prev: Option<TrackDoc>,
    msg: &ProfileMessage,
    usr_id: &str,
) -> TrackDoc {
    let mut history = prev
        .map(|doc| doc.history_for(usr_id))
        .unwrap_or_default();

    let pos: Position = [
        round_to(msg.lon, TRACK_PRECISION),
        round_to(msg.lat, TRACK_PRECISION),
    ];

    let last_position = Feature {
        geometry: Geometry::Point(pos),
        properties: TrackProperties {
            usr_id: usr_id.to_string(),
            msg_id: Some(msg.profile_id),
            dt: Some(msg.dt),
        },
    };

    if history.is_empty() {
        return TrackDoc {
            features: vec![last_position],
        };
    }

    history.push(pos);
    let all_positions = Feature {
        geometry: Geometry::LineString(history),
        properties: TrackProperties {
            usr_id: usr_id.to_string(),
            msg_id: None,
            dt: None,
        },
    };
    TrackDoc {
        features: vec![last_position, all_positions],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_message, sample_message_at};

    #[test]
    fn test_first_position_point_only() {
        let doc = append_position(None, &sample_message(), "n0572");
        assert_eq!(doc.features.len(), 1);
        assert_eq!(doc.point_count("n0572"), 1);
        assert!(doc.line("n0572").is_none());

        let Geometry::Point(pos) = &doc.features[0].geometry else {
            panic!("expected point");
        };
        assert_eq!(*pos, [-122.2, 36.7]);
        assert_eq!(doc.features[0].properties.msg_id, Some(0));
    }

    #[test]
    fn test_second_position_adds_linestring() {
        let doc = append_position(None, &sample_message_at(0), "n0572");
        let doc = append_position(Some(doc), &sample_message_at(1), "n0572");

        assert_eq!(doc.features.len(), 2);
        assert_eq!(doc.point_count("n0572"), 1);
        let line = doc.line("n0572").unwrap();
        assert_eq!(line.len(), 2);
        // 历史按时间顺序，末元素为当前位置
        assert_eq!(line[0], [-122.2, 36.7]);
        assert_eq!(line[1], [-122.1, 36.8]);
    }

    #[test]
    fn test_history_accumulates() {
        let mut doc = None;
        for i in 0..4 {
            doc = Some(append_position(doc, &sample_message_at(i), "n0572"));
        }
        let doc = doc.unwrap();
        assert_eq!(doc.point_count("n0572"), 1);
        assert_eq!(doc.line("n0572").unwrap().len(), 4);
    }

    #[test]
    fn test_fallback_from_point_only_document() {
        // 上一版只有 Point（无 LineString）→ 单点历史
        let prev = TrackDoc {
            features: vec![Feature {
                geometry: Geometry::Point([-121.0, 35.0]),
                properties: TrackProperties {
                    usr_id: "n0572".into(),
                    msg_id: Some(0),
                    dt: None,
                },
            }],
        };
        let doc = append_position(Some(prev), &sample_message_at(1), "n0572");
        let line = doc.line("n0572").unwrap();
        assert_eq!(line.len(), 2);
        assert_eq!(line[0], [-121.0, 35.0]);
    }

    #[test]
    fn test_foreign_features_ignored() {
        let prev = TrackDoc {
            features: vec![Feature {
                geometry: Geometry::LineString(vec![[0.0, 0.0], [1.0, 1.0]]),
                properties: TrackProperties {
                    usr_id: "other".into(),
                    msg_id: None,
                    dt: None,
                },
            }],
        };
        let doc = append_position(Some(prev), &sample_message(), "n0572");
        // 其他浮标的历史不并入
        assert_eq!(doc.features.len(), 1);
        assert!(doc.line("n0572").is_none());
    }

    #[test]
    fn test_coordinates_rounded() {
        let mut msg = sample_message();
        msg.lon = -122.123456;
        msg.lat = 36.987654;
        let doc = append_position(None, &msg, "n0572");
        let Geometry::Point(pos) = &doc.features[0].geometry else {
            panic!("expected point");
        };
        assert_eq!(*pos, [-122.123, 36.988]);
    }

    #[test]
    fn test_geojson_shape() {
        let doc = append_position(None, &sample_message(), "n0572");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
        assert!(json["features"][0]["geometry"]["coordinates"].is_array());
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = append_position(None, &sample_message_at(0), "n0572");
        let doc = append_position(Some(doc), &sample_message_at(1), "n0572");
        let json = serde_json::to_string(&doc).unwrap();
        let back: TrackDoc = serde_json::from_str(&json).unwrap();
        assert_eq!(back.point_count("n0572"), 1);
        assert_eq!(back.line("n0572").unwrap().len(), 2);
    }
}
