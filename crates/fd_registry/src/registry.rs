// crates/fd_registry/src/registry.rs

//! 视图成员表与查询接口
//!
//! 纯查表，无副作用。字段在其声明视图之外被引用时返回
//! 配置错误（属编程错误，应在测试期暴露）。
//!
//! 字段顺序与强制性沿用原始仪表盘的约定：
//!
//! | 视图 | 字段（按序） | 强制字段 |
//! |------|-------------|----------|
//! | profile | p par t s chla_adj bbp fdom o2_c | p t s chla_adj |
//! | timeseries | profile_id dt mld t s chla_adj bbp fdom o2_c | profile_id dt mld t s chla_adj |
//! | contour | par t s chla_adj bbp fdom o2_c | t chla_adj |

use crate::descriptor::{FieldDescriptor, PressureGrid};
use crate::field::{FieldId, ViewKind};
use fd_foundation::error::{FdError, FdResult};

// ============================================================
// 视图成员表
// ============================================================

/// 剖面快照视图字段（按输出顺序）
pub static PROFILE_FIELDS: &[FieldId] = &[
    FieldId::P,
    FieldId::Par,
    FieldId::T,
    FieldId::S,
    FieldId::ChlaAdj,
    FieldId::Bbp,
    FieldId::Fdom,
    FieldId::O2C,
];

/// 剖面快照视图的强制字段
pub static PROFILE_FIELDS_MANDATORY: &[FieldId] =
    &[FieldId::P, FieldId::T, FieldId::S, FieldId::ChlaAdj];

/// 时序视图字段（按输出顺序）
pub static TIMESERIES_FIELDS: &[FieldId] = &[
    FieldId::ProfileId,
    FieldId::Dt,
    FieldId::Mld,
    FieldId::T,
    FieldId::S,
    FieldId::ChlaAdj,
    FieldId::Bbp,
    FieldId::Fdom,
    FieldId::O2C,
];

/// 时序视图的强制字段
pub static TIMESERIES_FIELDS_MANDATORY: &[FieldId] = &[
    FieldId::ProfileId,
    FieldId::Dt,
    FieldId::Mld,
    FieldId::T,
    FieldId::S,
    FieldId::ChlaAdj,
];

/// 等值图视图字段（按输出顺序）
pub static CONTOUR_FIELDS: &[FieldId] = &[
    FieldId::Par,
    FieldId::T,
    FieldId::S,
    FieldId::ChlaAdj,
    FieldId::Bbp,
    FieldId::Fdom,
    FieldId::O2C,
];

/// 等值图视图的强制字段
pub static CONTOUR_FIELDS_MANDATORY: &[FieldId] = &[FieldId::T, FieldId::ChlaAdj];

// ============================================================
// 描述符表
// ============================================================

/// 浅层网格 (PAR)：光学观测只到 250 dBar
const GRID_SHALLOW: PressureGrid = PressureGrid {
    min: 0.0,
    max: 250.0,
    step: 2.0,
};

/// 深层网格：其余等值图字段
const GRID_DEEP: PressureGrid = PressureGrid {
    min: 0.0,
    max: 1000.0,
    step: 2.0,
};

static DESCRIPTORS: &[FieldDescriptor] = &[
    FieldDescriptor {
        id: FieldId::ProfileId,
        name: "Profile",
        label: "Profile",
        colorscale: None,
        reverse_scale: false,
        precision: 0,
        grid: None,
    },
    FieldDescriptor {
        id: FieldId::Dt,
        name: "Date",
        label: "Date",
        colorscale: None,
        reverse_scale: false,
        precision: 0,
        grid: None,
    },
    FieldDescriptor {
        id: FieldId::Mld,
        name: "MLD",
        label: "MLD (dBar)",
        colorscale: None,
        reverse_scale: false,
        precision: 2,
        grid: None,
    },
    FieldDescriptor {
        id: FieldId::P,
        name: "Pressure",
        label: "Pressure (dBar)",
        colorscale: None,
        reverse_scale: false,
        precision: 2,
        grid: None,
    },
    FieldDescriptor {
        id: FieldId::Par,
        name: "PAR",
        label: "PAR (umol photons m<sup>-2</sup> s<sup>-1</sup>)",
        colorscale: Some("YIGnBu"),
        reverse_scale: false,
        precision: 2,
        grid: Some(GRID_SHALLOW),
    },
    FieldDescriptor {
        id: FieldId::T,
        name: "Temperature",
        label: "Temperature (&deg;C)",
        colorscale: Some("RdBu"),
        reverse_scale: false,
        precision: 2,
        grid: Some(GRID_DEEP),
    },
    FieldDescriptor {
        id: FieldId::S,
        name: "Salinity",
        label: "Salinity (ppt)",
        colorscale: Some("YIGnBu"),
        reverse_scale: false,
        precision: 4,
        grid: Some(GRID_DEEP),
    },
    FieldDescriptor {
        id: FieldId::ChlaAdj,
        name: "Chlorophyll a",
        label: "Chlorophyll <i>a</i> (mg m<sup>-3</sup>)",
        colorscale: Some("Greens"),
        reverse_scale: true,
        precision: 3,
        grid: Some(GRID_DEEP),
    },
    FieldDescriptor {
        id: FieldId::Bbp,
        name: "bbp",
        label: "b<sub>bp</sub>(700) (m<sup>-1</sup>)",
        colorscale: Some("Jet"),
        reverse_scale: false,
        precision: 5,
        grid: Some(GRID_DEEP),
    },
    FieldDescriptor {
        id: FieldId::Fdom,
        name: "FDOM",
        label: "FDOM (mg m<sup>-3</sup>)",
        colorscale: Some("Portland"),
        reverse_scale: false,
        precision: 3,
        grid: Some(GRID_DEEP),
    },
    FieldDescriptor {
        id: FieldId::O2C,
        name: "O2",
        label: "O<sub>2</sub> (mg m<sup>-3</sup>)",
        colorscale: Some("YIGnBu"),
        reverse_scale: false,
        precision: 2,
        grid: Some(GRID_DEEP),
    },
];

// ============================================================
// 查询接口
// ============================================================

/// 视图的字段列表（有序）
pub fn fields_for_view(view: ViewKind) -> &'static [FieldId] {
    match view {
        ViewKind::Profile => PROFILE_FIELDS,
        ViewKind::Timeseries => TIMESERIES_FIELDS,
        ViewKind::Contour => CONTOUR_FIELDS,
    }
}

/// 视图的强制字段集合
pub fn mandatory_fields(view: ViewKind) -> &'static [FieldId] {
    match view {
        ViewKind::Profile => PROFILE_FIELDS_MANDATORY,
        ViewKind::Timeseries => TIMESERIES_FIELDS_MANDATORY,
        ViewKind::Contour => CONTOUR_FIELDS_MANDATORY,
    }
}

/// 字段在该视图中是否强制
pub fn is_mandatory(view: ViewKind, field: FieldId) -> bool {
    mandatory_fields(view).contains(&field)
}

/// 字段描述符查询
///
/// 字段不属于该视图的声明集合时返回 [`FdError::Config`]。
pub fn describe(view: ViewKind, field: FieldId) -> FdResult<&'static FieldDescriptor> {
    if !fields_for_view(view).contains(&field) {
        return Err(FdError::config(format!(
            "字段 {field} 未在 {view} 视图中注册"
        )));
    }
    DESCRIPTORS
        .iter()
        .find(|d| d.id == field)
        .ok_or_else(|| FdError::config(format!("字段 {field} 缺少描述符")))
}
