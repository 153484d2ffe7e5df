// crates/fd_registry/src/lib.rs

//! FloatDash 字段注册表
//!
//! 静态配置层：每个物理变量到其聚合角色的映射
//! （视图成员关系、强制性、显示精度、等值图网格）。
//!
//! 原始实现用松散类型的字符串字典承载这份配置；这里收口为
//! 以有限 [`FieldId`] 枚举为键的封闭描述符表，字段拼写错误
//! 与越界引用在编译期或查表时即可捕获。
//!
//! # 示例
//!
//! ```
//! use fd_registry::{describe, fields_for_view, FieldId, ViewKind};
//!
//! let desc = describe(ViewKind::Contour, FieldId::ChlaAdj).unwrap();
//! assert!(desc.reverse_scale);
//! assert_eq!(fields_for_view(ViewKind::Profile).len(), 8);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod descriptor;
pub mod field;
pub mod registry;

pub use descriptor::{FieldDescriptor, PressureGrid};
pub use field::{FieldId, ViewKind};
pub use registry::{
    describe, fields_for_view, is_mandatory, mandatory_fields, CONTOUR_FIELDS,
    CONTOUR_FIELDS_MANDATORY, PROFILE_FIELDS, PROFILE_FIELDS_MANDATORY, TIMESERIES_FIELDS,
    TIMESERIES_FIELDS_MANDATORY,
};
