//! 全局基础类型、格式常量与错误定义

use thiserror::Error;

// ── 格式版本 ──────────────────────────────────────────────────────────────────

/// 格式版本号（文件首字节）
pub type FormatVersion = u8;

/// 实验分支版本
pub const FILE_EXP_VERSION:    FormatVersion = 16;
/// 正式分支版本
pub const FILE_MAIN_VERSION:   FormatVersion = 15;
/// 旧版格式；部分属性（如 BrickColor）在此版本及以下不可表示
pub const FILE_LEGACY_VERSION: FormatVersion = 6;

// ── 容量上限 ──────────────────────────────────────────────────────────────────

/// 单个载具最多容纳的积木数（u16 计数，0xFFFF 保留）
pub const MAX_BRICKS: usize = 65_534;
/// 单条积木记录中的属性对数（u8 计数）
pub const MAX_PROPERTIES_PER_BRICK: usize = u8::MAX as usize;
/// 单个属性的不同取值数（u16 计数）
pub const MAX_VALUES_PER_ATTRIBUTE: usize = u16::MAX as usize;

// ── 错误 ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum BrvError {
    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("unknown brick reference: {0:?}")]
    UnknownReference(String),
    #[error("duplicate brick reference: {0:?}")]
    DuplicateReference(String),
    #[error("unhashable value: brick #{brick} attribute {attribute}")]
    UnhashableValue { brick: usize, attribute: String },
    #[error("capacity exceeded: {what} (limit {limit}, got {actual})")]
    CapacityExceeded { what: &'static str, limit: usize, actual: usize },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: &'static str },
    #[error("attribute {0}: codec produced an empty value")]
    EmptyValue(String),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("truncated stream at offset {offset}")]
    Truncated { offset: usize },
    #[error("malformed stream: {0}")]
    Malformed(String),
    #[error("property {property} does not exist on brick kind {kind}")]
    UnknownProperty { kind: String, property: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BrvError>;
