//! # brv-codec
//!
//! 载具存档（.brv）的字典编码编解码器。
//!
//! 积木的属性不逐条平铺，而是按属性名分列、列内驻留不同取值，
//! 每块积木只记录 (属性索引, 值索引) 对。
//!
//! ## 整体架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       Vehicle                            │
//! │   version + [Brick]  ── serialize / deserialize          │
//! │           │                            ▲                 │
//! │     VehicleWriter                 VehicleReader          │
//! │     (encoder.rs)                  (decoder.rs)           │
//! │   ┌───────┴─────────┐          ┌───────┴──────────┐      │
//! │   │ RefIndex        │          │ KindCatalog      │      │
//! │   │  标识 → 序号     │          │  名字 → 种类      │      │
//! │   │ AttributeColumn │          │ AttributeTable   │      │
//! │   │  字节驻留 + 页脚  │          │  页脚 → 值边界    │      │
//! │   └───────┬─────────┘          └───────┬──────────┘      │
//! │           └──────────┬─────────────────┘                 │
//! │                CodecRegistry                             │
//! │        属性名 → PropertyCodec（trait 对象）               │
//! │   Bool / Enum / Float32 / UInt24 / Text / Ref / Vec3 …   │
//! │   VersionGated<C> → Encoded::VersionGate                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! 注册表在进程启动时构建一次，之后以只读引用传入每次调用；
//! 其余工作状态（字典、引用索引）都是调用内局部的，互不共享。

// ── 数据模型 ──────────────────────────────────────────────────────────────────
pub mod common;
pub mod value;
pub mod kind;
pub mod brick;
pub mod vehicle;

// ── 编解码 ────────────────────────────────────────────────────────────────────
pub mod wire;
pub mod index;
pub mod codec;
pub mod property;
pub mod registry;
pub mod atlas;
pub mod encoder;
pub mod decoder;

pub use brick::Brick;
pub use codec::{Encoded, PropertyCodec};
pub use common::{BrvError, FormatVersion, Result};
pub use decoder::{read_header, Header};
pub use index::RefIndex;
pub use kind::{BrickKind, Catalog, KindCatalog};
pub use registry::CodecRegistry;
pub use value::{Value, Vec3};
pub use vehicle::Vehicle;
