//! 字典编码器：积木序列 → 载具字节流
//!
//! 文件格式（所有多字节整数均为小端）：
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ HEADER                                       │
//! │   version         (u8)                       │
//! │   brick_count     (u16) ≤ 65534              │
//! │   kind_count      (u16)                      │
//! │   attribute_count (u16)                      │
//! ├──────────────────────────────────────────────┤
//! │ KIND TABLE   name_len (u8) + name × kinds    │
//! ├──────────────────────────────────────────────┤
//! │ ATLAS        AttributeColumn × attributes    │ ← 见 atlas.rs
//! ├──────────────────────────────────────────────┤
//! │ BRICKS (× brick_count)                       │
//! │   kind_index (u16)                           │
//! │   body_len   (u32)                           │
//! │   body:                                      │
//! │     pair_count (u8)                          │
//! │     (attr_index u16, value_index u16) × n    │
//! │     pos x, y, z            (f32 × 3)         │
//! │     rot yaw, roll, pitch   (f32 × 3)         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! 种类与属性都按首次出现顺序编号，从不排序。

use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::atlas::AttributeColumn;
use crate::brick::Brick;
use crate::codec::Encoded;
use crate::common::{
    BrvError, FormatVersion, Result, MAX_BRICKS, MAX_PROPERTIES_PER_BRICK,
};
use crate::index::RefIndex;
use crate::kind::BrickKind;
use crate::registry::CodecRegistry;
use crate::value::{Value, Vec3};
use crate::wire::{write_f32, write_name, write_u16, write_u32};

/// 一块积木在字典中用到的 (属性索引, 值索引)
type PropertyPairs = Vec<(u16, u16)>;

pub struct VehicleWriter<'a> {
    version:  FormatVersion,
    registry: &'a CodecRegistry,
    /// 种类按 `Arc` 身份去重
    kinds:    IndexMap<*const BrickKind, &'a Arc<BrickKind>>,
    columns:  IndexMap<&'a str, AttributeColumn>,
    bricks:   Vec<(u16, PropertyPairs, &'a Brick)>,
}

impl<'a> VehicleWriter<'a> {
    pub fn new(version: FormatVersion, registry: &'a CodecRegistry) -> Self {
        Self {
            version, registry,
            kinds: IndexMap::new(), columns: IndexMap::new(), bricks: Vec::new(),
        }
    }

    /// 编码整组积木；积木数先于一切检查
    pub fn encode(
        version:  FormatVersion,
        bricks:   &'a [Brick],
        registry: &'a CodecRegistry,
    ) -> Result<Vec<u8>> {
        if bricks.len() > MAX_BRICKS {
            return Err(BrvError::CapacityExceeded {
                what: "bricks", limit: MAX_BRICKS, actual: bricks.len(),
            });
        }
        let refs = RefIndex::build(bricks)?;

        let mut writer = Self::new(version, registry);
        for brick in bricks {
            writer.append_brick(brick, &refs)?;
        }
        writer.finalize()
    }

    /// 登记一块积木：记录种类、驻留补丁中每个属性的编码值
    pub fn append_brick(&mut self, brick: &'a Brick, refs: &RefIndex) -> Result<()> {
        let pos = self.bricks.len();
        if pos >= MAX_BRICKS {
            return Err(BrvError::CapacityExceeded {
                what: "bricks", limit: MAX_BRICKS, actual: pos + 1,
            });
        }

        let kind_entry = self.kinds.entry(Arc::as_ptr(brick.kind()));
        let kind_idx   = kind_entry.index() as u16;
        kind_entry.or_insert(brick.kind());

        let mut pairs = PropertyPairs::new();
        for (key, value) in &brick.patch {
            if value.is_null() {
                continue;
            }
            if let Value::List(_) = value {
                return Err(BrvError::UnhashableValue { brick: pos, attribute: key.clone() });
            }

            let codec = self.registry.require(key)?;
            let bytes = match codec.encode(value, self.version, refs)? {
                Encoded::Bytes(b)    => b,
                Encoded::VersionGate => {
                    // 尚无取值的属性不建列，等价于整列清除
                    log::trace!(
                        "brick #{pos}: {key} not representable at version {}{}",
                        self.version,
                        if self.columns.contains_key(key.as_str()) { "" } else { " (no column)" },
                    );
                    continue;
                }
            };

            let (attr_idx, column) = match self.columns.entry(key.as_str()) {
                Entry::Occupied(e) => (e.index(), e.into_mut()),
                Entry::Vacant(e)   => (e.index(), e.insert(AttributeColumn::new(key))),
            };
            if attr_idx >= u16::MAX as usize {
                return Err(BrvError::CapacityExceeded {
                    what: "attributes", limit: u16::MAX as usize, actual: attr_idx + 1,
                });
            }
            let value_idx = column.intern(bytes)?;
            pairs.push((attr_idx as u16, value_idx));
        }

        if pairs.len() > MAX_PROPERTIES_PER_BRICK {
            return Err(BrvError::CapacityExceeded {
                what: "properties per brick", limit: MAX_PROPERTIES_PER_BRICK, actual: pairs.len(),
            });
        }
        self.bricks.push((kind_idx, pairs, brick));
        Ok(())
    }

    /// 输出完整字节流
    pub fn finalize(self) -> Result<Vec<u8>> {
        log::debug!(
            "encoding vehicle v{}: {} bricks, {} kinds, {} attributes",
            self.version, self.bricks.len(), self.kinds.len(), self.columns.len(),
        );

        // ── HEADER ────────────────────────────────────────────────────────────
        let mut out = vec![self.version];
        write_u16(&mut out, self.bricks.len() as u16)?;
        write_u16(&mut out, self.kinds.len() as u16)?;
        write_u16(&mut out, self.columns.len() as u16)?;

        // ── KIND TABLE / ATLAS ────────────────────────────────────────────────
        for kind in self.kinds.values() {
            write_name(&mut out, kind.name())?;
        }
        for column in self.columns.values() {
            column.write(&mut out)?;
        }

        // ── BRICKS ────────────────────────────────────────────────────────────
        for (kind_idx, pairs, brick) in &self.bricks {
            let body = brick_body(pairs, brick.pos, brick.rot)?;
            write_u16(&mut out, *kind_idx)?;
            write_u32(&mut out, body.len() as u32)?;
            out.extend_from_slice(&body);
        }
        Ok(out)
    }
}

/// 积木记录体；旋转按 yaw (y)、roll (z)、pitch (x) 顺序写出
fn brick_body(pairs: &[(u16, u16)], pos: Vec3, rot: Vec3) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(1 + pairs.len() * 4 + 24);
    body.push(pairs.len() as u8);
    for &(attr, value) in pairs {
        write_u16(&mut body, attr)?;
        write_u16(&mut body, value)?;
    }
    for f in [pos.x, pos.y, pos.z, rot.y, rot.z, rot.x] {
        write_f32(&mut body, f)?;
    }
    Ok(body)
}
