//! 字典解码器：载具字节流 → 积木序列
//!
//! 严格按编码器的写出顺序读取（格式见 encoder.rs）。不支持部分解码：
//! 未注册的属性名、越界的种类 / 属性 / 值索引、悬空引用、截断的缓冲区
//! 都会使整次解码失败。

use std::sync::Arc;

use crate::atlas::AttributeTable;
use crate::brick::Brick;
use crate::common::{BrvError, FormatVersion, Result, MAX_BRICKS};
use crate::index::RefIndex;
use crate::kind::{BrickKind, KindCatalog};
use crate::registry::CodecRegistry;
use crate::value::Vec3;
use crate::wire::ByteReader;

// ── Header ────────────────────────────────────────────────────────────────────

/// 文件头：版本 + 三个计数，共 7 字节
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version:         FormatVersion,
    pub brick_count:     u16,
    pub kind_count:      u16,
    pub attribute_count: u16,
}

impl Header {
    pub const SIZE: usize = 7;

    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let header = Self {
            version:         r.u8()?,
            brick_count:     r.u16()?,
            kind_count:      r.u16()?,
            attribute_count: r.u16()?,
        };
        if header.brick_count as usize > MAX_BRICKS {
            return Err(BrvError::Malformed(format!(
                "brick count {} exceeds {MAX_BRICKS}", header.brick_count,
            )));
        }
        Ok(header)
    }
}

/// 只读文件头，不解析其余部分（供外层元数据容器取积木数）
pub fn read_header(data: &[u8]) -> Result<Header> {
    Header::read(&mut ByteReader::new(data))
}

// ── VehicleReader ─────────────────────────────────────────────────────────────

pub struct VehicleReader<'a> {
    registry: &'a CodecRegistry,
    catalog:  &'a dyn KindCatalog,
}

impl<'a> VehicleReader<'a> {
    pub fn new(registry: &'a CodecRegistry, catalog: &'a dyn KindCatalog) -> Self {
        Self { registry, catalog }
    }

    /// 解码整个载具，返回 (版本, 积木序列)
    pub fn decode(&self, data: &[u8]) -> Result<(FormatVersion, Vec<Brick>)> {
        let mut r  = ByteReader::new(data);
        let header = Header::read(&mut r)?;
        let version = header.version;
        log::debug!(
            "decoding vehicle v{version}: {} bricks, {} kinds, {} attributes",
            header.brick_count, header.kind_count, header.attribute_count,
        );

        let kinds = (0..header.kind_count)
            .map(|_| r.name().map(|name| self.resolve_kind(&name)))
            .collect::<Result<Vec<_>>>()?;

        let tables = (0..header.attribute_count)
            .map(|_| AttributeTable::read(&mut r, self.registry, version))
            .collect::<Result<Vec<_>>>()?;

        let mut bricks = Vec::with_capacity(header.brick_count as usize);
        for pos in 0..header.brick_count as usize {
            let kind_idx = r.u16()?;
            let kind = kinds.get(kind_idx as usize).ok_or_else(|| BrvError::Malformed(format!(
                "brick #{pos}: kind index {kind_idx} out of range ({} kinds)", kinds.len(),
            )))?;
            let body_len = r.u32()? as usize;
            let base     = r.offset();
            let body     = r.bytes(body_len)?;

            let brick = read_body(pos, kind.clone(), body, &tables).map_err(|e| match e {
                BrvError::Truncated { offset } => BrvError::Truncated { offset: base + offset },
                other => other,
            })?;
            bricks.push(brick);
        }

        if r.remaining() > 0 {
            log::warn!("{} trailing bytes after the last brick ignored", r.remaining());
        }

        check_references(&bricks)?;
        Ok((version, bricks))
    }

    /// 目录中找不到的种类名用无默认值的新种类代替
    fn resolve_kind(&self, name: &str) -> Arc<BrickKind> {
        self.catalog.kind(name).unwrap_or_else(|| {
            log::debug!("brick kind {name} not in catalog, using bare kind");
            BrickKind::bare(name)
        })
    }
}

/// 记录体：属性对 + 位置 + 旋转（yaw, roll, pitch → x = pitch, y = yaw, z = roll）
fn read_body(
    pos:    usize,
    kind:   Arc<BrickKind>,
    body:   &[u8],
    tables: &[AttributeTable],
) -> Result<Brick> {
    let mut b     = ByteReader::new(body);
    let mut brick = Brick::new(RefIndex::synthetic_id(pos), kind);

    let pairs = b.u8()?;
    for _ in 0..pairs {
        let attr_idx  = b.u16()?;
        let value_idx = b.u16()?;
        let table = tables.get(attr_idx as usize).ok_or_else(|| BrvError::Malformed(format!(
            "brick #{pos}: attribute index {attr_idx} out of range ({} attributes)", tables.len(),
        )))?;
        if brick.patch.insert(table.key.clone(), table.get(value_idx)?.clone()).is_some() {
            return Err(BrvError::Malformed(format!(
                "brick #{pos}: attribute {} listed twice", table.key,
            )));
        }
    }

    brick.pos = Vec3::new(b.f32()?, b.f32()?, b.f32()?);
    let (yaw, roll, pitch) = (b.f32()?, b.f32()?, b.f32()?);
    brick.rot = Vec3::new(pitch, yaw, roll);

    if b.remaining() > 0 {
        log::warn!("brick #{pos}: {} unknown body bytes skipped", b.remaining());
    }
    Ok(brick)
}

/// 所有解码出的引用都必须指向本载具内的积木
fn check_references(bricks: &[Brick]) -> Result<()> {
    let index = RefIndex::build(bricks)?;
    for brick in bricks {
        for value in brick.patch.values() {
            for id in value.references() {
                index.ordinal(id)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BoolCodec;
    use crate::kind::Catalog;
    use crate::value::Value;

    #[test]
    fn header_only() {
        let h = read_header(&[15, 3, 0, 1, 0, 2, 0, 0xAA]).unwrap();
        assert_eq!(h, Header { version: 15, brick_count: 3, kind_count: 1, attribute_count: 2 });
        assert!(matches!(read_header(&[15, 3, 0]), Err(BrvError::Truncated { offset: 3 })));
    }

    #[test]
    fn oversized_brick_count_rejected() {
        assert!(matches!(read_header(&[16, 0xFF, 0xFF, 0, 0, 0, 0]), Err(BrvError::Malformed(_))));
    }

    #[test]
    fn kind_index_out_of_range() {
        // 1 brick, 1 kind "K", 0 attributes, brick with kind index 1
        let mut data = vec![16, 1, 0, 1, 0, 0, 0, 1, b'K', 1, 0];
        data.extend_from_slice(&25u32.to_le_bytes());
        data.extend_from_slice(&[0; 25]);

        let registry = CodecRegistry::new();
        let catalog  = Catalog::new();
        let err = VehicleReader::new(&registry, &catalog).decode(&data).unwrap_err();
        assert!(matches!(err, BrvError::Malformed(msg) if msg.contains("kind index 1")));
    }

    #[test]
    fn truncated_body_offset_is_absolute() {
        // 记录体只有 3 字节，不够读完声明的一个属性对
        let mut data = vec![16, 1, 0, 1, 0, 0, 0, 1, b'K', 0, 0];
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&[1, 0, 0]);

        let registry = CodecRegistry::new();
        let catalog  = Catalog::new();
        let err = VehicleReader::new(&registry, &catalog).decode(&data).unwrap_err();
        assert!(matches!(err, BrvError::Truncated { offset: 18 }), "{err:?}");
    }

    #[test]
    fn repeated_attribute_in_body_is_malformed() {
        // 1 个属性 "A"（单值 bool），积木记录体两次引用它
        let mut data = vec![16, 1, 0, 1, 0, 1, 0, 1, b'K', 1, b'A', 1, 0, 1, 0, 0, 0, 1, 0, 0];
        data.extend_from_slice(&33u32.to_le_bytes());
        data.extend_from_slice(&[2, 0, 0, 0, 0, 0, 0, 0, 0]);
        data.extend_from_slice(&[0; 24]);

        let mut registry = CodecRegistry::new();
        registry.register("A", BoolCodec);
        let catalog = Catalog::new();
        let err = VehicleReader::new(&registry, &catalog).decode(&data).unwrap_err();
        assert!(matches!(err, BrvError::Malformed(msg) if msg.contains("attribute A listed twice")));

        // 单次引用可以正常解码
        data.truncate(20);
        data.extend_from_slice(&29u32.to_le_bytes());
        data.extend_from_slice(&[1, 0, 0, 0, 0]);
        data.extend_from_slice(&[0; 24]);
        let (_, bricks) = VehicleReader::new(&registry, &catalog).decode(&data).unwrap();
        assert_eq!(bricks[0].patch["A"], Value::Bool(true));
    }

    #[test]
    fn unknown_kind_becomes_bare() {
        let mut data = vec![16, 1, 0, 1, 0, 0, 0, 3, b'F', b'o', b'o', 0, 0];
        data.extend_from_slice(&25u32.to_le_bytes());
        data.extend_from_slice(&[0; 25]);

        let registry = CodecRegistry::new();
        let catalog  = Catalog::new();
        let (version, bricks) = VehicleReader::new(&registry, &catalog).decode(&data).unwrap();
        assert_eq!(version, 16);
        assert_eq!(bricks.len(), 1);
        assert_eq!(bricks[0].kind().name(), "Foo");
        assert_eq!(bricks[0].id, "brick_0");
        assert!(bricks[0].patch.is_empty());
    }
}
