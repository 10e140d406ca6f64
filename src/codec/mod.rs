//! 属性编解码器
//!
//! 每种属性值类型对应一个编解码器，经 `CodecRegistry` 按属性名查找后调用：
//!
//! | 编解码器            | 值               | 字节表示                                  |
//! |---------------------|------------------|-------------------------------------------|
//! | `BoolCodec`         | `Bool`           | 1 字节 0/1                                |
//! | `EnumCodec`         | `Enum`           | u8 长度 + ASCII                           |
//! | `Float32Codec`      | `Float`          | f32 LE                                    |
//! | `Int8Codec`         | `Int8`           | i8                                        |
//! | `UInt16Codec`       | `UInt16`         | u16 LE                                    |
//! | `UInt24Codec`       | `UInt24`         | LE 低 3 字节，逆序存放                    |
//! | `UInt32Codec`       | `UInt32`         | u32 LE                                    |
//! | `TextCodec`         | `Text`           | i16 字符数（负数 = UTF-16LE）+ 文本       |
//! | `BrickRefCodec`     | `Ref`            | u16 序号                                  |
//! | `BrickRefListCodec` | `Refs`           | u16 个数 + u16 序号 × 个数                |
//! | `Vec3Codec`         | `Vec3`           | 3 × f32 LE                                |
//! | `VersionGated<C>`   | 同 `C`           | 低于最小版本时返回 `Encoded::VersionGate` |
//!
//! 任何编解码器都不会产生 0 字节的输出；字典页脚的“共享长度 / 长度表”
//! 判定依赖这一点（长度 0 被用作长度表标记）。

use std::fmt::Debug;

use crate::common::{BrvError, FormatVersion, Result};
use crate::index::RefIndex;
use crate::value::{Value, Vec3};

// ── 编码结果 ──────────────────────────────────────────────────────────────────

/// 编码的三态结果之一；第三态是 `Err`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Encoded {
    Bytes(Vec<u8>),
    /// 当前格式版本无法表示该值：这块积木跳过该属性
    VersionGate,
}

// ── 编解码器接口 ──────────────────────────────────────────────────────────────

pub trait PropertyCodec: Debug + Send + Sync {
    fn encode(&self, value: &Value, version: FormatVersion, refs: &RefIndex) -> Result<Encoded>;
    fn decode(&self, data: &[u8], version: FormatVersion) -> Result<Value>;
}

fn mismatch(expected: &'static str, found: &Value) -> BrvError {
    BrvError::TypeMismatch { expected, found: found.type_name() }
}

fn fixed<const N: usize>(data: &[u8], what: &str) -> Result<[u8; N]> {
    data.try_into().map_err(|_| BrvError::Malformed(format!(
        "{what}: expected {N} bytes, got {}", data.len(),
    )))
}

// ── 标量 ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl PropertyCodec for BoolCodec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::Bool(b) => Ok(Encoded::Bytes(vec![*b as u8])),
            other          => Err(mismatch("bool", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        match fixed::<1>(data, "bool")? {
            [0] => Ok(Value::Bool(false)),
            [1] => Ok(Value::Bool(true)),
            [b] => Err(BrvError::Malformed(format!("bool: invalid byte {b:#04x}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Float32Codec;

impl PropertyCodec for Float32Codec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::Float(f) => Ok(Encoded::Bytes(f.to_le_bytes().to_vec())),
            other           => Err(mismatch("float32", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        Ok(Value::Float(f32::from_le_bytes(fixed(data, "float32")?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Int8Codec;

impl PropertyCodec for Int8Codec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::Int8(v) => Ok(Encoded::Bytes(v.to_le_bytes().to_vec())),
            other          => Err(mismatch("int8", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        Ok(Value::Int8(i8::from_le_bytes(fixed(data, "int8")?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UInt16Codec;

impl PropertyCodec for UInt16Codec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::UInt16(v) => Ok(Encoded::Bytes(v.to_le_bytes().to_vec())),
            other            => Err(mismatch("uint16", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        Ok(Value::UInt16(u16::from_le_bytes(fixed(data, "uint16")?)))
    }
}

/// 24 位无符号整数：取 u32 LE 的低 3 字节并逆序（即 24 位大端），最高字节丢弃
#[derive(Debug, Clone, Copy, Default)]
pub struct UInt24Codec;

impl PropertyCodec for UInt24Codec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::UInt24(v) => {
                let [b0, b1, b2, _] = v.to_le_bytes();
                Ok(Encoded::Bytes(vec![b2, b1, b0]))
            }
            other => Err(mismatch("uint24", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        let [b2, b1, b0] = fixed::<3>(data, "uint24")?;
        Ok(Value::UInt24(u32::from_le_bytes([b0, b1, b2, 0])))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UInt32Codec;

impl PropertyCodec for UInt32Codec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::UInt32(v) => Ok(Encoded::Bytes(v.to_le_bytes().to_vec())),
            other            => Err(mismatch("uint32", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        Ok(Value::UInt32(u32::from_le_bytes(fixed(data, "uint32")?)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Vec3Codec;

impl PropertyCodec for Vec3Codec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        match value {
            Value::Vec3(v) => {
                let out = v.as_array().iter().flat_map(|f| f.to_le_bytes()).collect();
                Ok(Encoded::Bytes(out))
            }
            other => Err(mismatch("vec3", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        let raw: [u8; 12] = fixed(data, "vec3")?;
        let mut xyz = [0f32; 3];
        for (f, chunk) in xyz.iter_mut().zip(raw.chunks_exact(4)) {
            *f = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(Value::Vec3(Vec3::from(xyz)))
    }
}

// ── 字符串 ────────────────────────────────────────────────────────────────────

/// 枚举名：u8 长度前缀 + ASCII
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumCodec;

impl PropertyCodec for EnumCodec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        let s = match value {
            Value::Enum(s) => s,
            other          => return Err(mismatch("enum", other)),
        };
        if !s.is_ascii() {
            return Err(BrvError::InvalidName(s.clone()));
        }
        if s.len() > u8::MAX as usize {
            return Err(BrvError::CapacityExceeded {
                what: "enum length", limit: u8::MAX as usize, actual: s.len(),
            });
        }
        let mut out = Vec::with_capacity(1 + s.len());
        out.push(s.len() as u8);
        out.extend_from_slice(s.as_bytes());
        Ok(Encoded::Bytes(out))
    }

    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        let (&len, body) = data.split_first()
            .ok_or_else(|| BrvError::Malformed("enum: empty value".into()))?;
        if len as usize != body.len() || !body.is_ascii() {
            return Err(BrvError::Malformed(format!(
                "enum: prefix {len} does not describe {} ASCII bytes", body.len(),
            )));
        }
        Ok(Value::Enum(body.iter().map(|&b| b as char).collect()))
    }
}

/// 用户文本：i16 字符数前缀，非负 = ASCII，负 = UTF-16LE（绝对值为 UTF-16 码元数）
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl PropertyCodec for TextCodec {
    fn encode(&self, value: &Value, _: FormatVersion, _: &RefIndex) -> Result<Encoded> {
        let s = match value {
            Value::Text(s) => s,
            other          => return Err(mismatch("text", other)),
        };
        let limit = i16::MAX as usize;
        if s.is_ascii() {
            if s.len() > limit {
                return Err(BrvError::CapacityExceeded { what: "text length", limit, actual: s.len() });
            }
            let mut out = Vec::with_capacity(2 + s.len());
            out.extend_from_slice(&(s.len() as i16).to_le_bytes());
            out.extend_from_slice(s.as_bytes());
            Ok(Encoded::Bytes(out))
        } else {
            // 前缀记字符数而非 UTF-16 单元数，补充平面字符计 1
            let chars = s.chars().count();
            if chars > limit {
                return Err(BrvError::CapacityExceeded { what: "text length", limit, actual: chars });
            }
            let mut out = Vec::with_capacity(2 + s.len() * 2);
            out.extend_from_slice(&(-(chars as i16)).to_le_bytes());
            for u in s.encode_utf16() {
                out.extend_from_slice(&u.to_le_bytes());
            }
            Ok(Encoded::Bytes(out))
        }
    }

    /// 前缀只用其符号选择编码；元素边界已由字典页脚给出，正文取整个剩余部分
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        if data.len() < 2 {
            return Err(BrvError::Malformed("text: missing length prefix".into()));
        }
        let len  = i16::from_le_bytes([data[0], data[1]]);
        let body = &data[2..];

        if len >= 0 {
            if !body.is_ascii() {
                return Err(BrvError::Malformed(format!("text: {} bytes are not ASCII", body.len())));
            }
            return Ok(Value::Text(body.iter().map(|&b| b as char).collect()));
        }

        if body.len() % 2 != 0 {
            return Err(BrvError::Malformed(format!(
                "text: UTF-16 body has odd length {}", body.len(),
            )));
        }
        let units: Vec<u16> = body.chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16(&units)
            .map(Value::Text)
            .map_err(|e| BrvError::Malformed(format!("text: {e}")))
    }
}

// ── 积木引用 ──────────────────────────────────────────────────────────────────

/// 单个积木引用，写为 1 基 u16 序号
#[derive(Debug, Clone, Copy, Default)]
pub struct BrickRefCodec;

impl PropertyCodec for BrickRefCodec {
    fn encode(&self, value: &Value, _: FormatVersion, refs: &RefIndex) -> Result<Encoded> {
        match value {
            Value::Ref(id) => Ok(Encoded::Bytes(refs.ordinal(id)?.to_le_bytes().to_vec())),
            other          => Err(mismatch("ref", other)),
        }
    }
    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        let ordinal = u16::from_le_bytes(fixed(data, "ref")?);
        Ok(Value::Ref(RefIndex::invert(ordinal)?))
    }
}

/// 积木引用列表：u16 个数 + 每项 u16 序号
#[derive(Debug, Clone, Copy, Default)]
pub struct BrickRefListCodec;

impl PropertyCodec for BrickRefListCodec {
    fn encode(&self, value: &Value, _: FormatVersion, refs: &RefIndex) -> Result<Encoded> {
        let ids = match value {
            Value::Refs(ids) => ids,
            other            => return Err(mismatch("refs", other)),
        };
        if ids.len() > u16::MAX as usize {
            return Err(BrvError::CapacityExceeded {
                what: "reference list", limit: u16::MAX as usize, actual: ids.len(),
            });
        }
        let mut out = Vec::with_capacity(2 + ids.len() * 2);
        out.extend_from_slice(&(ids.len() as u16).to_le_bytes());
        for id in ids.iter() {
            out.extend_from_slice(&refs.ordinal(id)?.to_le_bytes());
        }
        Ok(Encoded::Bytes(out))
    }

    fn decode(&self, data: &[u8], _: FormatVersion) -> Result<Value> {
        if data.len() < 2 {
            return Err(BrvError::Malformed("refs: missing count".into()));
        }
        let count = u16::from_le_bytes([data[0], data[1]]) as usize;
        let body  = &data[2..];
        if body.len() != count * 2 {
            return Err(BrvError::Malformed(format!(
                "refs: count {count} does not match {} bytes", body.len(),
            )));
        }
        let ids = body.chunks_exact(2)
            .map(|c| RefIndex::invert(u16::from_le_bytes([c[0], c[1]])))
            .collect::<Result<Box<[String]>>>()?;
        Ok(Value::Refs(ids))
    }
}

// ── 版本门控 ──────────────────────────────────────────────────────────────────

/// 包装另一个编解码器：格式版本低于 `min_version` 时该属性不可表示
#[derive(Debug, Clone, Copy)]
pub struct VersionGated<C> {
    pub min_version: FormatVersion,
    pub inner:       C,
}

impl<C> VersionGated<C> {
    pub fn new(min_version: FormatVersion, inner: C) -> Self {
        Self { min_version, inner }
    }
}

impl<C: PropertyCodec> PropertyCodec for VersionGated<C> {
    fn encode(&self, value: &Value, version: FormatVersion, refs: &RefIndex) -> Result<Encoded> {
        if version < self.min_version {
            return Ok(Encoded::VersionGate);
        }
        self.inner.encode(value, version, refs)
    }
    fn decode(&self, data: &[u8], version: FormatVersion) -> Result<Value> {
        self.inner.decode(data, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brick::Brick;
    use crate::common::{FILE_EXP_VERSION, FILE_LEGACY_VERSION};
    use crate::kind::BrickKind;

    const V: FormatVersion = FILE_EXP_VERSION;

    fn bytes(codec: &dyn PropertyCodec, value: Value) -> Vec<u8> {
        match codec.encode(&value, V, &RefIndex::default()).unwrap() {
            Encoded::Bytes(b)    => b,
            Encoded::VersionGate => panic!("unexpected version gate"),
        }
    }

    fn refs(ids: &[&str]) -> RefIndex {
        let kind = BrickKind::bare("ScalableBrick");
        let bricks: Vec<Brick> = ids.iter().map(|id| Brick::new(*id, kind.clone())).collect();
        RefIndex::build(&bricks).unwrap()
    }

    #[test]
    fn bool_is_one_byte() {
        assert_eq!(bytes(&BoolCodec, Value::Bool(true)), [1]);
        assert_eq!(bytes(&BoolCodec, Value::Bool(false)), [0]);
        assert_eq!(BoolCodec.decode(&[1], V).unwrap(), Value::Bool(true));
        assert!(BoolCodec.decode(&[2], V).is_err());
    }

    #[test]
    fn enum_has_length_prefix() {
        let b = bytes(&EnumCodec, Value::Enum("Steel".into()));
        assert_eq!(b, b"\x05Steel");
        assert_eq!(EnumCodec.decode(&b, V).unwrap(), Value::Enum("Steel".into()));
        assert!(EnumCodec.decode(b"\x09Steel", V).is_err());
    }

    #[test]
    fn uint24_is_reversed_low_bytes() {
        let b = bytes(&UInt24Codec, Value::UInt24(0x00ff3f10));
        assert_eq!(b, [0xff, 0x3f, 0x10]);
        assert_eq!(UInt24Codec.decode(&b, V).unwrap(), Value::UInt24(0xff3f10));
    }

    #[test]
    fn uint24_drops_top_byte() {
        let b = bytes(&UInt24Codec, Value::UInt24(0xab123456));
        assert_eq!(UInt24Codec.decode(&b, V).unwrap(), Value::UInt24(0x123456));
    }

    #[test]
    fn fixed_width_lengths_checked() {
        assert!(Float32Codec.decode(&[0, 0, 0], V).is_err());
        assert!(UInt16Codec.decode(&[0], V).is_err());
        assert!(Vec3Codec.decode(&[0; 11], V).is_err());
    }

    #[test]
    fn vec3_packs_three_floats() {
        let v = Vec3::new(1.5, -2.0, 30.0);
        let b = bytes(&Vec3Codec, Value::Vec3(v));
        assert_eq!(b.len(), 12);
        assert_eq!(&b[4..8], &(-2.0f32).to_le_bytes());
        assert_eq!(Vec3Codec.decode(&b, V).unwrap(), Value::Vec3(v));
    }

    #[test]
    fn ascii_text_has_positive_prefix() {
        let b = bytes(&TextCodec, Value::Text("Cam".into()));
        assert_eq!(b, [3, 0, b'C', b'a', b'm']);
        assert_eq!(TextCodec.decode(&b, V).unwrap(), Value::Text("Cam".into()));
    }

    #[test]
    fn unicode_text_has_negative_prefix() {
        let s = "Kamera Ü";
        let b = bytes(&TextCodec, Value::Text(s.into()));
        assert_eq!(i16::from_le_bytes([b[0], b[1]]), -8);
        assert_eq!(b.len(), 2 + 16);
        assert_eq!(TextCodec.decode(&b, V).unwrap(), Value::Text(s.into()));
    }

    #[test]
    fn empty_text_is_not_empty_bytes() {
        assert_eq!(bytes(&TextCodec, Value::Text(String::new())), [0, 0]);
    }

    #[test]
    fn astral_text_prefix_counts_chars() {
        // "😀" 是一个字符、两个 UTF-16 单元
        let b = bytes(&TextCodec, Value::Text("😀".into()));
        assert_eq!(b, [0xff, 0xff, 0x3d, 0xd8, 0x00, 0xde]);
        assert_eq!(TextCodec.decode(&b, V).unwrap(), Value::Text("😀".into()));

        let b = bytes(&TextCodec, Value::Text("Sitz 😀!".into()));
        assert_eq!(i16::from_le_bytes([b[0], b[1]]), -7);
        assert_eq!(b.len(), 2 + 16);
    }

    #[test]
    fn text_body_ignores_prefix_magnitude() {
        // 解码只看前缀符号，正文长度由字典页脚决定
        let utf16 = [0xfe, 0xff, 0x3d, 0xd8, 0x00, 0xde];
        assert_eq!(TextCodec.decode(&utf16, V).unwrap(), Value::Text("😀".into()));
        assert_eq!(TextCodec.decode(&[1, 0, b'C', b'a', b'm'], V).unwrap(), Value::Text("Cam".into()));

        assert!(TextCodec.decode(&[0xff, 0xff, 0x3d, 0xd8, 0x00], V).is_err());
        assert!(TextCodec.decode(&[2, 0, b'C', 0xc3], V).is_err());
    }

    #[test]
    fn single_ref_resolves_ordinal() {
        let idx = refs(&["seat", "cam"]);
        let enc = BrickRefCodec.encode(&Value::Ref("cam".into()), V, &idx).unwrap();
        assert_eq!(enc, Encoded::Bytes(vec![2, 0]));
        assert_eq!(BrickRefCodec.decode(&[2, 0], V).unwrap(), Value::Ref("brick_1".into()));
    }

    #[test]
    fn dangling_ref_fails() {
        let idx = refs(&["seat"]);
        let err = BrickRefCodec.encode(&Value::Ref("ghost".into()), V, &idx).unwrap_err();
        assert!(matches!(err, BrvError::UnknownReference(id) if id == "ghost"));

        let err = BrickRefListCodec.encode(&Value::refs(["seat", "ghost"]), V, &idx).unwrap_err();
        assert!(matches!(err, BrvError::UnknownReference(_)));
    }

    #[test]
    fn ref_list_round_trip() {
        let idx = refs(&["a", "b", "c"]);
        let enc = BrickRefListCodec.encode(&Value::refs(["c", "a"]), V, &idx).unwrap();
        assert_eq!(enc, Encoded::Bytes(vec![2, 0, 3, 0, 1, 0]));
        assert_eq!(
            BrickRefListCodec.decode(&[2, 0, 3, 0, 1, 0], V).unwrap(),
            Value::refs(["brick_2", "brick_0"]),
        );
        assert!(BrickRefListCodec.decode(&[2, 0, 3, 0], V).is_err());
    }

    #[test]
    fn version_gate_below_minimum() {
        let codec = VersionGated::new(FILE_LEGACY_VERSION + 1, UInt32Codec);
        let idx = RefIndex::default();
        let v = Value::UInt32(0xbcbcbcff);
        assert_eq!(codec.encode(&v, FILE_LEGACY_VERSION, &idx).unwrap(), Encoded::VersionGate);
        assert_eq!(
            codec.encode(&v, FILE_LEGACY_VERSION + 1, &idx).unwrap(),
            Encoded::Bytes(0xbcbcbcffu32.to_le_bytes().to_vec()),
        );
    }

    #[test]
    fn wrong_variant_is_type_mismatch() {
        let err = Float32Codec.encode(&Value::Bool(true), V, &RefIndex::default()).unwrap_err();
        assert!(matches!(err, BrvError::TypeMismatch { expected: "float32", found: "bool" }));
    }
}
