//! 属性字典列：写端驻留取值，读端按页脚切分
//!
//! 每个出现过的属性名对应一列，列内按首次出现顺序驻留编码后的不同取值：
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ key_len (u8) + key (ASCII)                   │
//! │ value_count  (u16 LE)                        │
//! │ values_total (u32 LE)                        │
//! │ values       (values_total 字节，首尾相接)    │
//! │ footer:                                      │
//! │   value_count <= 1 → 无                      │
//! │   长度全相同       → shared_len (u16)        │
//! │   否则             → 0u16 + len(u16) × count │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! 解码侧通过窥视页脚的首个 u16 区分两种形式：0 表示长度表。
//! 这要求任何取值都不能编码为 0 字节；驻留时对空值直接报错，格式本身不做修改。

use indexmap::IndexSet;

use crate::common::{BrvError, FormatVersion, Result, MAX_VALUES_PER_ATTRIBUTE};
use crate::registry::CodecRegistry;
use crate::value::Value;
use crate::wire::{write_name, write_u16, write_u32, ByteReader};

/// 区分值边界的页脚
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    /// 0 或 1 个取值，整块即唯一取值
    None,
    /// 所有取值等长
    Shared(u16),
    /// 逐值长度表（写出时前置 0 标记）
    Table(Vec<u16>),
}

// ── 编码侧 ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AttributeColumn {
    pub key: String,
    values:  IndexSet<Vec<u8>>,
}

impl AttributeColumn {
    pub fn new(key: &str) -> Self {
        Self { key: key.into(), values: IndexSet::new() }
    }

    /// 驻留一个编码后的取值，返回其值索引（相同字节只保留一份）
    pub fn intern(&mut self, bytes: Vec<u8>) -> Result<u16> {
        if bytes.is_empty() {
            return Err(BrvError::EmptyValue(self.key.clone()));
        }
        if bytes.len() > u16::MAX as usize {
            return Err(BrvError::CapacityExceeded {
                what: "encoded value length", limit: u16::MAX as usize, actual: bytes.len(),
            });
        }
        if let Some(idx) = self.values.get_index_of(&bytes) {
            return Ok(idx as u16);
        }
        if self.values.len() >= MAX_VALUES_PER_ATTRIBUTE {
            return Err(BrvError::CapacityExceeded {
                what: "distinct values per attribute",
                limit: MAX_VALUES_PER_ATTRIBUTE,
                actual: self.values.len() + 1,
            });
        }
        let (idx, _) = self.values.insert_full(bytes);
        Ok(idx as u16)
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn values(&self) -> impl Iterator<Item = &[u8]> {
        self.values.iter().map(Vec::as_slice)
    }

    pub fn total_len(&self) -> usize {
        self.values.iter().map(Vec::len).sum()
    }

    pub fn footer(&self) -> Footer {
        if self.values.len() <= 1 {
            return Footer::None;
        }
        let mut lens = self.values.iter().map(|v| v.len() as u16);
        let first    = lens.next().unwrap_or_default();
        if lens.all(|l| l == first) {
            Footer::Shared(first)
        } else {
            Footer::Table(self.values.iter().map(|v| v.len() as u16).collect())
        }
    }

    pub fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let total = self.total_len();
        if total > u32::MAX as usize {
            return Err(BrvError::CapacityExceeded {
                what: "attribute value block", limit: u32::MAX as usize, actual: total,
            });
        }
        write_name(out, &self.key)?;
        write_u16(out, self.values.len() as u16)?;
        write_u32(out, total as u32)?;
        for v in &self.values {
            out.extend_from_slice(v);
        }

        let footer = self.footer();
        log::trace!("attribute {}: {} values, {total} bytes, footer {footer:?}", self.key, self.len());
        match footer {
            Footer::None       => {}
            Footer::Shared(n)  => write_u16(out, n)?,
            Footer::Table(lens) => {
                write_u16(out, 0)?;
                for l in lens {
                    write_u16(out, l)?;
                }
            }
        }
        Ok(())
    }
}

// ── 解码侧 ────────────────────────────────────────────────────────────────────

/// 解码出的一列：值索引 → 值
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTable {
    pub key:    String,
    pub values: Vec<Value>,
}

impl AttributeTable {
    /// 读取一列并用注册表中的编解码器还原每个取值
    pub fn read(
        r:        &mut ByteReader<'_>,
        registry: &CodecRegistry,
        version:  FormatVersion,
    ) -> Result<Self> {
        let key   = r.name()?;
        let codec = registry.require(&key)?;
        let count = r.u16()? as usize;
        let total = r.u32()? as usize;
        let block = r.bytes(total)?;

        let lens: Vec<usize> = match count {
            0 => Vec::new(),
            1 => vec![total],
            _ => read_footer(r, count)?,
        };

        let sum: usize = lens.iter().sum();
        if sum != total {
            return Err(BrvError::Malformed(format!(
                "attribute {key}: value lengths sum to {sum}, block is {total} bytes",
            )));
        }

        let mut values = Vec::with_capacity(count);
        let mut start  = 0;
        for len in lens {
            values.push(codec.decode(&block[start..start + len], version)?);
            start += len;
        }
        Ok(Self { key, values })
    }

    pub fn get(&self, idx: u16) -> Result<&Value> {
        self.values.get(idx as usize).ok_or_else(|| BrvError::Malformed(format!(
            "attribute {}: value index {idx} out of range ({} values)", self.key, self.values.len(),
        )))
    }
}

/// 多值列的页脚 → 每个取值的长度；首个 u16 为 0 表示长度表，否则为共享长度
fn read_footer(r: &mut ByteReader<'_>, count: usize) -> Result<Vec<usize>> {
    if r.peek_u16()? != 0 {
        let shared = r.u16()? as usize;
        return Ok(vec![shared; count]);
    }
    r.u16()?;
    (0..count).map(|_| r.u16().map(usize::from)).collect()
}
