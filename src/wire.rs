//! 小端字节读写原语
//!
//! 写入直接使用 `byteorder::WriteBytesExt`（目标总是 `Vec<u8>`）；
//! 读取经 `ByteReader` 做越界检查，越界统一报 `Truncated { offset }`。

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::common::{BrvError, Result};

// ── ByteReader ────────────────────────────────────────────────────────────────

pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    pub fn offset(&self) -> usize { self.cursor.position() as usize }
    pub fn remaining(&self) -> usize { self.cursor.get_ref().len().saturating_sub(self.offset()) }

    fn truncated(&self) -> BrvError {
        BrvError::Truncated { offset: self.offset() }
    }

    /// 失败时报告读取开始处的偏移（`Cursor` 在失败后会把位置移到末尾）
    fn read<T>(&mut self, f: impl FnOnce(&mut Cursor<&'a [u8]>) -> std::io::Result<T>) -> Result<T> {
        let offset = self.offset();
        f(&mut self.cursor).map_err(|_| BrvError::Truncated { offset })
    }

    pub fn u8(&mut self)  -> Result<u8>  { self.read(|c| c.read_u8()) }
    pub fn i8(&mut self)  -> Result<i8>  { self.read(|c| c.read_i8()) }
    pub fn u16(&mut self) -> Result<u16> { self.read(|c| c.read_u16::<LittleEndian>()) }
    pub fn i16(&mut self) -> Result<i16> { self.read(|c| c.read_i16::<LittleEndian>()) }
    pub fn u32(&mut self) -> Result<u32> { self.read(|c| c.read_u32::<LittleEndian>()) }
    pub fn f32(&mut self) -> Result<f32> { self.read(|c| c.read_f32::<LittleEndian>()) }

    /// 读取下一个 u16 但不移动读指针
    pub fn peek_u16(&self) -> Result<u16> {
        let start = self.offset();
        let data  = self.cursor.get_ref();
        match data.get(start..start + 2) {
            Some(b) => Ok(u16::from_le_bytes([b[0], b[1]])),
            None    => Err(self.truncated()),
        }
    }

    /// 借出接下来 `len` 个字节
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let start = self.offset();
        let data: &'a [u8] = *self.cursor.get_ref();
        let out = data.get(start..start + len).ok_or_else(|| self.truncated())?;
        self.cursor.set_position((start + len) as u64);
        Ok(out)
    }

    /// u8 长度前缀的 ASCII 名字
    pub fn name(&mut self) -> Result<String> {
        let len   = self.u8()? as usize;
        let bytes = self.bytes(len)?;
        if !bytes.is_ascii() {
            return Err(BrvError::Malformed(format!(
                "non-ASCII name at offset {}", self.offset() - len,
            )));
        }
        Ok(bytes.iter().map(|&b| b as char).collect())
    }
}

// ── 写入辅助 ──────────────────────────────────────────────────────────────────

/// 写出 u8 长度前缀的 ASCII 名字（种类名、属性名）
pub fn write_name(out: &mut Vec<u8>, name: &str) -> Result<()> {
    if !name.is_ascii() || name.len() > u8::MAX as usize {
        return Err(BrvError::InvalidName(name.into()));
    }
    out.write_u8(name.len() as u8)?;
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

pub fn write_u16(out: &mut Vec<u8>, v: u16) -> Result<()> {
    out.write_u16::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_u32(out: &mut Vec<u8>, v: u32) -> Result<()> {
    out.write_u32::<LittleEndian>(v)?;
    Ok(())
}

pub fn write_f32(out: &mut Vec<u8>, v: f32) -> Result<()> {
    out.write_f32::<LittleEndian>(v)?;
    Ok(())
}
