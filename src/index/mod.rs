//! 引用索引：积木标识 ↔ 序号
//!
//! 序号统一从 1 开始：`ordinal = position + 1`，0 保留表示“无引用”（目前不会写出）。
//! 0 基位置与 1 基序号的换算只发生在本模块；编解码器只接触序号。
//!
//! 解码时不存在原始标识，序号 `n` 还原为合成标识 `brick_{n-1}`，
//! 与解码器给第 `n-1` 块积木分配的标识一致。

use std::collections::HashMap;

use crate::brick::Brick;
use crate::common::{BrvError, Result, MAX_BRICKS};

#[derive(Debug, Default, Clone)]
pub struct RefIndex {
    ordinals: HashMap<String, u16>,
}

impl RefIndex {
    /// 按输入顺序为每块积木分配序号；标识重复或数量超限都会失败
    pub fn build(bricks: &[Brick]) -> Result<Self> {
        if bricks.len() > MAX_BRICKS {
            return Err(BrvError::CapacityExceeded {
                what: "bricks", limit: MAX_BRICKS, actual: bricks.len(),
            });
        }
        let mut ordinals = HashMap::with_capacity(bricks.len());
        for (pos, brick) in bricks.iter().enumerate() {
            let ordinal = Self::ordinal_of_position(pos);
            if ordinals.insert(brick.id.clone(), ordinal).is_some() {
                return Err(BrvError::DuplicateReference(brick.id.clone()));
            }
        }
        Ok(Self { ordinals })
    }

    /// 标识 → 序号；未知标识报 `UnknownReference`
    pub fn ordinal(&self, id: &str) -> Result<u16> {
        self.ordinals.get(id).copied()
            .ok_or_else(|| BrvError::UnknownReference(id.into()))
    }

    pub fn len(&self) -> usize { self.ordinals.len() }
    pub fn is_empty(&self) -> bool { self.ordinals.is_empty() }

    /// 0 基位置 → 1 基序号（调用方保证 `pos < MAX_BRICKS`）
    pub fn ordinal_of_position(pos: usize) -> u16 { (pos + 1) as u16 }

    /// 解码侧：0 基位置对应的合成标识
    pub fn synthetic_id(pos: usize) -> String { format!("brick_{pos}") }

    /// 解码侧：1 基序号 → 合成标识；序号 0 是保留值
    pub fn invert(ordinal: u16) -> Result<String> {
        match ordinal {
            0 => Err(BrvError::Malformed("reference ordinal 0 is reserved".into())),
            n => Ok(Self::synthetic_id(n as usize - 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::BrickKind;

    fn bricks(ids: &[&str]) -> Vec<Brick> {
        let kind = BrickKind::bare("ScalableBrick");
        ids.iter().map(|id| Brick::new(*id, kind.clone())).collect()
    }

    #[test]
    fn ordinals_are_one_based() {
        let idx = RefIndex::build(&bricks(&["seat", "cam", "wheel"])).unwrap();
        assert_eq!(idx.ordinal("seat").unwrap(), 1);
        assert_eq!(idx.ordinal("wheel").unwrap(), 3);
        assert!(matches!(idx.ordinal("ghost"), Err(BrvError::UnknownReference(_))));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = RefIndex::build(&bricks(&["a", "b", "a"])).unwrap_err();
        assert!(matches!(err, BrvError::DuplicateReference(id) if id == "a"));
    }

    #[test]
    fn invert_matches_synthetic_position() {
        assert_eq!(RefIndex::invert(1).unwrap(), RefIndex::synthetic_id(0));
        assert_eq!(RefIndex::invert(3).unwrap(), "brick_2");
        assert!(RefIndex::invert(0).is_err());
    }
}
