//! 积木记录
//!
//! 补丁（patch）只保存与种类默认值不同或被显式设置的属性；
//! 读取时先查补丁，再回落到种类默认值。

use std::sync::Arc;

use indexmap::IndexMap;

use crate::common::{BrvError, Result};
use crate::kind::BrickKind;
use crate::value::{Value, Vec3};

#[derive(Debug, Clone)]
pub struct Brick {
    /// 外部标识，在同一载具内唯一
    pub id:    String,
    kind:      Arc<BrickKind>,
    pub pos:   Vec3,
    /// x = pitch，y = yaw，z = roll
    pub rot:   Vec3,
    pub patch: IndexMap<String, Value>,
}

impl Brick {
    pub fn new(id: impl Into<String>, kind: Arc<BrickKind>) -> Self {
        Self {
            id: id.into(), kind,
            pos: Vec3::ZERO, rot: Vec3::ZERO,
            patch: IndexMap::new(),
        }
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos; self
    }
    pub fn with_rot(mut self, rot: Vec3) -> Self {
        self.rot = rot; self
    }
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.patch.insert(key.into(), value.into()); self
    }

    pub fn kind(&self) -> &Arc<BrickKind> { &self.kind }

    /// 补丁中存在则返回补丁值（包括显式的 `Null`），否则返回种类默认值的副本
    pub fn get_property(&self, key: &str) -> Result<Value> {
        if let Some(v) = self.patch.get(key) {
            return Ok(v.clone());
        }
        self.kind.default_of(key).cloned().ok_or_else(|| BrvError::UnknownProperty {
            kind:     self.kind.name().into(),
            property: key.into(),
        })
    }

    pub fn set_property(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.patch.insert(key.into(), value.into());
        self
    }

    /// 以当前有效值为输入计算新值并写回补丁
    pub fn edit_property<F>(&mut self, key: &str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(Value) -> Value,
    {
        let current = self.get_property(key)?;
        self.patch.insert(key.into(), f(current));
        Ok(self)
    }

    pub fn reset_property(&mut self, key: &str) -> &mut Self {
        self.patch.shift_remove(key);
        self
    }

    /// 种类声明的全部属性的有效值
    pub fn all_properties(&self) -> IndexMap<String, Value> {
        self.kind.defaults().iter()
            .map(|(k, default)| {
                let v = self.patch.get(k).unwrap_or(default);
                (k.clone(), v.clone())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wheel() -> Arc<BrickKind> {
        BrickKind::new("Wheel", [
            ("WheelDiameter", Value::Float(60.0)),
            ("bDriven", Value::Bool(false)),
        ])
    }

    #[test]
    fn patch_overrides_default() {
        let mut b = Brick::new("w0", wheel());
        assert_eq!(b.get_property("WheelDiameter").unwrap(), Value::Float(60.0));

        b.set_property("WheelDiameter", 90.0f32);
        assert_eq!(b.get_property("WheelDiameter").unwrap(), Value::Float(90.0));

        b.reset_property("WheelDiameter");
        assert_eq!(b.get_property("WheelDiameter").unwrap(), Value::Float(60.0));
    }

    #[test]
    fn unknown_property_is_an_error() {
        let b = Brick::new("w0", wheel());
        assert!(matches!(
            b.get_property("HornPitch"),
            Err(BrvError::UnknownProperty { ref property, .. }) if property == "HornPitch"
        ));
    }

    #[test]
    fn edit_reads_effective_value() {
        let mut b = Brick::new("w0", wheel());
        b.edit_property("WheelDiameter", |v| match v {
            Value::Float(d) => Value::Float(d * 2.0),
            other => other,
        }).unwrap();
        assert_eq!(b.patch.get("WheelDiameter"), Some(&Value::Float(120.0)));
    }

    #[test]
    fn all_properties_merges_patch() {
        let b = Brick::new("w0", wheel()).with_property("bDriven", true);
        let all = b.all_properties();
        assert_eq!(all.len(), 2);
        assert_eq!(all["bDriven"], Value::Bool(true));
        assert_eq!(all["WheelDiameter"], Value::Float(60.0));
    }
}
