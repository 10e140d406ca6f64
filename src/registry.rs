//! 属性名 → 编解码器注册表
//!
//! 注册表是显式构造的普通对象：进程启动时构建（通常是 `CodecRegistry::builtin()`），
//! 之后以 `&CodecRegistry` 只读共享给所有编解码调用。同一属性名重复注册时后者覆盖前者，
//! 可以用来替换内置编解码器。

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{
    BoolCodec, BrickRefCodec, BrickRefListCodec, EnumCodec, Float32Codec, Int8Codec,
    PropertyCodec, TextCodec, UInt16Codec, UInt24Codec, UInt32Codec, Vec3Codec, VersionGated,
};
use crate::common::{BrvError, Result, FILE_LEGACY_VERSION};
use crate::property::*;

#[derive(Debug, Default, Clone)]
pub struct CodecRegistry {
    codecs: HashMap<String, Arc<dyn PropertyCodec>>,
}

impl CodecRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register<C: PropertyCodec + 'static>(&mut self, key: &str, codec: C) -> &mut Self {
        self.register_shared(key, Arc::new(codec))
    }

    pub fn register_shared(&mut self, key: &str, codec: Arc<dyn PropertyCodec>) -> &mut Self {
        if self.codecs.insert(key.into(), codec).is_some() {
            log::debug!("codec for attribute {key} overridden");
        }
        self
    }

    pub fn lookup(&self, key: &str) -> Option<&dyn PropertyCodec> {
        self.codecs.get(key).map(|c| c.as_ref())
    }

    /// 查找失败报 `UnknownAttribute`：编码与解码都把它视为整次调用失败
    pub fn require(&self, key: &str) -> Result<&dyn PropertyCodec> {
        self.lookup(key).ok_or_else(|| BrvError::UnknownAttribute(key.into()))
    }

    pub fn contains(&self, key: &str) -> bool { self.codecs.contains_key(key) }
    pub fn len(&self) -> usize { self.codecs.len() }
    pub fn is_empty(&self) -> bool { self.codecs.is_empty() }

    /// 游戏内置的全部属性
    pub fn builtin() -> Self {
        let mut r = Self::new();

        for key in [
            B_CAN_DISABLE_STEERING, B_CAN_INVERT_STEERING, B_DRIVEN, B_FLUID_DYNAMIC,
            B_HAS_BRAKE, B_HAS_HANDBRAKE, B_INVERT_DRIVE, B_INVERT_TANK_STEERING, B_TANK_DRIVE,
        ] {
            r.register(key, BoolCodec);
        }

        for key in [
            BRICK_MATERIAL, BRICK_PATTERN, ACTUATOR_MODE, COUPLING_MODE,
            EXHAUST_EFFECT, SIREN_TYPE,
        ] {
            r.register(key, EnumCodec);
        }

        for key in [
            BRAKE_STRENGTH, GEAR_RATIO, HORN_PITCH, MIN_LIMIT, MAX_LIMIT,
            SIZE_SCALE, SPAWN_SCALE, SUSPENSION_LENGTH, SUSPENSION_STIFFNESS,
            SUSPENSION_DAMPING, TIRE_PRESSURE, TIRE_WIDTH, WHEEL_DIAMETER, WHEEL_WIDTH,
        ] {
            r.register(key, Float32Codec);
        }

        for channel in INPUT_CHANNELS {
            r.register(&channel_key(channel, INPUT_AXIS_SUFFIX), EnumCodec);
            r.register(&channel_key(channel, SOURCE_BRICKS_SUFFIX), BrickRefListCodec);
            r.register(&channel_key(channel, VALUE_SUFFIX), Float32Codec);
        }

        r.register(BRICK_COLOR, VersionGated::new(FILE_LEGACY_VERSION + 1, UInt32Codec))
         .register(BRICK_SIZE, Vec3Codec)
         .register(CONNECTOR_SPACING, UInt16Codec)
         .register(DISPLAY_COLOR, UInt24Codec)
         .register(SMOKE_COLOR, UInt24Codec)
         .register(NUM_FRACTIONAL_DIGITS, Int8Codec)
         .register(CAMERA_NAME, TextCodec)
         .register(OWNING_SEAT, BrickRefCodec);
        r
    }
}
