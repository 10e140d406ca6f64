//! 载具文件：格式版本 + 有序积木序列

use crate::brick::Brick;
use crate::common::{FormatVersion, Result, FILE_EXP_VERSION};
use crate::decoder::VehicleReader;
use crate::encoder::VehicleWriter;
use crate::kind::KindCatalog;
use crate::registry::CodecRegistry;

#[derive(Debug, Clone)]
pub struct Vehicle {
    pub version: FormatVersion,
    pub bricks:  Vec<Brick>,
}

impl Default for Vehicle {
    fn default() -> Self { Self::new(FILE_EXP_VERSION) }
}

impl Vehicle {
    pub fn new(version: FormatVersion) -> Self {
        Self { version, bricks: Vec::new() }
    }

    pub fn add(&mut self, brick: Brick) -> &mut Self {
        self.bricks.push(brick);
        self
    }

    pub fn extend<I: IntoIterator<Item = Brick>>(&mut self, bricks: I) -> &mut Self {
        self.bricks.extend(bricks);
        self
    }

    /// 把另一个载具的积木追加到末尾（版本保持不变）
    pub fn merge(&mut self, other: &Vehicle) -> &mut Self {
        self.bricks.extend(other.bricks.iter().cloned());
        self
    }

    pub fn brick_count(&self) -> usize { self.bricks.len() }

    pub fn serialize(&self, registry: &CodecRegistry) -> Result<Vec<u8>> {
        VehicleWriter::encode(self.version, &self.bricks, registry)
    }

    pub fn deserialize(
        data:     &[u8],
        registry: &CodecRegistry,
        catalog:  &dyn KindCatalog,
    ) -> Result<Self> {
        let (version, bricks) = VehicleReader::new(registry, catalog).decode(data)?;
        Ok(Self { version, bricks })
    }
}

impl std::ops::Add for Vehicle {
    type Output = Vehicle;

    fn add(mut self, other: Vehicle) -> Vehicle {
        self.bricks.extend(other.bricks);
        self
    }
}
