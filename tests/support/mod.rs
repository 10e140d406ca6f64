//! 集成测试共用：示例种类目录与原始字节流解析

#![allow(dead_code)]

use std::sync::Arc;

use brv_codec::property::*;
use brv_codec::wire::ByteReader;
use brv_codec::{read_header, BrickKind, Catalog, Value, Vec3};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub struct Kinds {
    pub scalable: Arc<BrickKind>,
    pub wheel:    Arc<BrickKind>,
    pub seat:     Arc<BrickKind>,
    pub camera:   Arc<BrickKind>,
}

impl Kinds {
    pub fn new() -> Self {
        Self {
            scalable: BrickKind::new("ScalableBrick", [
                (BRICK_MATERIAL, Value::Enum("Plastic".into())),
                (BRICK_COLOR, Value::UInt32(0xbcbcbcff)),
                (BRICK_SIZE, Value::Vec3(Vec3::new(30.0, 30.0, 30.0))),
            ]),
            wheel: BrickKind::new("Wheel", [
                (WHEEL_DIAMETER, Value::Float(60.0)),
                (B_DRIVEN, Value::Bool(false)),
            ]),
            seat:   BrickKind::new("Seat", [(CAMERA_NAME, Value::Text(String::new()))]),
            camera: BrickKind::new("Camera", [(OWNING_SEAT, Value::Null)]),
        }
    }

    pub fn catalog(&self) -> Catalog {
        [&self.scalable, &self.wheel, &self.seat, &self.camera]
            .into_iter()
            .cloned()
            .collect()
    }
}

// ── 原始字节流解析（只看结构，不调用编解码器）─────────────────────────────────

#[derive(Debug)]
pub struct RawColumn {
    pub key:         String,
    pub value_count: u16,
    pub total_len:   u32,
    pub values:      Vec<u8>,
    /// 页脚原样的 u16 序列（包括 0 标记）
    pub footer:      Vec<u16>,
}

#[derive(Debug)]
pub struct RawBrick {
    pub kind_index: u16,
    pub pairs:      Vec<(u16, u16)>,
    pub floats:     [f32; 6],
}

#[derive(Debug)]
pub struct RawVehicle {
    pub kinds:   Vec<String>,
    pub columns: Vec<RawColumn>,
    pub bricks:  Vec<RawBrick>,
}

impl RawVehicle {
    pub fn column(&self, key: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.key == key)
    }
    pub fn column_index(&self, key: &str) -> Option<u16> {
        self.columns.iter().position(|c| c.key == key).map(|i| i as u16)
    }
}

pub fn parse_raw(data: &[u8]) -> RawVehicle {
    let header = read_header(data).unwrap();
    let mut r = ByteReader::new(data);
    r.bytes(brv_codec::Header::SIZE).unwrap();

    let kinds = (0..header.kind_count).map(|_| r.name().unwrap()).collect();

    let mut columns = Vec::new();
    for _ in 0..header.attribute_count {
        let key         = r.name().unwrap();
        let value_count = r.u16().unwrap();
        let total_len   = r.u32().unwrap();
        let values      = r.bytes(total_len as usize).unwrap().to_vec();
        let mut footer  = Vec::new();
        if value_count > 1 {
            let first = r.u16().unwrap();
            footer.push(first);
            if first == 0 {
                for _ in 0..value_count {
                    footer.push(r.u16().unwrap());
                }
            }
        }
        columns.push(RawColumn { key, value_count, total_len, values, footer });
    }

    let mut bricks = Vec::new();
    for _ in 0..header.brick_count {
        let kind_index = r.u16().unwrap();
        let body_len   = r.u32().unwrap() as usize;
        let mut b      = ByteReader::new(r.bytes(body_len).unwrap());
        let n          = b.u8().unwrap();
        let pairs      = (0..n).map(|_| (b.u16().unwrap(), b.u16().unwrap())).collect();
        let mut floats = [0f32; 6];
        for f in &mut floats {
            *f = b.f32().unwrap();
        }
        bricks.push(RawBrick { kind_index, pairs, floats });
    }
    assert_eq!(r.remaining(), 0);

    RawVehicle { kinds, columns, bricks }
}
