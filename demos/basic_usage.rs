//! # brv-codec 使用案例
//!
//! 演示编解码的完整流程：
//!
//! 1. 构建注册表与种类目录
//! 2. 搭一座金字塔形的缩放积木载具
//! 3. 序列化并写入 .brv 文件
//! 4. 只读文件头
//! 5. 完整解码并核对
//! 6. 旧格式版本下的版本门控

use brv_codec::{
    common::{FILE_LEGACY_VERSION, FILE_MAIN_VERSION},
    property::{BRICK_COLOR, BRICK_MATERIAL, BRICK_SIZE},
    read_header, Brick, BrickKind, Catalog, CodecRegistry, Value, Vec3, Vehicle,
};

const PYRAMID_SIZE: usize = 11;
/// 每层高度，单位 cm
const STEP_SIZE: f32 = 60.0;

fn main() -> brv_codec::Result<()> {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════════");
    println!("   brv-codec 演示                                          ");
    println!("═══════════════════════════════════════════════════════════\n");

    // =========================================================================
    // 1. 注册表与种类目录
    // =========================================================================
    println!("【1】构建内置注册表与种类目录 ...");
    let registry = CodecRegistry::builtin();
    let scalable = BrickKind::new("ScalableBrick", [
        (BRICK_MATERIAL, Value::Enum("Plastic".into())),
        (BRICK_COLOR,    Value::UInt32(0xbcbcbcff)),
        (BRICK_SIZE,     Value::Vec3(Vec3::new(30.0, 30.0, 30.0))),
    ]);
    let catalog: Catalog = [scalable.clone()].into_iter().collect();
    println!("    已注册属性 {} 个\n", registry.len());

    // =========================================================================
    // 2. 金字塔
    // =========================================================================
    println!("【2】搭建 {PYRAMID_SIZE} 层金字塔 ...");
    let mut vehicle = Vehicle::new(FILE_MAIN_VERSION);
    for i in 0..PYRAMID_SIZE {
        let width = STEP_SIZE * (PYRAMID_SIZE - i) as f32;
        let pos_z = STEP_SIZE * (i as f32 + 0.5);
        vehicle.add(
            Brick::new(format!("layer_{i}"), scalable.clone())
                .with_pos(Vec3::new(0.0, 0.0, pos_z))
                .with_property(BRICK_COLOR, Value::UInt32(0xff3f00ff))
                .with_property(BRICK_SIZE, Vec3::new(width, width, STEP_SIZE)),
        );
    }
    println!("    积木数 = {}\n", vehicle.brick_count());

    // =========================================================================
    // 3. 序列化
    // =========================================================================
    println!("【3】序列化 ...");
    let bytes = vehicle.serialize(&registry)?;
    let path  = std::env::temp_dir().join("Vehicle.brv");
    std::fs::write(&path, &bytes)?;
    println!("    {} 字节 → {}\n", bytes.len(), path.display());

    // =========================================================================
    // 4. 文件头
    // =========================================================================
    println!("【4】读取文件头 ...");
    let header = read_header(&bytes)?;
    println!(
        "    版本 = {}, 积木 = {}, 种类 = {}, 属性 = {}\n",
        header.version, header.brick_count, header.kind_count, header.attribute_count,
    );

    // =========================================================================
    // 5. 解码
    // =========================================================================
    println!("【5】解码并核对 ...");
    let data    = std::fs::read(&path)?;
    let decoded = Vehicle::deserialize(&data, &registry, &catalog)?;
    for brick in decoded.bricks.iter().take(3) {
        println!(
            "    {:<8} pos = {}  size = {}  material = {}",
            brick.id, brick.pos,
            brick.get_property(BRICK_SIZE)?,
            brick.get_property(BRICK_MATERIAL)?,
        );
    }
    println!("    ...");
    assert_eq!(decoded.serialize(&registry)?, bytes);
    println!("    ✓ 再编码字节一致\n");

    // =========================================================================
    // 6. 版本门控
    // =========================================================================
    println!("【6】以旧格式版本 {FILE_LEGACY_VERSION} 写出 ...");
    vehicle.version = FILE_LEGACY_VERSION;
    let legacy = vehicle.serialize(&registry)?;
    println!(
        "    {} 字节, 属性 = {}（{BRICK_COLOR} 被省略）",
        legacy.len(), read_header(&legacy)?.attribute_count,
    );

    Ok(())
}
