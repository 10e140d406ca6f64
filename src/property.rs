//! 游戏内置属性名

// ── 外观 ──────────────────────────────────────────────────────────────────────
pub const BRICK_COLOR:      &str = "BrickColor";
pub const BRICK_MATERIAL:   &str = "BrickMaterial";
pub const BRICK_PATTERN:    &str = "BrickPattern";
pub const BRICK_SIZE:       &str = "BrickSize";
pub const CONNECTOR_SPACING: &str = "ConnectorSpacing";
pub const B_FLUID_DYNAMIC:  &str = "bGenerateLift";

// ── 车轴 / 车轮 ───────────────────────────────────────────────────────────────
pub const B_CAN_DISABLE_STEERING: &str = "bCanDisableSteering";
pub const B_CAN_INVERT_STEERING:  &str = "bCanInvertSteering";
pub const B_DRIVEN:               &str = "bDriven";
pub const B_HAS_BRAKE:            &str = "bHasBrake";
pub const B_HAS_HANDBRAKE:        &str = "bHasHandBrake";
pub const B_INVERT_DRIVE:         &str = "bInvertDrive";
pub const B_INVERT_TANK_STEERING: &str = "bInvertTankSteering";
pub const B_TANK_DRIVE:           &str = "bTankDrive";
pub const BRAKE_STRENGTH:         &str = "BrakeStrength";
pub const GEAR_RATIO:             &str = "GearRatioScale";
pub const SUSPENSION_LENGTH:      &str = "SuspensionLength";
pub const SUSPENSION_STIFFNESS:   &str = "SuspensionStiffness";
pub const SUSPENSION_DAMPING:     &str = "SuspensionDamping";
pub const TIRE_PRESSURE:          &str = "TirePressureRatio";
pub const TIRE_WIDTH:             &str = "TireThickness";
pub const WHEEL_DIAMETER:         &str = "WheelDiameter";
pub const WHEEL_WIDTH:            &str = "WheelWidth";

// ── 执行器 ────────────────────────────────────────────────────────────────────
pub const ACTUATOR_MODE: &str = "ActuatorMode";
pub const MIN_LIMIT:     &str = "MinLimit";
pub const MAX_LIMIT:     &str = "MaxLimit";
pub const COUPLING_MODE: &str = "CouplingMode";

// ── 杂项 ──────────────────────────────────────────────────────────────────────
pub const CAMERA_NAME:           &str = "CameraName";
pub const DISPLAY_COLOR:         &str = "DisplayColor";
pub const NUM_FRACTIONAL_DIGITS: &str = "NumFractionalDigits";
pub const EXHAUST_EFFECT:        &str = "ExhaustEffect";
pub const SMOKE_COLOR:           &str = "SmokeColor";
pub const SIZE_SCALE:            &str = "SizeScale";
pub const SPAWN_SCALE:           &str = "SpawnScale";
pub const HORN_PITCH:            &str = "HornPitch";
pub const SIREN_TYPE:            &str = "SirenType";
pub const OWNING_SEAT:           &str = "OwningSeat";

// ── 输入通道 ──────────────────────────────────────────────────────────────────

/// 带输入通道的属性组前缀；每组有 `.InputAxis` / `.SourceBricks` / `.Value` 三个子属性
pub const INPUT_CHANNELS: [&str; 4] = [
    "InputChannel",
    "BrakeInputChannel",
    "SteeringInputChannel",
    "ThrottleInputChannel",
];

pub const INPUT_AXIS_SUFFIX:    &str = "InputAxis";
pub const SOURCE_BRICKS_SUFFIX: &str = "SourceBricks";
pub const VALUE_SUFFIX:         &str = "Value";

/// `InputChannel` + `SourceBricks` → `InputChannel.SourceBricks`
pub fn channel_key(channel: &str, suffix: &str) -> String {
    format!("{channel}.{suffix}")
}
