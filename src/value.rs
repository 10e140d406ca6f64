//! 属性值（运行时表示）与三维向量

/// 单精度三维向量；积木的位置、旋转与尺寸都用它表示
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self { Self { x, y, z } }
    pub fn as_array(self) -> [f32; 3] { [self.x, self.y, self.z] }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self { Self { x, y, z } }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// 属性补丁中的值
///
/// 除 `List` 外的变体都可以驻留进字典：字典以编解码器输出的字节为键，
/// 因此 `Float` 等不可哈希的 Rust 类型也能参与去重。`List` 是可变序列，
/// 只能作为中间结果存在，写入补丁后会在编码时报 `UnhashableValue`；
/// 引用列表请用定长的 `Refs`。
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 未设置：编码时跳过，按种类默认值处理
    Null,
    Bool(bool),
    /// 枚举名（ASCII）
    Enum(String),
    Float(f32),
    Int8(i8),
    UInt16(u16),
    /// 24 位无符号整数（颜色），高 8 位忽略
    UInt24(u32),
    UInt32(u32),
    /// 用户输入文本，可含非 ASCII 字符
    Text(String),
    /// 指向另一块积木的标识
    Ref(String),
    /// 指向多块积木的标识序列
    Refs(Box<[String]>),
    Vec3(Vec3),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null      => "null",
            Self::Bool(_)   => "bool",
            Self::Enum(_)   => "enum",
            Self::Float(_)  => "float32",
            Self::Int8(_)   => "int8",
            Self::UInt16(_) => "uint16",
            Self::UInt24(_) => "uint24",
            Self::UInt32(_) => "uint32",
            Self::Text(_)   => "text",
            Self::Ref(_)    => "ref",
            Self::Refs(_)   => "refs",
            Self::Vec3(_)   => "vec3",
            Self::List(_)   => "list",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

    /// 该值引用到的所有积木标识
    pub fn references(&self) -> impl Iterator<Item = &str> {
        let refs: &[String] = match self {
            Self::Ref(r)  => std::slice::from_ref(r),
            Self::Refs(r) => &r[..],
            _             => &[],
        };
        refs.iter().map(String::as_str)
    }

    pub fn refs<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Refs(ids.into_iter().map(Into::into).collect())
    }
}

impl From<bool> for Value { fn from(v: bool) -> Self { Self::Bool(v) } }
impl From<f32>  for Value { fn from(v: f32)  -> Self { Self::Float(v) } }
impl From<Vec3> for Value { fn from(v: Vec3) -> Self { Self::Vec3(v) } }

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null      => write!(f, "NULL"),
            Self::Bool(v)   => write!(f, "{v}"),
            Self::Enum(v)   => write!(f, "{v}"),
            Self::Float(v)  => write!(f, "{v}"),
            Self::Int8(v)   => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt24(v) => write!(f, "#{v:06x}"),
            Self::UInt32(v) => write!(f, "#{v:08x}"),
            Self::Text(v)   => write!(f, "{v:?}"),
            Self::Ref(v)    => write!(f, "&{v}"),
            Self::Refs(v)   => write!(f, "&[{}]", v.join(", ")),
            Self::Vec3(v)   => write!(f, "{v}"),
            Self::List(v)   => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
