//! 积木种类（Kind）描述与种类目录
//!
//! 种类是不可变模板：名字 + 默认属性表。两块积木是否同种由 `Arc` 身份决定，
//! 不是按名字比较；同名但不同实例的两个种类在文件中占两个种类槽位。

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

// ── BrickKind ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct BrickKind {
    name:     String,
    /// 属性名 → 默认值（保持声明顺序）
    defaults: IndexMap<String, Value>,
}

impl BrickKind {
    pub fn new<I, K>(name: &str, defaults: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Arc::new(Self {
            name:     name.into(),
            defaults: defaults.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        })
    }

    /// 没有任何默认属性的种类（解码时遇到目录外的种类名使用）
    pub fn bare(name: &str) -> Arc<Self> {
        Self::new(name, std::iter::empty::<(String, Value)>())
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn defaults(&self) -> &IndexMap<String, Value> { &self.defaults }
    pub fn default_of(&self, key: &str) -> Option<&Value> { self.defaults.get(key) }
}

// ── KindCatalog ───────────────────────────────────────────────────────────────

/// 种类名 → 种类实例的查找表，由调用方在进程启动时构建
pub trait KindCatalog {
    fn kind(&self, name: &str) -> Option<Arc<BrickKind>>;
}

#[derive(Debug, Default, Clone)]
pub struct Catalog {
    kinds: HashMap<String, Arc<BrickKind>>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, kind: Arc<BrickKind>) -> &mut Self {
        self.kinds.insert(kind.name().to_owned(), kind);
        self
    }

    pub fn len(&self) -> usize { self.kinds.len() }
    pub fn is_empty(&self) -> bool { self.kinds.is_empty() }
}

impl FromIterator<Arc<BrickKind>> for Catalog {
    fn from_iter<T: IntoIterator<Item = Arc<BrickKind>>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for kind in iter { catalog.insert(kind); }
        catalog
    }
}

impl KindCatalog for Catalog {
    fn kind(&self, name: &str) -> Option<Arc<BrickKind>> {
        self.kinds.get(name).cloned()
    }
}
