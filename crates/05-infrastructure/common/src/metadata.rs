//! 元数据定义
//!
//! 提供服务类型的身份标识

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型标识
///
/// 在注册时为每个类型分配的稳定、可比较的标识。
/// 既可以标识具体类型，也可以标识 `dyn Trait` 这样的抽象类型。
/// 相等性、哈希和排序只依赖 [`TypeId`]，名称仅用于错误信息和日志。
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// 从类型获取类型标识
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// 类型ID
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// 完整类型名称（包含模块路径）
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 获取简短的类型名称（不包含模块路径）
    ///
    /// 抽象类型保留 `dyn ` 前缀，以便与同名的具体类型区分。
    pub fn short_name(&self) -> String {
        match self.name.strip_prefix("dyn ") {
            Some(rest) => format!("dyn {}", strip_path(rest)),
            None => strip_path(self.name).to_string(),
        }
    }

    /// 是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// 去掉最外层类型的模块路径，泛型参数保持原样
fn strip_path(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    match base.rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    }
}

/// 把一组类型标识格式化为 `A, B, C`
pub fn join_type_names<'a>(keys: impl IntoIterator<Item = &'a TypeKey>) -> String {
    keys.into_iter()
        .map(|key| key.short_name())
        .collect::<Vec<_>>()
        .join(", ")
}
