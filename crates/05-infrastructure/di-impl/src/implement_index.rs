//! 实现索引
//!
//! 抽象类型到其具体实现列表的只读映射，每次构建容器时生成一次

use crate::service_list::Registry;
use infrastructure_common::TypeKey;
use std::collections::HashMap;

/// 实现索引
#[derive(Debug, Default)]
pub struct ImplementIndex {
    implementors: HashMap<TypeKey, Vec<TypeKey>>,
}

impl ImplementIndex {
    /// 按注册顺序遍历所有描述符生成索引
    pub fn build(registry: &Registry) -> Self {
        let mut implementors: HashMap<TypeKey, Vec<TypeKey>> = HashMap::new();

        for desc in registry.descriptors() {
            for implemented in desc.implements() {
                implementors.entry(implemented).or_default().push(desc.key());
            }
        }

        Self { implementors }
    }

    /// 获取抽象类型的所有实现
    pub fn implementors(&self, key: &TypeKey) -> Option<&[TypeKey]> {
        self.implementors.get(key).map(Vec::as_slice)
    }

    /// 抽象类型数量
    pub fn len(&self) -> usize {
        self.implementors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.implementors.is_empty()
    }
}
