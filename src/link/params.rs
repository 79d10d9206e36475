//! 链接参数与清洗
//!
//! 参数形状与 Branch 的 DeepLinkData 一致：顶层为 channel / feature /
//! alias / type 等字段，自定义键值放在嵌套的 `data` 对象中。
//! 所有映射都保持插入顺序。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 嵌套参数对象的键
pub const DATA_KEY: &str = "data";
/// 自定义短链接别名的键
pub const ALIAS_KEY: &str = "alias";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkParams {
    fields: Map<String, Value>,
}

impl LinkParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置顶层参数
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// 设置 `data` 中的参数
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert_data(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// 写入 `data`；`data` 不存在或不是对象时会被替换为新对象
    pub fn insert_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let entry = self
            .fields
            .entry(DATA_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(data) = entry {
            data.insert(key.into(), value.into());
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// 嵌套的 `data` 对象
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.fields.get(DATA_KEY).and_then(Value::as_object)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for LinkParams {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// 清洗参数，返回新的副本
///
/// - 删除顶层值为 `""` 或 `null` 的条目；`data` 内部的值原样保留
/// - 非空的 `data.alias` 移到顶层 `alias`，并从 `data` 中删除
pub fn sanitize(raw: &LinkParams) -> LinkParams {
    let mut params = raw.clone();
    params.fields.retain(|_, value| !is_blank(value));

    // Branch SDK 只认顶层的 alias
    let hoisted = match params.fields.get_mut(DATA_KEY) {
        Some(Value::Object(data)) if data.get(ALIAS_KEY).is_some_and(|v| !is_blank(v)) => {
            data.shift_remove(ALIAS_KEY)
        }
        _ => None,
    };
    if let Some(alias) = hoisted {
        params.fields.insert(ALIAS_KEY.to_string(), alias);
    }

    params
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
