//! 深度链接的推导与更新
//!
//! 数据流：文档 → 提取参数 → 清洗 → 构建链接 → 协调写回

mod builder;
mod coordinator;
mod document;
mod extractor;
mod params;

pub use builder::{LinkBuilder, LinkMode, query_string};
pub use coordinator::{
    ChangeSink, FieldOptions, FieldState, LinkStatus, LinkUpdateCoordinator, PatchEvent,
    SHORT_LINK_THRESHOLD, UpdateOutcome,
};
pub use document::Document;
pub use extractor::{AsyncFnExtractor, FieldMappingExtractor, FnExtractor, ParamExtractor};
pub use params::{ALIAS_KEY, DATA_KEY, LinkParams, sanitize};
