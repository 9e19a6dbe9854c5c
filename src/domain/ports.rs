use crate::domain::model::Category;
use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Human-readable location of `path`, used in reports and logs.
    fn describe(&self, path: &str) -> String;
}

/// One category's attribute record.
pub trait AttributeSet {
    const CATEGORY: Category;

    /// Wire names of every attribute, in the order the scaffolding tool emits them.
    const ATTRIBUTES: &'static [&'static str];

    fn get(&self, name: &str) -> Option<&str>;
}
