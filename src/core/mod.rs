pub mod checker;
pub mod document;

pub use crate::domain::model::{InstanceNames, ResourceAttributes, ShapeReport};
pub use crate::domain::ports::{AttributeSet, Storage};
pub use crate::utils::error::Result;
