pub mod control_type;
pub mod element_model;
pub mod identity;
pub mod ids;

pub use element_model::{Element, ElementData, ElementTree, NodeIndex, PatternData, PropertyValue, Rect};
