//! Rule definitions, grouped by the attribute they inspect.

pub mod bounding_rectangle;
pub mod element_flags;
pub mod embedded_content;
pub mod keyboard;
pub mod localized_control_type;
pub mod name;
pub mod patterns;
pub mod structure;
