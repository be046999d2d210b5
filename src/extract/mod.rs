pub mod fields;
pub mod specs;

pub use fields::{Parsed, extract_attribute, extract_text, parse_price};
pub use specs::derive_specs;
