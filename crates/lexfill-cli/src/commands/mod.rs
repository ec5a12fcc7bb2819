pub mod fill;
pub mod placeholders;
pub mod render;
