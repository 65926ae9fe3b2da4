//! PDF report: a pure layout pass followed by rendering with `printpdf`.

pub mod layout;
mod render;

pub use layout::{ReportLayout, PAGE_BREAK_LIMIT_MM};
pub use render::render;
