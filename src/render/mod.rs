//! Format-specific rendering primitives and the report dispatcher

pub mod dispatch;
pub mod table;

pub use dispatch::{is_supported, RenderFn, RendererTable};
pub use table::{
    literal, md_table, md_title_and_table, nub, rst_heading, rst_table, rst_title_and_table,
    titles, INDENT_2SPACES, INDENT_4SPACES,
};
