//! Output formatting for race outcomes

pub mod console;
pub mod formatter;
