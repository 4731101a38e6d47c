//! Writer and JSON bridge for SWON.
//!
//! This crate turns a [`Value`](swon_tree::Value) tree back into SWON text
//! and provides the lexical JSON to SWON bridge, independent of any
//! serialization framework.
//!
//! ```
//! use swon_format::{FormatOptions, format_value};
//!
//! let value = swon_tree::parse(r#"["b": [1, 2], "a": nil]"#).unwrap();
//! let text = format_value(&value, &FormatOptions::new().compact().sort_keys(true));
//! assert_eq!(text, r#"["a":nil,"b":[1,2]]"#);
//! ```

mod bridge;
mod options;
mod scalar;
mod value_format;
mod writer;

pub use bridge::json_to_swon;
pub use options::FormatOptions;
pub use scalar::{count_escapes, escape_string, format_float};
pub use value_format::{format_value, format_value_default};
pub use writer::SwonWriter;
