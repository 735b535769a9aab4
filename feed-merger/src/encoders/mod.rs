pub mod json;
pub mod rss;

pub use json::{decode_structured, encode_structured};
pub use rss::{encode_rss, PREVIEW_CHARS};
