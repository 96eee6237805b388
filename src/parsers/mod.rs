pub mod title;

#[cfg(test)]
mod tests;

pub use title::{extract_title, normalize_whitespace, title_from_stream};
