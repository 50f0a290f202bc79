//! Numbers markdown chapters and rebuilds their outline from a flat run of headers.

mod builder;
mod header;
mod index;

pub use builder::{Chapter, LevelSkip, Outline, OutlineBuilder, Scan};
pub use header::{detect_header, split_number_prefix, strip_number_prefix, HeaderLine};
pub use index::ChapterIndex;
