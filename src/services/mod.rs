pub mod chunk_parser;
pub mod describe;
pub mod schedule;
pub mod selector;

pub use chunk_parser::{parse_hw, parse_hw_chunk};
pub use describe::Format;
pub use schedule::Schedule;
pub use selector::{select_using_hash, selection_key};
