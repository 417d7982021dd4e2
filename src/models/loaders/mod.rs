pub mod file_loader;

pub use file_loader::{
    load_catalog, load_optional_text, load_parsed_streams, load_raw_streams, load_roster, load_solution_sources,
    read_text, write_text,
};
