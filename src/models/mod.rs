pub mod catalog;
pub mod group;
pub mod homework;
pub mod loaders;
pub mod problem;
pub mod roster;
pub mod term;

pub use catalog::Catalog;
pub use group::{Chunk, FlagGroup, FlagSet, IndividualizationGroup};
pub use homework::{Note, ParsedStream, RawStream};
pub use problem::{ProblemKey, ProblemNumber, ProblemRef};
pub use roster::{fake_roster, Gradebook, Roster, Student};
pub use term::{Semester, Term};
