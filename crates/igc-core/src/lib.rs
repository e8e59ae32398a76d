pub mod parser;
pub mod spatial;
pub mod track;

pub use parser::{parse, ParseError};
pub use spatial::haversine_km;
pub use track::{Fix, Point, Task, Track};
