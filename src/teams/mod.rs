pub mod registry;

pub use registry::{Team, TeamRegistry};
