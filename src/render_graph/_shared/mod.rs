mod params;
mod ring_index;

pub use self::params::*;
pub use self::ring_index::*;
