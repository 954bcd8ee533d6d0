pub mod measurement;
pub mod monitor;
pub mod sensor;

pub use measurement::*;
pub use monitor::*;
pub use sensor::*;
