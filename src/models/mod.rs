pub mod raw;
pub mod segment;
pub mod transcript;

pub use raw::*;
pub use segment::*;
pub use transcript::*;
