pub mod enums;
pub mod marker;
pub mod record;

pub use enums::*;
pub use marker::*;
pub use record::*;
