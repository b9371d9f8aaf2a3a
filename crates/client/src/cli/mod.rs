pub mod args;
pub mod logging;
pub mod op;
pub mod ops;

pub use ops::{Dir, File, Init, Size, Watch};
