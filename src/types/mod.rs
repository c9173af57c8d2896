pub mod deployment;
pub mod host;
pub mod release;

pub use deployment::*;
pub use host::*;
pub use release::*;
