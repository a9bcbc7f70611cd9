pub mod conversion;
pub mod definition;
pub mod role;

pub use conversion::*;
pub use definition::*;
pub use role::*;
