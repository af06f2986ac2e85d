//! Configuration types
//!
//! The display descriptor and the capability tables it is checked against.
//! With the `serde` feature the descriptor can be stored as postcard binary
//! data.

pub mod bus;
pub mod driver;
pub mod fonts;
pub mod target;
pub mod types;

pub use bus::*;
pub use driver::*;
pub use fonts::*;
pub use target::*;
pub use types::*;
