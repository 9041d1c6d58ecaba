pub mod error;
pub mod event;
pub mod step;
pub mod types;
pub mod value;

pub use error::VnError;
pub use event::*;
pub use step::*;
pub use types::*;
pub use value::*;
