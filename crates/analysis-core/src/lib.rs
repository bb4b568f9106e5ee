pub mod error;
pub mod stats;
pub mod ticker;
pub mod traits;
pub mod types;

pub use error::*;
pub use ticker::normalize_ticker;
pub use traits::*;
pub use types::*;
