pub mod analysis;
pub mod benchmark;
pub mod error;
pub mod ratios;
pub mod record;
pub mod scores;
pub mod traits;

pub use analysis::*;
pub use benchmark::*;
pub use error::*;
pub use ratios::*;
pub use record::*;
pub use scores::*;
pub use traits::*;
