pub mod check_upkeep;
pub mod enter;
pub mod fulfill_randomness;
pub mod initialize;
#[cfg(feature = "devnet")]
pub mod mock_fulfill_randomness;
pub mod perform_upkeep;

pub use check_upkeep::*;
pub use enter::*;
pub use fulfill_randomness::*;
pub use initialize::*;
#[cfg(feature = "devnet")]
pub use mock_fulfill_randomness::*;
pub use perform_upkeep::*;
