//! Combat components

pub mod grenade;
pub mod stamina;
pub mod weapon;


// Re-export all components
pub use grenade::*;
pub use stamina::*;
pub use weapon::*;
