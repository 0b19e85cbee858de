//! Combat systems (FixedUpdate)

pub mod damage;
pub mod effects;
pub mod grenade;
pub mod stamina;
pub mod weapon;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod damage_tests;
#[cfg(test)]
mod stamina_tests;
#[cfg(test)]
mod weapon_tests;

// Re-export all systems
pub use damage::*;
pub use effects::*;
pub use grenade::*;
pub use stamina::*;
pub use weapon::*;
