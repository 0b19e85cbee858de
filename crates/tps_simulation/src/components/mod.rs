//! ECS Components персонажа
//!
//! Организация по доменам:
//! - actor: Character, Health, Shield, ControlState, death анимации
//! - movement: intents, режим движения, скорости, курсор
//! - attachment: модель оружия на сокете
//! - effects: status effects и тип поверхности

pub mod actor;
pub mod attachment;
pub mod effects;
pub mod movement;

pub use actor::*;
pub use attachment::*;
pub use effects::*;
pub use movement::*;
