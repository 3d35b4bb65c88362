pub mod types;
pub mod cards;
pub mod error;
pub mod state;
pub mod engine;
pub mod protocol;
pub mod setup;
pub mod visibility;

mod tests;

pub use types::*;
pub use cards::{by_name, CardDefinition};
pub use engine::{Action, PromptResolution};
pub use error::EngineError;
pub use state::{CardInGame, State, StateConfig, Zone};
