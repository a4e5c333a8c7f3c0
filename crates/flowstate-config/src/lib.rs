//! Flowstate Config
//!
//! This crate contains the serializable state machine definition types for
//! flowstate. These types describe a state machine before it is loaded into
//! the engine's runtime structures.
//!
//! Definitions are plain JSON documents:
//!
//! ```json
//! {
//!   "start_at": "route",
//!   "max_execution": 50,
//!   "states": {
//!     "route": {
//!       "type": "choice",
//!       "choices": [
//!         {
//!           "condition": { "string_equals": { "variable": "$.kind", "value": "express" } },
//!           "next": "ship"
//!         }
//!       ],
//!       "default": "hold"
//!     },
//!     "hold": { "type": "wait", "delay_ms": 250, "next": "ship" },
//!     "ship": { "type": "pass", "next": "EndState" }
//!   }
//! }
//! ```
//!
//! The engine (`flowstate-fsm`) converts a [`StateMachineDef`] into a runnable
//! state machine. No graph validation happens at this layer.

mod condition;
mod machine;
mod state;

pub use condition::ConditionDef;
pub use machine::StateMachineDef;
pub use state::{ChoiceRuleDef, StateDef};
