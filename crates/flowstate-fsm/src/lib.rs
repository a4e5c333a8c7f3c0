//! Flowstate FSM
//!
//! This crate provides the state machine execution engine for flowstate.
//! A state machine is a set of named states, a start state and a transition
//! budget. An execution walks the machine from the start state until a state
//! returns [`END_STATE`], evaluating branch conditions against the
//! execution's JSON data.
//!
//! # Architecture
//!
//! ```text
//! StateMachine
//! └── execute(execution) -> END_STATE
//!     └── State::execute(execution) -> next state id
//!         ├── Pass       - returns next
//!         ├── WaitDelay  - sleeps, returns next
//!         └── Choice     - first branch whose Choice holds, else default
//!             └── Choice::evaluate(execution) -> bool
//!                 ├── Base - path::extract + Operator::evaluate
//!                 └── And / Or / Not
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use flowstate_fsm::{Execution, StateMachine};
//!
//! let machine = StateMachine::from_json(&definition)?;
//! let execution = Execution::from_input(r#"{"kind": "express"}"#)?;
//! let terminal = machine.execute(&execution).await?;
//! ```

mod choice;
mod definition;
mod error;
mod events;
mod execution;
mod machine;
mod operator;
pub mod path;
mod state;

pub use choice::{BaseChoice, Choice};
pub use error::FsmError;
pub use events::{
  ChannelNotifier, CollectingNotifier, ExecutionEvent, ExecutionNotifier, NoopNotifier, StateKind,
};
pub use execution::Execution;
pub use machine::{StateMachine, UnresolvedTarget};
pub use operator::Operator;
pub use state::{ChoiceBranch, ChoiceState, END_STATE, PassState, State, WaitDelayState};
