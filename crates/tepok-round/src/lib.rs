//! Round engine for Tepok.
//!
//! The [`RoundEngine`] owns all round state and every timer. It is driven
//! by events (`tap`, `pause`, `resume`, `reset`, `navigate`) and by time
//! (`advance_to`), and exposes a [`RoundSnapshot`] for presentation.
//!
//! # Key types
//!
//! - [`RoundEngine`]: the state machine; synchronous, deterministic
//! - [`RoundConfig`]: winning score and every timing constant
//! - [`Announcer`]: the speech collaborator
//! - [`EngineHandle`]: commands into an engine running on its own task
//!
//! [`RoundSnapshot`]: tepok_protocol::RoundSnapshot

mod actor;
mod announcer;
mod config;
mod engine;
mod error;

pub use actor::{spawn_engine, EngineHandle};
pub use announcer::{Announcer, SilentAnnouncer, TracingAnnouncer};
pub use config::RoundConfig;
pub use engine::RoundEngine;
pub use error::RoundError;
