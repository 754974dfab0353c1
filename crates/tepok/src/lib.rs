//! # Tepok
//!
//! Two-player reflex card game engine. A rank is called out once per
//! second; the first player to tap while the dealt card matches the call
//! scores and a wrong tap costs a point. A wrong tap with no points to
//! lose freezes the tapper instead. First to the winning score takes the
//! round.
//!
//! This crate re-exports the workspace so a host only needs one
//! dependency and one error type.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tepok::prelude::*;
//!
//! # async fn run() -> Result<(), TepokError> {
//! let engine = RoundEngine::new(RoundConfig::default(), TracingAnnouncer);
//! let handle = spawn_engine(engine);
//!
//! handle.navigate(Screen::Playing).await?;
//! let snap = handle.snapshot().await?;
//! println!("{}", snap.countdown_label());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod telemetry;

pub use error::TepokError;

pub use tepok_clock as clock;
pub use tepok_protocol as protocol;
pub use tepok_round as round;

pub mod prelude {
    //! Everything a host needs to drive a round.

    pub use crate::TepokError;
    pub use tepok_protocol::{
        tutorial_pages, Card, Codec, Phase, Player, Rank, RoundSnapshot, Screen, Suit,
        TapOutcome, TapVerdict, TutorialPage,
    };
    #[cfg(feature = "json")]
    pub use tepok_protocol::JsonCodec;
    pub use tepok_round::{
        spawn_engine, Announcer, EngineHandle, RoundConfig, RoundEngine, SilentAnnouncer,
        TracingAnnouncer,
    };
}
