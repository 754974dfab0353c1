//! Values shared between the round engine and its collaborators.
//!
//! - **Types** ([`Player`], [`Rank`], [`Suit`], [`Card`], [`Phase`],
//!   [`RoundSnapshot`], ...): what the engine exposes to presentation
//!   and speech.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how snapshots are turned
//!   into bytes for a renderer living outside the process.
//! - **Errors** ([`ProtocolError`]).
//!
//! Nothing here owns state or time; the engine produces snapshots and
//! collaborators only read them.

mod codec;
mod error;
mod snapshot;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use snapshot::{tutorial_pages, RoundSnapshot, TutorialPage};
pub use types::{Card, Phase, Player, Rank, Screen, Suit, TapOutcome, TapVerdict};
