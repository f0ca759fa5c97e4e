//! Gateway events
//!
//! - catalogue.rs: the discriminator table, [`Event`] and [`EventKind`]
//! - types.rs: typed payloads
//! - decode.rs: frame text to [`Event`]
//! - frame.rs: fragment reassembly
//! - source.rs: where fragments come from (WebSocket or in-memory)

mod catalogue;
mod decode;
mod frame;
mod source;
mod types;

pub use catalogue::{Event, EventKind};
pub use decode::{decode_command, decode_event};
pub use frame::{Fragment, FrameAssembler};
pub use source::{
    channel_source, ChannelSource, FrameSender, FrameSource, StreamConnector, WebSocketConnector,
    WebSocketSource,
};
pub use types::*;
