/// Network Layer - Call Transport
///
/// Frames the call protocol over TCP: 4-byte length prefix per frame
/// (tokio-util `LengthDelimitedCodec`), JSON payloads.
///
/// ## Modules
/// - `codec`: encode/decode between frames and protocol types
/// - `server`: accept loop and per-connection request/response handling

pub mod codec;
pub mod server;

pub use codec::{CodecError, JsonCodec, WireCodec};
pub use server::run_server;
