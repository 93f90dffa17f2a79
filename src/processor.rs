use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::codec::{Decoded, MessageCodec};
use crate::message::Response;
use crate::methods::executable::Executable;
use crate::methods::{Method, MethodError};
use crate::Error;

/// Maps a decoded message to the response the client should receive.
///
/// Never fails: undecodable input, validation failures and unknown methods all become error
/// responses.
pub fn respond_to(decoded: Decoded) -> Response {
    let request = match decoded {
        Decoded::Request(request) => request,
        Decoded::Invalid => return MethodError::InvalidFormat.into(),
    };

    let method = match Method::try_from(request) {
        Ok(method) => method,
        Err(e) => {
            debug!(error = ?e, "Rejected request");
            return e.into();
        }
    };

    method.exec().unwrap_or_else(Response::from)
}

pub fn respond(src: &[u8]) -> Response {
    respond_to(MessageCodec::parse(src))
}

/// Decodes everything in `src` as one message, dispatches it, and returns the encoded response.
///
/// The only error is a failure to serialize the response.
pub fn process(src: &mut BytesMut) -> Result<BytesMut, Error> {
    let mut codec = MessageCodec;

    let decoded = codec.decode_eof(src)?.unwrap_or(Decoded::Invalid);
    let response = respond_to(decoded);

    let mut dst = BytesMut::new();
    codec.encode(&response, &mut dst)?;

    Ok(dst)
}
