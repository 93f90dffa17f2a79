use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::message::{Request, Response};
use crate::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Outcome of decoding one message. Malformed input is a value, not an error, so that the
/// caller can always answer it.
#[derive(Debug, PartialEq)]
pub enum Decoded {
    Request(Request),
    Invalid,
}

/// JSON codec for the one-message-per-connection protocol.
///
/// There is no delimiter or length prefix: whatever is in the buffer when `decode` is called is
/// the whole message.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageCodec;

impl MessageCodec {
    pub fn parse(src: &[u8]) -> Decoded {
        let src = src.strip_prefix(UTF8_BOM).unwrap_or(src);

        match serde_json::from_slice::<Request>(src) {
            Ok(request) => Decoded::Request(request),
            Err(e) => {
                debug!("Failed to decode request: {}", e);
                Decoded::Invalid
            }
        }
    }
}

impl Decoder for MessageCodec {
    type Item = Decoded;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        // The message owns everything received so far.
        let message = src.split();

        Ok(Some(MessageCodec::parse(&message)))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // A peer that sent nothing still gets an answer.
        match self.decode(src)? {
            Some(decoded) => Ok(Some(decoded)),
            None => Ok(Some(Decoded::Invalid)),
        }
    }
}

impl<'a> Encoder<&'a Response> for MessageCodec {
    type Error = Error;

    fn encode(&mut self, item: &'a Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        serde_json::to_writer(dst.writer(), item)?;
        Ok(())
    }
}
