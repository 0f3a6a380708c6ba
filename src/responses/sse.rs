use astra::{Body, ResponseBuilder};
use std::io::{self, Read};
use std::iter;

use crate::errors::{ResultResp, ServerError};
use crate::notify::Subscription;
use crate::responses::json::with_cors;

const CONNECTED: &str = ": connected\n\n";

/// Turns a sequence of text frames into a byte stream. Each `read` hands
/// out what is left of the current frame and only pulls the next frame
/// once that is drained, so a reader never waits on more than one frame.
pub struct FrameReader<I> {
    frames: I,
    current: Vec<u8>,
    pos: usize,
}

impl<I> FrameReader<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(frames: I) -> Self {
        Self {
            frames,
            current: Vec::new(),
            pos: 0,
        }
    }
}

impl<I> Read for FrameReader<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.pos >= self.current.len() {
            match self.frames.next() {
                Some(frame) => {
                    self.current = frame?.into_bytes();
                    self.pos = 0;
                }
                None => return Ok(0),
            }
        }

        let n = buf.len().min(self.current.len() - self.pos);
        buf[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Long-lived `text/event-stream` response fed by one subscription. The
/// stream ends when the client goes away and the write fails.
pub fn event_stream(subscription: Subscription) -> ResultResp {
    let frames = iter::once(Ok(CONNECTED.to_string())).chain(subscription);

    with_cors(ResponseBuilder::new())
        .status(200)
        .header("Content-Type", "text/event-stream")
        .header("Cache-Control", "no-cache")
        .body(Body::wrap_reader(FrameReader::new(frames)))
        .map_err(|_| ServerError::InternalError)
}
