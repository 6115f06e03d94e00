use std::fmt::Display;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use crate::domain::completion::CompletionChunk;
use crate::error::{AppError, AppResult, Service};

/// Lazily decodes a newline-delimited JSON completion stream.
///
/// Lines may be split across transport frames. Once the final chunk has been
/// yielded the underlying stream is never polled again, even if it still holds data.
pub struct ChunkStream<S> {
    inner: S,
    buffer: Vec<u8>,
    // Bytes of `buffer` already known to hold no newline.
    scanned: usize,
    exhausted: bool,
    finished: bool,
}

#[derive(Deserialize)]
struct WireChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

impl<S, E> ChunkStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            scanned: 0,
            exhausted: false,
            finished: false,
        }
    }

    pub async fn next_chunk(&mut self) -> AppResult<Option<CompletionChunk>> {
        if self.finished {
            return Ok(None);
        }

        loop {
            if let Some(line) = self.take_line() {
                if is_blank(&line) {
                    continue;
                }
                return self.emit(&line).map(Some);
            }

            if self.exhausted {
                self.finished = true;
                let rest = std::mem::take(&mut self.buffer);
                if is_blank(&rest) {
                    return Ok(None);
                }
                return self.emit(&rest).map(Some);
            }

            match self.inner.next().await {
                Some(Ok(frame)) => self.buffer.extend_from_slice(&frame),
                Some(Err(err)) => {
                    self.finished = true;
                    return Err(AppError::transport(
                        Service::CompletionService,
                        format!("error reading stream: {err}"),
                    ));
                }
                None => self.exhausted = true,
            }
        }
    }

    /// Concatenates every chunk up to and including the final one.
    /// Returns the text together with the number of chunks consumed.
    pub async fn collect_text(mut self) -> AppResult<(String, usize)> {
        let mut text = String::new();
        let mut chunks = 0;
        while let Some(chunk) = self.next_chunk().await? {
            text.push_str(&chunk.text);
            chunks += 1;
        }
        Ok((text, chunks))
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let Some(offset) = self.buffer[self.scanned..]
            .iter()
            .position(|byte| *byte == b'\n')
        else {
            self.scanned = self.buffer.len();
            return None;
        };
        let end = self.scanned + offset;
        self.scanned = 0;
        let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    fn emit(&mut self, line: &[u8]) -> AppResult<CompletionChunk> {
        let chunk = decode_line(line).inspect_err(|_| self.finished = true)?;
        if chunk.is_final {
            self.finished = true;
        }
        Ok(chunk)
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn decode_line(line: &[u8]) -> AppResult<CompletionChunk> {
    let text = std::str::from_utf8(line).map_err(|err| {
        AppError::decode(
            Service::CompletionService,
            format!("chunk is not valid UTF-8: {err}"),
        )
    })?;
    let wire: WireChunk = serde_json::from_str(text).map_err(|err| {
        AppError::decode(
            Service::CompletionService,
            format!("failed to unmarshal chunk: {err}"),
        )
    })?;
    if let Some(error) = wire.error {
        return Err(AppError::decode(
            Service::CompletionService,
            format!("stream reported an error: {error}"),
        ));
    }
    Ok(CompletionChunk::new(wire.response, wire.done))
}
