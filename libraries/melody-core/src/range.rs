//! HTTP `Range` planning for media delivery.
//!
//! [`plan`] is pure: it decides status, byte window and headers for a
//! resource of known length. Reading the bytes is left to the caller.
//!
//! Only the single-range form `bytes=<start>-<end>` is accepted. `end` may be
//! omitted and then resolves to the last byte. Suffix ranges (`bytes=-500`)
//! and multi-range requests are rejected as malformed rather than being
//! truncated or guessed at.

use thiserror::Error;

pub const ACCEPT_RANGES: &str = "bytes";

/// Inclusive, 0-indexed byte window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered, always at least 1
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Malformed Range header: {0}")]
    Malformed(&'static str),

    #[error("Requested range not satisfiable (resource is {total_length} bytes)")]
    NotSatisfiable { total_length: u64 },
}

/// How a request for a media resource should be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPlan {
    /// Bytes to send. `None` only for a zero-length resource served in full.
    pub range: Option<ByteRange>,
    pub total_length: u64,
    pub mime_type: String,
    partial: bool,
}

impl StreamPlan {
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    /// 206 for a range request, 200 otherwise
    pub fn status(&self) -> u16 {
        if self.partial {
            206
        } else {
            200
        }
    }

    pub fn content_length(&self) -> u64 {
        self.range.map_or(0, |range| range.length())
    }

    /// `bytes start-end/total`, present only for partial responses
    pub fn content_range(&self) -> Option<String> {
        match self.range {
            Some(range) if self.partial => Some(format!(
                "bytes {}-{}/{}",
                range.start, range.end, self.total_length
            )),
            _ => None,
        }
    }

    /// Response headers, finalized before any body byte is produced
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::with_capacity(4);
        if let Some(content_range) = self.content_range() {
            headers.push(("Content-Range", content_range));
        }
        headers.push(("Accept-Ranges", ACCEPT_RANGES.to_string()));
        headers.push(("Content-Length", self.content_length().to_string()));
        headers.push(("Content-Type", self.mime_type.clone()));
        headers
    }
}

/// Resolve an optional `Range` header against a resource of `total_length` bytes
pub fn plan(
    total_length: u64,
    mime_type: &str,
    range_header: Option<&str>,
) -> Result<StreamPlan, RangeError> {
    let Some(header) = range_header else {
        let range = (total_length > 0).then(|| ByteRange {
            start: 0,
            end: total_length - 1,
        });
        return Ok(StreamPlan {
            range,
            total_length,
            mime_type: mime_type.to_string(),
            partial: false,
        });
    };

    let (start, end) = parse_range_header(header)?;
    let range = resolve(start, end, total_length)?;

    Ok(StreamPlan {
        range: Some(range),
        total_length,
        mime_type: mime_type.to_string(),
        partial: true,
    })
}

/// Parse `bytes=<start>-[<end>]` into its raw bounds
fn parse_range_header(header: &str) -> Result<(u64, Option<u64>), RangeError> {
    let spec = header
        .trim()
        .strip_prefix("bytes=")
        .ok_or(RangeError::Malformed("expected a bytes= unit"))?;

    if spec.contains(',') {
        return Err(RangeError::Malformed("multiple ranges are not supported"));
    }

    let (start, end) = spec
        .split_once('-')
        .ok_or(RangeError::Malformed("missing '-' separator"))?;

    if start.is_empty() {
        return Err(RangeError::Malformed("suffix ranges are not supported"));
    }

    let start = parse_offset(start)?;
    let end = if end.is_empty() {
        None
    } else {
        Some(parse_offset(end)?)
    };

    Ok((start, end))
}

fn parse_offset(digits: &str) -> Result<u64, RangeError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RangeError::Malformed("range bounds must be decimal digits"));
    }
    digits
        .parse()
        .map_err(|_| RangeError::Malformed("range bound out of range"))
}

fn resolve(start: u64, end: Option<u64>, total_length: u64) -> Result<ByteRange, RangeError> {
    let not_satisfiable = RangeError::NotSatisfiable { total_length };

    if start >= total_length {
        return Err(not_satisfiable);
    }
    let end = end.unwrap_or(total_length - 1);
    if end >= total_length || start > end {
        return Err(not_satisfiable);
    }

    Ok(ByteRange { start, end })
}
