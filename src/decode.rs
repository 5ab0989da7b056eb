use crate::{response::ResultSink, Error, Result};

/// Decodes a success body into `sink`.
///
/// Empty bodies are accepted without touching the target, so endpoints that
/// answer with no content leave the caller's value as it was constructed.
pub(crate) fn decode_body(body: &[u8], sink: &mut dyn ResultSink) -> Result<()> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    sink.fill(body).map_err(|err| {
        Error::Decode(format!(
            "invalid response JSON: {err}; body: {}",
            truncate_body(body)
        ))
    })
}

fn truncate_body(body: &[u8]) -> String {
    const MAX: usize = 512;
    let text = String::from_utf8_lossy(body);
    if text.len() <= MAX {
        return text.into_owned();
    }
    let mut end = MAX;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &text[..end])
}
