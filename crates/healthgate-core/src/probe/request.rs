//! One HTTP exchange over a fresh libcurl Easy handle.

use std::time::Duration;

use crate::check::CheckConfig;
use crate::control::AbortToken;

/// Redirect hops followed when redirects are enabled.
const MAX_REDIRECTS: u32 = 10;

/// Status and (optionally captured) body of a response.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: u32,
    pub body: Vec<u8>,
}

/// Send the configured request and wait for the full response.
///
/// The whole exchange, connection setup included, is bounded by the
/// per-attempt timeout. Non-2xx statuses are returned as responses; only a
/// missing response is an error. The handle is dropped on return, closing
/// its connection whether the exchange finished or was cut off.
pub(crate) fn perform(
    config: &CheckConfig,
    capture_body: bool,
    abort: Option<&AbortToken>,
) -> Result<RawResponse, curl::Error> {
    let timeout: Duration = config.per_attempt_timeout();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(config.target().as_str())?;
    match config.method() {
        "GET" => easy.get(true)?,
        "HEAD" => easy.nobody(true)?,
        other => easy.custom_request(other)?,
    }
    easy.follow_location(config.follow_redirects())?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.connect_timeout(timeout)?;
    easy.timeout(timeout)?;
    // Each attempt must observe the server afresh.
    easy.fresh_connect(true)?;
    easy.forbid_reuse(true)?;

    if !config.headers().is_empty() {
        let mut list = curl::easy::List::new();
        for line in config.headers().curl_lines() {
            list.append(&line)?;
        }
        easy.http_headers(list)?;
    }

    if abort.is_some() {
        easy.progress(true)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if capture_body {
                body.extend_from_slice(data);
            }
            Ok(data.len())
        })?;
        if let Some(token) = abort {
            let token = token.clone();
            // Returning false makes libcurl abort the transfer.
            transfer.progress_function(move |_, _, _, _| !token.is_aborted())?;
        }
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    Ok(RawResponse { status, body })
}
