//! Shared HTTP plumbing for notification channels.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::application::ports::NotifyError;

/// Response bodies longer than this are cut in error messages.
const MAX_ERROR_BODY: usize = 200;

/// Build the HTTP client shared by all HTTP channels.
pub fn build_client(timeout: Duration) -> Result<Client, NotifyError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| NotifyError::Transport {
            message: e.to_string(),
        })
}

/// Send a request once. Any 2xx status is success.
pub(crate) async fn send_checked(request: RequestBuilder) -> Result<(), NotifyError> {
    let response = request.send().await.map_err(|e| NotifyError::Transport {
        message: e.to_string(),
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut end = MAX_ERROR_BODY;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    Err(NotifyError::Rejected {
        status: status.as_u16(),
        body,
    })
}

/// Log a failed send and convert the result to the channel contract.
pub(crate) fn report(channel: &'static str, symbol: &str, result: Result<(), NotifyError>) -> bool {
    match result {
        Ok(()) => {
            tracing::info!(channel, symbol = %symbol, "Notification sent");
            true
        }
        Err(e) => {
            tracing::error!(channel, symbol = %symbol, error = %e, "Notification failed");
            false
        }
    }
}
