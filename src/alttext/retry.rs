use std::error::Error as StdError;
use std::future::Future;
use std::io;

use tracing::warn;

/// A dropped keep-alive connection is retried once on a fresh connection.
pub const MAX_CONNECTION_RETRIES: u32 = 1;

// hyper reports a pooled connection closed by the peer without an io::Error source.
const INCOMPLETE_MESSAGE: &str = "connection closed before message completed";

/// Run `attempt`, repeating it at most [`MAX_CONNECTION_RETRIES`] times while
/// `is_retryable` accepts the failure. Any other outcome is returned as is.
pub async fn retry_dropped_connection<T, E, F, Fut, P>(mut attempt: F, is_retryable: P) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(err) if retries < MAX_CONNECTION_RETRIES && is_retryable(&err) => {
                retries += 1;
                warn!(retries, "connection dropped mid-request, retrying");
            }
            outcome => return outcome,
        }
    }
}

pub fn is_dropped_io_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
    )
}

/// True when the failure means an already open connection went away, as
/// opposed to a timeout or a connection that could not be established.
pub fn is_connection_dropped(err: &reqwest::Error) -> bool {
    if err.is_timeout() || err.is_connect() || err.is_builder() {
        return false;
    }
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if is_dropped_io_kind(io_err.kind()) {
                return true;
            }
        }
        if cause.to_string().contains(INCOMPLETE_MESSAGE) {
            return true;
        }
        source = cause.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    fn dropped(err: &io::Error) -> bool {
        is_dropped_io_kind(err.kind())
    }

    #[tokio::test]
    async fn broken_pipe_then_success_is_transparent() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let result = retry_dropped_connection(
            move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(io::Error::from(io::ErrorKind::BrokenPipe))
                } else {
                    Ok("created")
                }
            },
            dropped,
        )
        .await;
        assert_eq!(result.unwrap(), "created");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_broken_pipe_is_surfaced() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let result: Result<(), io::Error> = retry_dropped_connection(
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(io::Error::from(io::ErrorKind::ConnectionReset))
            },
            dropped,
        )
        .await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn other_failures_are_not_retried() {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let result: Result<(), io::Error> = retry_dropped_connection(
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(io::Error::from(io::ErrorKind::TimedOut))
            },
            dropped,
        )
        .await;
        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropped_kinds() {
        assert!(is_dropped_io_kind(io::ErrorKind::BrokenPipe));
        assert!(is_dropped_io_kind(io::ErrorKind::ConnectionReset));
        assert!(!is_dropped_io_kind(io::ErrorKind::ConnectionRefused));
        assert!(!is_dropped_io_kind(io::ErrorKind::TimedOut));
    }
}
