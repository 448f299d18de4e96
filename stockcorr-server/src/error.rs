use std::net::SocketAddr;
use stockcorr_feed::FeedError;
use thiserror::Error;

/// Fatal errors that stop the dashboard server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("failed to bind dashboard server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        struct TestCase {
            input: ServerError,
            expected: &'static str,
        }

        let tests = vec![
            TestCase {
                // TC0: feed errors are transparent
                input: ServerError::from(FeedError::UnsupportedTimeRange(7)),
                expected: "unsupported time range of 7 minutes, expected one of 5, 15, 30 or 60",
            },
            TestCase {
                // TC1: bind failure names the address
                input: ServerError::Bind {
                    addr: SocketAddr::from(([127, 0, 0, 1], 9002)),
                    source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
                },
                expected: "failed to bind dashboard server to 127.0.0.1:9002: address in use",
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(test.input.to_string(), test.expected, "TC{} failed", index);
        }
    }
}
