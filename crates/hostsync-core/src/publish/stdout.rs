// # Stdout Publisher
//
// Writes the assembled hosts content to standard output.
//
// No atomicity is involved: stdout is not a durable artifact, and whatever
// consumes the stream (a pipe, a redirect, a terminal) owns what happens next.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::traits::HostsPublisher;
use crate::Error;

/// Publisher that writes to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPublisher;

impl StdoutPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HostsPublisher for StdoutPublisher {
    async fn publish(&self, content: &[u8]) -> Result<(), Error> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(content)
            .await
            .map_err(|e| Error::publish(format!("Failed to write to stdout: {}", e)))?;
        stdout
            .flush()
            .await
            .map_err(|e| Error::publish(format!("Failed to flush stdout: {}", e)))?;
        Ok(())
    }

    fn destination(&self) -> String {
        "<stdout>".to_string()
    }
}
