// # Publisher Implementations
//
// This module provides implementations of the HostsPublisher trait for
// different destinations.

pub mod file;
pub mod memory;
pub mod stdout;

pub use file::{AtomicFilePublisher, TEMP_FILE_PREFIX};
pub use memory::MemoryPublisher;
pub use stdout::StdoutPublisher;

use crate::config::{Destination, OutputConfig};
use crate::traits::HostsPublisher;

/// Build the publisher selected by the output configuration
pub fn publisher_for(output: &OutputConfig) -> Box<dyn HostsPublisher> {
    match &output.destination {
        Destination::Stdout => Box::new(StdoutPublisher::new()),
        Destination::File { path } => Box::new(
            AtomicFilePublisher::new(path)
                .with_scratch_dir(&output.scratch_dir)
                .with_mode(output.file_mode),
        ),
    }
}
