// ABOUTME: Transport layer: invocation templates plus child-process spawning.
// ABOUTME: All transport and encryption is delegated to the external ssh/scp binaries.

mod error;
mod runner;
mod session;

pub use error::{Error, Result};
pub use runner::{CommandOutput, CommandRunner, Invocation, ProcessRunner};
pub use session::RemoteSession;
