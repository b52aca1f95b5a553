//! External collaborators.
//!
//! Each collaborator sits behind a trait so the controller can be driven with
//! recording fakes; the default implementations talk to the network and to
//! real executables.

pub mod cmd;
pub mod extract;
pub mod fetch;

pub use cmd::{CommandRunner, CommandSpec, SystemRunner};
pub use extract::{Extractor, SevenZip};
pub use fetch::{Fetcher, HttpFetcher};
