//! External build tool adapters.

mod command;

pub use command::{
    BUILD_OUTPUT_TARGET, BuildCommand, CommandBuildRunner, DEFAULT_POLL_INTERVAL,
    DEFAULT_TAIL_LINES, DEFAULT_TIMEOUT,
};
