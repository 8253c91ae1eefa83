pub mod root;

pub use root::{RootConfig, DEFAULT_HOST, DEFAULT_PORT};
