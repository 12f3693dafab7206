pub mod error;
pub mod inputs;
pub mod instance;
pub mod os_release;
pub mod report;
pub mod self_link;
pub mod target;
