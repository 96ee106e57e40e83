//! Integration tests driving the `pts` binary

mod helpers;
mod test_build;
mod test_checksum;
mod test_cli;
