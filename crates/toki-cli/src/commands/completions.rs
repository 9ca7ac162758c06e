use std::io;

use clap_complete::{generate, Shell};

/// Write a completion script for `shell` to stdout.
pub fn run(shell: Shell, mut cmd: clap::Command) -> Result<(), Box<dyn std::error::Error>> {
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
