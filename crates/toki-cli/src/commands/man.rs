use std::io;

/// Write a roff man page for `cmd` to stdout.
pub fn run(cmd: clap::Command) -> Result<(), Box<dyn std::error::Error>> {
    clap_mangen::Man::new(cmd).render(&mut io::stdout())?;
    Ok(())
}
