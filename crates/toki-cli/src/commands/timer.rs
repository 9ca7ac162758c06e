use tokio::sync::mpsc;
use toki_core::{drive, finished_message, parse_timer_spec, Config, Event, Outcome, StageRunner};

use crate::terminal::{self, InputReader, Terminal};

/// Flags of the primary command.
pub struct TimerArgs {
    pub spec: String,
    pub name: Option<String>,
    pub fullscreen: bool,
    pub format: Option<String>,
}

pub fn run(args: TimerArgs) -> Result<(), Box<dyn std::error::Error>> {
    // Everything that can fail on bad input happens before the terminal is touched.
    let spec = parse_timer_spec(&args.spec)?;
    let config = Config::load()?;
    let display = config.display_options(
        args.name.as_deref(),
        args.fullscreen,
        args.format.as_deref(),
    );
    tracing::info!(stages = spec.len(), total = ?spec.total(), "starting timer");

    let mut runner = StageRunner::new(spec, display);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let outcome = runtime.block_on(session(&mut runner))?;

    tracing::info!(?outcome, "timer finished");
    println!("{}", finished_message(args.name.as_deref()));
    Ok(())
}

async fn session(runner: &mut StageRunner) -> toki_core::Result<Outcome> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut screen = Terminal::enter(runner.display().fullscreen)?;
    let input = InputReader::spawn(tx.clone());

    if let Ok((width, height)) = terminal::size() {
        let _ = tx.send(Event::Resize { width, height });
    }

    let result = drive(runner, &mut screen, tx, rx).await;
    input.stop();
    drop(screen);
    result
}
