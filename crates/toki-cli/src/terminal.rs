//! Terminal plumbing for an interactive session.
//!
//! [`Terminal`] owns raw mode (and the alternate screen in full-screen
//! layout) for as long as it lives. [`InputReader`] turns crossterm key and
//! resize events into session events on a background thread.

use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, MoveToColumn, MoveUp, Show},
    event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tokio::sync::mpsc::UnboundedSender;
use toki_core::{Event, Screen};

pub use crossterm::terminal::size;

/// Poll timeout for the input thread.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Raw-mode terminal. Restored on drop.
pub struct Terminal<W: Write = Stdout> {
    out: W,
    fullscreen: bool,
    /// Lines of the frame currently on screen (inline layout).
    painted: u16,
}

impl Terminal<Stdout> {
    pub fn enter(fullscreen: bool) -> io::Result<Self> {
        enable_raw_mode()?;
        Self::setup(io::stdout(), fullscreen)
    }
}

impl<W: Write> Terminal<W> {
    /// Build the guard first so a failing setup step still restores the terminal.
    fn setup(out: W, fullscreen: bool) -> io::Result<Self> {
        let mut terminal = Self {
            out,
            fullscreen,
            painted: 0,
        };
        if fullscreen {
            execute!(terminal.out, EnterAlternateScreen)?;
        }
        execute!(terminal.out, Hide)?;
        Ok(terminal)
    }
}

impl<W: Write> Screen for Terminal<W> {
    fn draw(&mut self, frame: &str) -> io::Result<()> {
        if self.fullscreen {
            queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        } else {
            queue!(self.out, MoveToColumn(0))?;
            if self.painted > 1 {
                queue!(self.out, MoveUp(self.painted - 1))?;
            }
            queue!(self.out, Clear(ClearType::FromCursorDown))?;
        }

        queue!(self.out, Print(frame.replace('\n', "\r\n")))?;
        self.painted = if frame.is_empty() {
            0
        } else {
            u16::try_from(frame.lines().count()).unwrap_or(u16::MAX)
        };
        self.out.flush()
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show);
        if self.fullscreen {
            let _ = execute!(self.out, LeaveAlternateScreen);
        }
        let _ = disable_raw_mode();
    }
}

/// Background thread forwarding keyboard and resize events.
pub struct InputReader {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputReader {
    pub fn spawn(tx: UnboundedSender<Event>) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            while flag.load(Ordering::SeqCst) {
                match event::poll(POLL_TIMEOUT) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal input polling failed");
                        break;
                    }
                }
                let Ok(raw) = event::read() else { break };
                if let Some(event) = translate(&raw) {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });
        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Map a terminal event to a session event.
fn translate(raw: &event::Event) -> Option<Event> {
    match raw {
        event::Event::Key(key) if key.kind == KeyEventKind::Press => translate_key(key),
        event::Event::Resize(width, height) => Some(Event::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn translate_key(key: &KeyEvent) -> Option<Event> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Event::Interrupt)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(Event::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records everything written; the first write fails.
    struct FlakyWriter {
        log: Rc<RefCell<Vec<u8>>>,
        failed: bool,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if !std::mem::replace(&mut self.failed, true) {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
            }
            self.log.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_setup_still_restores_terminal() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let writer = FlakyWriter {
            log: Rc::clone(&log),
            failed: false,
        };

        assert!(Terminal::setup(writer, true).is_err());

        let written = String::from_utf8_lossy(&log.borrow()).to_string();
        assert!(written.contains("\x1b[?25h"), "cursor not shown again: {written:?}");
        assert!(written.contains("\x1b[?1049l"), "alternate screen not left: {written:?}");
    }

    #[test]
    fn inline_repaint_moves_over_previous_frame() {
        let mut terminal = Terminal {
            out: Vec::new(),
            fullscreen: false,
            painted: 0,
        };
        terminal.draw("one\ntwo").unwrap();
        assert_eq!(terminal.painted, 2);
        terminal.out.clear();

        terminal.draw("").unwrap();
        let written = String::from_utf8_lossy(&terminal.out).to_string();
        assert!(written.contains("\x1b[1A"), "{written:?}");
        assert_eq!(terminal.painted, 0);
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> event::Event {
        event::Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn ctrl_c_interrupts() {
        assert_eq!(
            translate(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Interrupt)
        );
    }

    #[test]
    fn q_and_esc_quit() {
        assert_eq!(translate(&key(KeyCode::Char('q'), KeyModifiers::NONE)), Some(Event::Quit));
        assert_eq!(translate(&key(KeyCode::Esc, KeyModifiers::NONE)), Some(Event::Quit));
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(translate(&key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
        assert_eq!(translate(&key(KeyCode::Enter, KeyModifiers::NONE)), None);

        let mut release = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(&event::Event::Key(release)), None);
    }

    #[test]
    fn resize_is_forwarded() {
        assert_eq!(
            translate(&event::Event::Resize(120, 40)),
            Some(Event::Resize { width: 120, height: 40 })
        );
    }
}
