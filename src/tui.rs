use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures::{Stream, StreamExt};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::event::Event;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

pub fn init() -> io::Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(io::stdout()))
}

/// Safe to call more than once (normal exit and the panic hook).
pub fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

/// Everything the app loop reacts to, on one channel: `Init` first, then
/// key presses, resizes, ticks and frame requests.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        Self::with_input(EventStream::new(), tick_rate, render_rate)
    }

    fn with_input<S>(input: S, tick_rate: Duration, render_rate: Duration) -> Self
    where
        S: Stream<Item = io::Result<CrosstermEvent>> + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(pump(input, tx, cancel.clone(), tick_rate, render_rate));
        Self { rx, cancel, task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

async fn pump<S>(
    mut input: S,
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) where
    S: Stream<Item = io::Result<CrosstermEvent>> + Unpin,
{
    if tx.send(Event::Init).is_err() {
        return;
    }

    let mut ticks = interval(tick_rate);
    let mut frames = interval(render_rate);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticks.tick() => Some(Event::Tick),
            _ = frames.tick() => Some(Event::Render),
            next = input.next() => match next {
                Some(Ok(raw)) => translate(raw),
                Some(Err(err)) => {
                    warn!(error = %err, "terminal input");
                    None
                }
                None => break,
            },
        };

        if let Some(event) = event {
            if tx.send(event).is_err() {
                break;
            }
        }
    }
}

/// Key releases and repeats, mouse, focus and paste events never reach the app.
fn translate(raw: CrosstermEvent) -> Option<Event> {
    match raw {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(_, _) => Some(Event::Resize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use futures::stream;

    use super::*;

    const IDLE: Duration = Duration::from_secs(3600);

    #[test]
    fn only_presses_and_resizes_translate() {
        let press = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('j'), KeyModifiers::NONE, KeyEventKind::Release);

        assert!(matches!(translate(CrosstermEvent::Key(press)), Some(Event::Key(_))));
        assert!(translate(CrosstermEvent::Key(release)).is_none());
        assert!(matches!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Resize)));
        assert!(translate(CrosstermEvent::FocusGained).is_none());
    }

    #[tokio::test]
    async fn init_comes_first_and_input_keeps_order() {
        let press = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE);
        let input = stream::iter(vec![
            Ok(CrosstermEvent::FocusGained),
            Err(io::Error::new(io::ErrorKind::Other, "tty gone")),
            Ok(CrosstermEvent::Key(press)),
            Ok(CrosstermEvent::Resize(120, 40)),
        ]);
        let mut events = EventHandler::with_input(input, IDLE, IDLE);

        let mut seen = Vec::new();
        loop {
            let next = tokio::time::timeout(Duration::from_secs(2), events.next())
                .await
                .expect("event pump stalled");
            match next {
                Some(Event::Tick) | Some(Event::Render) => {}
                Some(event) => seen.push(event),
                None => break,
            }
        }

        assert_eq!(seen.len(), 3, "{:?}", seen);
        assert!(matches!(seen[0], Event::Init));
        assert!(matches!(&seen[1], Event::Key(key) if key.code == KeyCode::Char('n')));
        assert!(matches!(seen[2], Event::Resize));
    }

    #[tokio::test]
    async fn dropping_the_handler_stops_the_pump() {
        let events = EventHandler::with_input(stream::pending(), IDLE, IDLE);
        let cancel = events.cancel.clone();
        drop(events);
        assert!(cancel.is_cancelled());
    }
}
