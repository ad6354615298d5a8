//! Terminal countdown screen.
//!
//! `TerminalRenderer` is the countdown's observer and owns all output.
//! `CountdownView` wires a `Countdown` to the renderer and drives both from
//! a single event loop that also reads line commands from the user.

use std::cell::{Cell, Ref, RefCell};
use std::io::Write;
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use super::display::{format_time_span, Display, ALERT_MESSAGE, ALERT_TITLE};
use crate::countdown::{Countdown, CountdownError, CountdownObserver};
use crate::types::{
    duration_millis, CountdownConfig, CountdownEvent, CountdownState, OutputFormat,
    PickerSelection,
};

// ============================================================================
// TerminalRenderer
// ============================================================================

/// Renders countdown events to a writer.
pub struct TerminalRenderer<W: Write> {
    out: RefCell<W>,
    format: OutputFormat,
    /// Text mode: the cursor sits at the end of the in-place time line
    line_open: Cell<bool>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out: RefCell::new(out),
            format,
            line_open: Cell::new(false),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Borrows the underlying writer.
    pub fn writer(&self) -> Ref<'_, W> {
        self.out.borrow()
    }

    /// Renders one event.
    pub fn render(&self, event: &CountdownEvent) {
        let result = match self.format {
            OutputFormat::Json => self.write_json(event),
            OutputFormat::Text => self.write_text(event),
        };
        if let Err(e) = result {
            warn!("failed to render countdown output: {}", e);
        }
    }

    /// Shows a message to the user. JSON output only carries events, so
    /// messages are logged instead.
    pub fn render_message(&self, message: &str) {
        match self.format {
            OutputFormat::Json => warn!("{}", message),
            OutputFormat::Text => {
                let result = self.write_lines(|out| writeln!(out, "{}", message));
                if let Err(e) = result {
                    warn!("failed to render countdown output: {}", e);
                }
            }
        }
    }

    /// Terminates the in-place time line, if one is open.
    pub fn close(&self) {
        if self.line_open.replace(false) {
            let mut out = self.out.borrow_mut();
            if let Err(e) = writeln!(out).and_then(|_| out.flush()) {
                warn!("failed to render countdown output: {}", e);
            }
        }
    }

    fn write_json(&self, event: &CountdownEvent) -> Result<()> {
        let line = serde_json::to_string(event).context("failed to serialize countdown event")?;
        let mut out = self.out.borrow_mut();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }

    fn write_text(&self, event: &CountdownEvent) -> Result<()> {
        let span = match event {
            CountdownEvent::Started { duration_ms }
            | CountdownEvent::DurationSet { duration_ms }
            | CountdownEvent::Reset { duration_ms } => Duration::from_millis(*duration_ms),
            CountdownEvent::Update { remaining_ms, .. } => Duration::from_millis(*remaining_ms),
            CountdownEvent::Finished => {
                self.write_time(Duration::ZERO)?;
                self.write_lines(|out| {
                    writeln!(out)?;
                    writeln!(out, "{}", ALERT_TITLE)?;
                    writeln!(out, "{}", ALERT_MESSAGE)
                })?;
                return Ok(());
            }
        };
        self.write_time(span)?;
        Ok(())
    }

    fn write_time(&self, span: Duration) -> std::io::Result<()> {
        let mut out = self.out.borrow_mut();
        write!(out, "\r{}", format_time_span(span))?;
        out.flush()?;
        self.line_open.set(true);
        Ok(())
    }

    /// Writes whole lines below the time line.
    fn write_lines<F>(&self, f: F) -> std::io::Result<()>
    where
        F: FnOnce(&mut W) -> std::io::Result<()>,
    {
        let mut out = self.out.borrow_mut();
        if self.line_open.replace(false) {
            writeln!(out)?;
        }
        f(&mut *out)?;
        out.flush()
    }
}

impl<W: Write> CountdownObserver for TerminalRenderer<W> {
    fn countdown_did_update(&self, time_remaining: Duration) {
        self.render(&CountdownEvent::Update {
            remaining_ms: duration_millis(time_remaining),
            display: format_time_span(time_remaining),
        });
    }

    fn countdown_did_finish(&self) {
        self.render(&CountdownEvent::Finished);
    }
}

// ============================================================================
// ViewCommand
// ============================================================================

/// A line command typed while the screen is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Start button
    Start,
    /// Reset button
    Reset,
    /// Picker change
    Set(PickerSelection),
    /// Close the screen
    Quit,
}

impl FromStr for ViewCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or_default().to_ascii_lowercase();

        let parsed = match command.as_str() {
            "start" | "s" => ViewCommand::Start,
            "reset" | "r" => ViewCommand::Reset,
            "quit" | "q" | "exit" => ViewCommand::Quit,
            "set" => {
                let minutes = parse_component(parts.next(), "minutes")?;
                let seconds = parse_component(parts.next(), "seconds")?;
                let selection =
                    PickerSelection::new(minutes, seconds).map_err(|e| e.to_string())?;
                ViewCommand::Set(selection)
            }
            other => {
                return Err(format!(
                    "unknown command `{}`; {}",
                    other,
                    Display::command_help()
                ));
            }
        };

        if parts.next().is_some() {
            return Err(format!("too many arguments; {}", Display::command_help()));
        }
        Ok(parsed)
    }
}

fn parse_component(value: Option<&str>, name: &str) -> Result<u32, String> {
    let value =
        value.ok_or_else(|| format!("missing {}; usage: set <minutes> <seconds>", name))?;
    value
        .parse()
        .map_err(|_| format!("invalid {} `{}`", name, value))
}

// ============================================================================
// CountdownView
// ============================================================================

/// Whether the view keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFlow {
    Continue,
    Quit,
}

/// The countdown screen: one countdown, one renderer, one input stream.
pub struct CountdownView<W: Write + 'static> {
    countdown: Countdown,
    renderer: Rc<TerminalRenderer<W>>,
    auto_start: bool,
}

impl<W: Write + 'static> CountdownView<W> {
    /// Creates the screen and registers the renderer as observer.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: &CountdownConfig, out: W) -> Result<Self, CountdownError> {
        let mut countdown = Countdown::from_config(config)?;
        let renderer = Rc::new(TerminalRenderer::new(out, config.output));
        countdown.set_observer(&renderer);

        Ok(Self {
            countdown,
            renderer,
            auto_start: config.auto_start,
        })
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn renderer(&self) -> &TerminalRenderer<W> {
        &self.renderer
    }

    /// Runs the screen until `quit`, or until the input closes and no
    /// countdown is in progress.
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut input_open = true;

        self.renderer.render(&CountdownEvent::Reset {
            duration_ms: duration_millis(self.countdown.duration()),
        });
        if self.auto_start {
            self.start();
        }

        loop {
            if !input_open && self.countdown.state() != CountdownState::Started {
                break;
            }

            tokio::select! {
                _ = self.countdown.tick() => {}
                line = lines.next_line(), if input_open => {
                    match line.context("failed to read command input")? {
                        Some(line) => {
                            if self.handle_command(&line) == ViewFlow::Quit {
                                break;
                            }
                        }
                        None => {
                            debug!("command input closed");
                            input_open = false;
                        }
                    }
                }
            }
        }

        self.renderer.close();
        Ok(())
    }

    /// Applies one line command.
    pub fn handle_command(&mut self, line: &str) -> ViewFlow {
        let line = line.trim();
        if line.is_empty() {
            return ViewFlow::Continue;
        }

        match line.parse::<ViewCommand>() {
            Ok(ViewCommand::Start) => self.start(),
            Ok(ViewCommand::Reset) => self.reset(),
            Ok(ViewCommand::Set(selection)) => self.set_selection(selection),
            Ok(ViewCommand::Quit) => return ViewFlow::Quit,
            Err(message) => self.renderer.render_message(&message),
        }
        ViewFlow::Continue
    }

    fn start(&mut self) {
        // The start button stays enabled after a run finishes.
        if self.countdown.state() == CountdownState::Finished {
            self.countdown.reset();
        }

        match self.countdown.start() {
            Ok(()) => self.renderer.render(&CountdownEvent::Started {
                duration_ms: duration_millis(self.countdown.duration()),
            }),
            Err(e) => debug!("start ignored: {}", e),
        }
    }

    fn reset(&mut self) {
        self.countdown.reset();
        self.renderer.render(&CountdownEvent::Reset {
            duration_ms: duration_millis(self.countdown.duration()),
        });
    }

    fn set_selection(&mut self, selection: PickerSelection) {
        match self.countdown.set_duration(selection.to_duration()) {
            Ok(()) => self.renderer.render(&CountdownEvent::DurationSet {
                duration_ms: duration_millis(self.countdown.duration()),
            }),
            Err(e) => self.renderer.render_message(&e.to_string()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
