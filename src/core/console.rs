//! The interactive console: line editing, submission and response rendering.
//!
//! `Console` is sans-IO. [`Console::handle_key`] returns the request to send
//! when a line is submitted; the driver performs the exchange and hands the
//! outcome back through [`Console::settle`]. While a request is in flight the
//! console is in [`Phase::Submitting`] and will not produce another one.

use tracing::{debug, warn};

use crate::config::ConsoleConfig;
use crate::gateway::GatewayError;
use crate::health::Connectivity;
use crate::protocol::{CommandRequest, CommandResponse, Output};
use crate::surface::{Surface, Tone};

/// Raw key events, already reduced to what the console cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting { request: CommandRequest },
}

/// The not-yet-submitted line. Never holds a newline or other control
/// character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer(String);

impl InputBuffer {
    pub fn push(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        self.0.push(c);
        true
    }

    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct Console<S: Surface> {
    config: ConsoleConfig,
    surface: S,
    buffer: InputBuffer,
    phase: Phase,
    connectivity: Connectivity,
}

impl<S: Surface> Console<S> {
    pub fn new(config: ConsoleConfig, surface: S, connectivity: Connectivity) -> Self {
        Self {
            config,
            surface,
            buffer: InputBuffer::default(),
            phase: Phase::Idle,
            connectivity,
        }
    }

    /// Print the banner and the first prompt.
    pub fn start(&mut self) {
        for line in &self.config.banner {
            self.surface.write_line(Tone::Banner, line);
        }
        self.surface.write(&self.config.prompt);
    }

    pub fn handle_key(&mut self, key: Key) -> Option<CommandRequest> {
        let idle = matches!(self.phase, Phase::Idle);
        match key {
            Key::Char(c) => {
                // Typed ahead while submitting: buffered now, echoed with the
                // next prompt.
                if self.buffer.push(c) && idle {
                    let mut utf8 = [0u8; 4];
                    self.surface.write(c.encode_utf8(&mut utf8));
                }
                None
            }
            Key::Backspace => {
                if self.buffer.pop().is_some() && idle {
                    self.surface.erase_char();
                }
                None
            }
            Key::Enter if idle => self.submit(),
            Key::Enter => {
                debug!("Enter ignored while a command is in flight");
                None
            }
            Key::Other => None,
        }
    }

    fn submit(&mut self) -> Option<CommandRequest> {
        let line = self.buffer.take();
        let cmd = line.trim();
        self.surface.newline();

        if cmd.is_empty() {
            self.prompt();
            return None;
        }

        if cmd.eq_ignore_ascii_case(&self.config.clear_keyword) {
            debug!("Clearing display");
            self.surface.clear();
            self.prompt();
            return None;
        }

        debug!("Submitting command: {}", cmd);
        let request = CommandRequest::new(cmd);
        self.surface.write(&self.config.pending_indicator);
        self.phase = Phase::Submitting {
            request: request.clone(),
        };
        Some(request)
    }

    /// Render the outcome of the in-flight request and return to `Idle`.
    pub fn settle(&mut self, outcome: Result<CommandResponse, GatewayError>) {
        let request = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Submitting { request } => request,
            Phase::Idle => {
                warn!("Dropping a command outcome with nothing in flight");
                return;
            }
        };

        self.surface.erase_row();
        match outcome {
            Err(e) => {
                warn!("Command '{}' failed in transport: {}", request.cmd, e);
                self.surface
                    .write_line(Tone::Error, &format!("Fetch error: {e}"));
                self.connectivity.mark(false);
            }
            Ok(CommandResponse::Failure(message)) => {
                self.surface
                    .write_line(Tone::Error, &format!("Error: {message}"));
                self.connectivity.mark(true);
            }
            Ok(CommandResponse::Success(output)) => {
                self.render_output(&request, output);
                self.connectivity.mark(true);
            }
        }
        self.prompt();
    }

    fn render_output(&mut self, request: &CommandRequest, output: Output) {
        match output {
            Output::Lines(lines) => {
                let tone = if request.cmd.eq_ignore_ascii_case(&self.config.help_keyword) {
                    Tone::Help
                } else {
                    Tone::Output
                };
                for line in &lines {
                    self.surface.write_line(tone, line);
                }
            }
            Output::Scalar(text) => self.surface.write_line(Tone::Output, &text),
        }
    }

    fn prompt(&mut self) {
        self.surface.write(&self.config.prompt);
        if !self.buffer.is_empty() {
            self.surface.write(self.buffer.as_str());
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Scrollback;

    const PROMPT: &str = "redigo> ";

    fn console() -> (Console<Scrollback>, Connectivity) {
        let connectivity = Connectivity::default();
        let mut c = Console::new(
            ConsoleConfig {
                banner: Vec::new(),
                ..ConsoleConfig::default()
            },
            Scrollback::new(64),
            connectivity.clone(),
        );
        c.start();
        (c, connectivity)
    }

    fn type_line(c: &mut Console<Scrollback>, text: &str) -> Option<CommandRequest> {
        for ch in text.chars() {
            assert!(c.handle_key(Key::Char(ch)).is_none());
        }
        c.handle_key(Key::Enter)
    }

    fn rows(c: &Console<Scrollback>) -> Vec<String> {
        c.surface().rows().map(|r| r.text.clone()).collect()
    }

    #[test]
    fn typed_line_is_trimmed_into_one_request() {
        let (mut c, _) = console();
        let req = type_line(&mut c, "  SET name Alice  ");
        assert_eq!(req, Some(CommandRequest::new("SET name Alice")));
        assert!(matches!(c.phase(), Phase::Submitting { .. }));
        assert_eq!(c.buffer(), "");
        assert_eq!(rows(&c), vec![format!("{PROMPT}  SET name Alice  ")]);
        assert_eq!(c.surface().open_row(), "...");
    }

    #[test]
    fn blank_line_sends_nothing_and_reprompts_once() {
        let (mut c, _) = console();
        assert_eq!(type_line(&mut c, "   "), None);
        assert_eq!(c.phase(), &Phase::Idle);
        assert_eq!(rows(&c), vec![format!("{PROMPT}   ")]);
        assert_eq!(c.surface().open_row(), PROMPT);

        assert_eq!(c.handle_key(Key::Enter), None);
        assert_eq!(c.surface().open_row(), PROMPT);
    }

    #[test]
    fn backspace_on_empty_buffer_touches_nothing() {
        let (mut c, _) = console();
        let before = c.surface().revision();
        assert_eq!(c.handle_key(Key::Backspace), None);
        assert_eq!(c.surface().revision(), before);
        assert_eq!(c.surface().open_row(), PROMPT);
    }

    #[test]
    fn backspace_erases_last_character() {
        let (mut c, _) = console();
        for ch in "GETX".chars() {
            c.handle_key(Key::Char(ch));
        }
        c.handle_key(Key::Backspace);
        assert_eq!(c.buffer(), "GET");
        assert_eq!(c.surface().open_row(), format!("{PROMPT}GET"));
    }

    #[test]
    fn control_characters_never_enter_the_buffer() {
        let (mut c, _) = console();
        c.handle_key(Key::Char('\n'));
        c.handle_key(Key::Char('\t'));
        c.handle_key(Key::Other);
        assert_eq!(c.buffer(), "");
        assert_eq!(c.surface().open_row(), PROMPT);
    }

    #[test]
    fn sequence_output_prints_one_row_per_element() {
        let (mut c, conn) = console();
        type_line(&mut c, "keys *");
        c.settle(Ok(CommandResponse::Success(Output::Lines(vec![
            "a".into(),
            "b".into(),
            "c".into(),
        ]))));

        assert_eq!(rows(&c), vec![format!("{PROMPT}keys *"), "a".into(), "b".into(), "c".into()]);
        assert_eq!(c.surface().open_row(), PROMPT);
        assert_eq!(c.phase(), &Phase::Idle);
        assert!(conn.is_connected());
    }

    #[test]
    fn scalar_output_prints_one_row() {
        let (mut c, _) = console();
        type_line(&mut c, "DBSIZE");
        c.settle(Ok(CommandResponse::Success(Output::Scalar("42".into()))));
        assert_eq!(rows(&c), vec![format!("{PROMPT}DBSIZE"), "42".into()]);
    }

    #[test]
    fn help_sequence_uses_help_tone() {
        let (mut c, _) = console();
        type_line(&mut c, "HeLp");
        c.settle(Ok(CommandResponse::Success(Output::Lines(vec![
            "GET key".into(),
            "SET key value".into(),
        ]))));

        let tones: Vec<Tone> = c.surface().rows().skip(1).map(|r| r.tone).collect();
        assert_eq!(tones, vec![Tone::Help, Tone::Help]);

        type_line(&mut c, "keys *");
        c.settle(Ok(CommandResponse::Success(Output::Lines(vec!["k".into()]))));
        assert_eq!(c.surface().rows().last().map(|r| r.tone), Some(Tone::Output));
    }

    #[test]
    fn application_error_keeps_connection() {
        let (mut c, conn) = console();
        type_line(&mut c, "GET missing");
        c.settle(Ok(CommandResponse::Failure("no such key".into())));

        assert_eq!(
            rows(&c),
            vec![format!("{PROMPT}GET missing"), "Error: no such key".into()]
        );
        assert_eq!(c.surface().rows().last().map(|r| r.tone), Some(Tone::Error));
        assert!(conn.is_connected());
    }

    #[test]
    fn transport_failure_disconnects_and_reprompts() {
        let (mut c, conn) = console();
        type_line(&mut c, "PING");
        c.settle(Err(GatewayError::Transport("connection refused".into())));

        assert_eq!(
            rows(&c),
            vec![format!("{PROMPT}PING"), "Fetch error: connection refused".into()]
        );
        assert!(!conn.is_connected());
        assert_eq!(c.surface().open_row(), PROMPT);

        // Next exchange recovers the flag.
        type_line(&mut c, "PING");
        c.settle(Ok(CommandResponse::Success(Output::Scalar("PONG".into()))));
        assert!(conn.is_connected());
    }

    #[test]
    fn clear_keyword_is_local() {
        let (mut c, _) = console();
        type_line(&mut c, "SET a 1");
        c.settle(Ok(CommandResponse::Success(Output::Scalar("OK".into()))));

        assert_eq!(type_line(&mut c, " CLEAR "), None);
        assert_eq!(c.surface().rows().len(), 0);
        assert_eq!(c.surface().open_row(), PROMPT);
        assert_eq!(c.phase(), &Phase::Idle);
    }

    #[test]
    fn only_one_request_in_flight() {
        let (mut c, _) = console();
        assert!(type_line(&mut c, "GET a").is_some());
        assert_eq!(type_line(&mut c, "GET b"), None);
        assert_eq!(c.buffer(), "GET b");
    }

    #[test]
    fn typeahead_is_echoed_after_the_prompt() {
        let (mut c, _) = console();
        type_line(&mut c, "GET a");
        for ch in "SETX".chars() {
            c.handle_key(Key::Char(ch));
        }
        c.handle_key(Key::Backspace);
        // Nothing echoed over the pending indicator.
        assert_eq!(c.surface().open_row(), "...");

        c.settle(Ok(CommandResponse::Success(Output::Scalar("1".into()))));
        assert_eq!(c.surface().open_row(), format!("{PROMPT}SET"));
        assert_eq!(
            type_line(&mut c, " a 2"),
            Some(CommandRequest::new("SET a 2"))
        );
    }

    #[test]
    fn stray_settle_is_ignored() {
        let (mut c, conn) = console();
        let before = c.surface().revision();
        c.settle(Err(GatewayError::Transport("late".into())));
        assert_eq!(c.surface().revision(), before);
        assert!(conn.is_connected());
    }

    #[test]
    fn banner_precedes_first_prompt() {
        let mut c = Console::new(
            ConsoleConfig::default(),
            Scrollback::new(16),
            Connectivity::default(),
        );
        c.start();
        assert_eq!(
            rows(&c),
            vec![
                "RediGo Playground - Multithread Redis".to_string(),
                "Type `help` for more information.".to_string(),
                String::new(),
            ]
        );
        assert!(c.surface().rows().all(|r| r.tone == Tone::Banner));
        assert_eq!(c.surface().open_row(), PROMPT);
    }
}
