//! Interactive event loop.
//!
//! # Design
//! Every input to the program arrives on one mpsc channel: stdin lines from a
//! reader thread, HTTP completions from per-request worker threads, and banner
//! timers from sleeper threads. Only the loop thread owns `TodoState`, so all
//! mutation is serialized without locks. Requests are never cancelled, and
//! overlapping requests resolve in whatever order their responses arrive.
//! When stdin closes the loop keeps running until every outstanding request
//! has resolved, so piped input is applied in full before exit.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use todo_core::{Action, BannerId, Effect, Outcome, RequestId, TodoClient, TodoState};
use tracing::{debug, info};

use crate::command::{Command, HELP};
use crate::transport::Transport;
use crate::view;

#[derive(Debug)]
pub enum Event {
    Line(String),
    Resolved { request: RequestId, outcome: Outcome },
    BannerElapsed(BannerId),
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<T: Transport> {
    state: TodoState,
    transport: Arc<T>,
    events: Sender<Event>,
    inbox: Receiver<Event>,
    /// Input is gone; quit once nothing is in flight.
    closing: bool,
}

impl<T: Transport> App<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        let (events, inbox) = mpsc::channel();
        Self {
            state: TodoState::new(client),
            transport: Arc::new(transport),
            events,
            inbox,
            closing: false,
        }
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    /// A handle for feeding events from other threads.
    pub fn sender(&self) -> Sender<Event> {
        self.events.clone()
    }

    /// Issue the initial load.
    pub fn start(&mut self) {
        info!(base_url = self.state.client().base_url(), "loading todos");
        self.dispatch(Action::Load);
    }

    /// Wait up to `timeout` for the next event.
    pub fn next_event(&self, timeout: Duration) -> Option<Event> {
        self.inbox.recv_timeout(timeout).ok()
    }

    /// Apply one event and redraw.
    pub fn handle(&mut self, event: Event, out: &mut impl Write) -> io::Result<Flow> {
        match event {
            Event::Line(line) => match Command::parse(&line) {
                Ok(None) => return Ok(Flow::Continue),
                Ok(Some(Command::Quit)) => return Ok(Flow::Quit),
                Ok(Some(Command::Help)) => {
                    writeln!(out, "{HELP}")?;
                    return Ok(Flow::Continue);
                }
                Ok(Some(command)) => {
                    for action in command.actions() {
                        self.dispatch(action);
                    }
                }
                Err(err) => {
                    writeln!(out, "error: {err}")?;
                    return Ok(Flow::Continue);
                }
            },
            Event::Resolved { request, outcome } => {
                self.dispatch(Action::Resolved { request, outcome });
            }
            Event::BannerElapsed(banner) => self.dispatch(Action::BannerElapsed(banner)),
            Event::InputClosed => {
                if self.state.in_flight() == 0 {
                    return Ok(Flow::Quit);
                }
                debug!(pending = self.state.in_flight(), "input closed, draining requests");
                self.closing = true;
                return Ok(Flow::Continue);
            }
        }
        self.draw(out)?;
        if self.closing && self.state.in_flight() == 0 {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    pub fn draw(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "\n{}", view::render(&self.state))?;
        write!(out, "> ")?;
        out.flush()
    }

    /// Load, then process events until the user quits, or until stdin closes
    /// and the last outstanding request has resolved.
    pub fn run(mut self, out: &mut impl Write) -> io::Result<()> {
        spawn_stdin_reader(self.sender());
        self.start();
        self.draw(out)?;
        while let Ok(event) = self.inbox.recv() {
            if self.handle(event, out)? == Flow::Quit {
                break;
            }
        }
        if self.state.in_flight() > 0 {
            debug!(pending = self.state.in_flight(), "exiting with requests in flight");
        }
        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        for effect in self.state.dispatch(action) {
            self.perform(effect);
        }
    }

    fn perform(&self, effect: Effect) {
        let events = self.sender();
        match effect {
            Effect::Send { request, http } => {
                let transport = Arc::clone(&self.transport);
                thread::spawn(move || {
                    let outcome = transport.execute(&http);
                    let _ = events.send(Event::Resolved { request, outcome });
                });
            }
            Effect::ExpireBanner { banner, after } => {
                thread::spawn(move || {
                    thread::sleep(after);
                    let _ = events.send(Event::BannerElapsed(banner));
                });
            }
        }
    }
}

fn spawn_stdin_reader(events: Sender<Event>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if events.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = events.send(Event::InputClosed);
    });
}
