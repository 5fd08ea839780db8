#![forbid(unsafe_code)]

//! Headless test harness for page models.
//!
//! [`ProgramSimulator`] feeds events straight into `update`, moves a
//! virtual clock on request and renders documents only when asked. A timer
//! that schedules another timer counts the new delay from its own deadline,
//! so a long animation chain lands on the same instants whether the test
//! advances in one big jump or many small ones.
//!
//! ```ignore
//! use folio_runtime::simulator::ProgramSimulator;
//!
//! let mut sim = ProgramSimulator::new(page);
//! sim.init();
//! sim.inject_event(Event::Scroll { y: 120 });
//! sim.advance(Duration::from_millis(10));
//! assert!(sim.capture_document().has_class("navbar", "scrolled"));
//! ```

use std::time::Duration;

use folio_core::document::{Document, HostAction};
use folio_core::event::Event;

use crate::program::{Cmd, Model};
use crate::timer::TimerQueue;

/// One executed command, as seen by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdRecord {
    None,
    Quit,
    /// A `Cmd::Msg`; the message itself is not kept.
    Msg,
    /// A batch and the number of commands in it.
    Batch(usize),
    /// A timer and its delay.
    After(Duration),
    Host(HostAction),
    Log(String),
}

/// Drives a [`Model`] on virtual time for tests.
pub struct ProgramSimulator<M: Model> {
    model: M,
    now: Duration,
    timers: TimerQueue<M::Message>,
    documents: Vec<Document>,
    history: Vec<CmdRecord>,
    /// Host actions not yet drained by [`take_actions`](Self::take_actions).
    actions: Vec<HostAction>,
    logs: Vec<String>,
    running: bool,
}

impl<M: Model> ProgramSimulator<M> {
    /// Wraps `model` at virtual time zero. Call [`init`](Self::init) next.
    pub fn new(model: M) -> Self {
        Self {
            model,
            now: Duration::ZERO,
            timers: TimerQueue::new(),
            documents: Vec::new(),
            history: Vec::new(),
            actions: Vec::new(),
            logs: Vec::new(),
            running: true,
        }
    }

    pub fn init(&mut self) {
        let cmd = self.model.init();
        self.run_cmd(cmd);
    }

    /// Deliver `events` in order at the current instant. Delivery stops
    /// once the model quits.
    pub fn inject_events(&mut self, events: &[Event]) {
        for event in events {
            self.send(M::Message::from(event.clone()));
        }
    }

    pub fn inject_event(&mut self, event: Event) {
        self.send(M::Message::from(event));
    }

    /// Deliver a message directly. Ignored after the model quits.
    pub fn send(&mut self, msg: M::Message) {
        if self.running {
            let cmd = self.model.update(msg);
            self.run_cmd(cmd);
        }
    }

    /// Move the clock forward by `dt` and return how many timers fired.
    ///
    /// Each timer runs with the clock at its own deadline. Timers it
    /// schedules fire in the same call when they fall inside the window.
    pub fn advance(&mut self, dt: Duration) -> usize {
        let until = self.now.saturating_add(dt);
        let mut fired = 0;
        while self.running {
            let Some((deadline, msg)) = self.timers.pop_due(until) else {
                break;
            };
            self.now = deadline;
            fired += 1;
            let cmd = self.model.update(msg);
            self.run_cmd(cmd);
        }
        self.now = until;
        fired
    }

    pub fn advance_ms(&mut self, ms: u64) -> usize {
        self.advance(Duration::from_millis(ms))
    }

    /// Render the model now and keep the document.
    pub fn capture_document(&mut self) -> &Document {
        let mut doc = Document::new();
        self.model.view(&mut doc);
        self.documents.push(doc);
        let last = self.documents.len() - 1;
        &self.documents[last]
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn last_document(&self) -> Option<&Document> {
        self.documents.last()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Absolute deadline of the earliest pending timer.
    pub fn next_timer(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn actions(&self) -> &[HostAction] {
        &self.actions
    }

    pub fn take_actions(&mut self) -> Vec<HostAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// `false` once the model returned `Cmd::Quit`.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Lines emitted through `Cmd::Log`.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Every command executed so far, in order.
    pub fn command_log(&self) -> &[CmdRecord] {
        &self.history
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }

    fn run_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => self.history.push(CmdRecord::None),
            Cmd::Quit => {
                self.history.push(CmdRecord::Quit);
                self.running = false;
                self.timers.clear();
            }
            Cmd::Msg(msg) => {
                self.history.push(CmdRecord::Msg);
                let next = self.model.update(msg);
                self.run_cmd(next);
            }
            Cmd::Batch(cmds) => {
                self.history.push(CmdRecord::Batch(cmds.len()));
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.run_cmd(cmd);
                }
            }
            Cmd::After(delay, msg) => {
                self.history.push(CmdRecord::After(delay));
                self.timers.schedule(self.now.saturating_add(delay), msg);
            }
            Cmd::Host(action) => {
                self.history.push(CmdRecord::Host(action.clone()));
                self.actions.push(action);
            }
            Cmd::Log(line) => {
                self.history.push(CmdRecord::Log(line.clone()));
                self.logs.push(line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::event::{KeyCode, KeyEvent};

    // ---------- Test model ----------

    /// Counts up once per 100ms after `Start`; a generation makes restarts
    /// drop the old chain.
    struct Ticker {
        count: u32,
        generation: u64,
        initialized: bool,
    }

    #[derive(Debug)]
    enum TickerMsg {
        Start,
        Step(u64),
        Jump,
        Quit,
        Ignore,
    }

    impl From<Event> for TickerMsg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) if k.is_char('s') => TickerMsg::Start,
                Event::Key(k) if k.is_char('j') => TickerMsg::Jump,
                Event::Key(k) if k.is_char('q') => TickerMsg::Quit,
                _ => TickerMsg::Ignore,
            }
        }
    }

    impl Model for Ticker {
        type Message = TickerMsg;

        fn init(&mut self) -> Cmd<Self::Message> {
            self.initialized = true;
            Cmd::log("ready")
        }

        fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
            match msg {
                TickerMsg::Start => {
                    self.generation += 1;
                    self.count = 0;
                    Cmd::after(Duration::from_millis(100), TickerMsg::Step(self.generation))
                }
                TickerMsg::Step(g) if g == self.generation => {
                    self.count += 1;
                    Cmd::after(Duration::from_millis(100), TickerMsg::Step(g))
                }
                TickerMsg::Step(_) | TickerMsg::Ignore => Cmd::none(),
                TickerMsg::Jump => Cmd::batch(vec![
                    Cmd::host(HostAction::ScrollTo {
                        top: 430,
                        smooth: true,
                    }),
                    Cmd::log("jump"),
                ]),
                TickerMsg::Quit => Cmd::quit(),
            }
        }

        fn view(&self, doc: &mut Document) {
            doc.element_mut("count").set_text(self.count.to_string());
        }
    }

    fn ticker() -> Ticker {
        Ticker {
            count: 0,
            generation: 0,
            initialized: false,
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    #[test]
    fn init_runs_commands() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.init();
        assert!(sim.model().initialized);
        assert_eq!(sim.logs(), ["ready"]);
    }

    #[test]
    fn advance_fires_chained_timers() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.inject_event(key('s'));

        assert_eq!(sim.advance_ms(99), 0);
        assert_eq!(sim.model().count, 0);
        assert_eq!(sim.advance_ms(1), 1);
        assert_eq!(sim.model().count, 1);

        // Follow-ups are relative to each deadline, so 450ms more is 4 steps.
        assert_eq!(sim.advance_ms(450), 4);
        assert_eq!(sim.model().count, 5);
        assert_eq!(sim.now(), Duration::from_millis(550));
        assert_eq!(sim.next_timer(), Some(Duration::from_millis(600)));
    }

    #[test]
    fn stale_generation_timers_are_ignored() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.inject_event(key('s'));
        sim.advance_ms(250);
        assert_eq!(sim.model().count, 2);

        sim.inject_event(key('s'));
        // Old chain's timer at 300 still fires but is ignored.
        sim.advance_ms(60);
        assert_eq!(sim.model().count, 0);
        sim.advance_ms(40);
        assert_eq!(sim.model().count, 1);
    }

    #[test]
    fn host_actions_are_recorded_and_drained() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.inject_event(key('j'));
        assert_eq!(
            sim.actions(),
            [HostAction::ScrollTo {
                top: 430,
                smooth: true
            }]
        );
        assert_eq!(sim.take_actions().len(), 1);
        assert!(sim.actions().is_empty());
        assert_eq!(sim.logs(), ["jump"]);
        assert!(sim.command_log().contains(&CmdRecord::Batch(2)));
    }

    #[test]
    fn quit_stops_events_and_timers() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.inject_event(key('s'));
        sim.inject_events(&[key('q'), key('s')]);
        assert!(!sim.is_running());
        assert_eq!(sim.pending_timers(), 0);
        assert_eq!(sim.advance_ms(1_000), 0);
        assert_eq!(sim.model().count, 0);
    }

    #[test]
    fn capture_document_renders_current_state() {
        let mut sim = ProgramSimulator::new(ticker());
        sim.inject_event(key('s'));
        sim.advance_ms(300);
        let doc = sim.capture_document();
        assert_eq!(doc.element("count").and_then(|e| e.text()), Some("3"));
        assert_eq!(sim.documents().len(), 1);
        assert!(sim.last_document().is_some());
    }
}
