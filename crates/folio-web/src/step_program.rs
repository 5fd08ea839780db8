#![forbid(unsafe_code)]

//! Frame-stepped runner for pages hosted in a browser.
//!
//! A browser never hands its event loop over, so [`StepProgram`] is
//! passive: the page script queues events, moves the clock forward and
//! asks for one frame at a time. A frame drains the event queue, fires the
//! timers whose deadlines have passed, renders the model into a
//! [`Document`] and diffs it against the previous one. The script then
//! collects patches, host actions and log lines with
//! [`take_outputs`](StepProgram::take_outputs).
//!
//! ```ignore
//! use core::time::Duration;
//! use folio_core::event::Event;
//! use folio_web::step_program::StepProgram;
//!
//! let mut page = StepProgram::new(app);
//! page.init()?;
//!
//! // inside requestAnimationFrame
//! page.push_event(Event::Scroll { y: 640 });
//! page.advance_time(Duration::from_millis(16));
//! if page.step()?.rendered {
//!     for patch in page.take_outputs().patches {
//!         // apply to the DOM
//!     }
//! }
//! ```

use core::time::Duration;
use std::collections::VecDeque;

use folio_core::document::Document;
use folio_core::event::Event;
use folio_runtime::program::{Cmd, Model};
use folio_runtime::timer::TimerQueue;

use crate::{DeterministicClock, WebError, WebOutputs};

/// What one [`StepProgram::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// `false` once the model returned `Cmd::Quit`.
    pub running: bool,
    pub rendered: bool,
    pub events_processed: u32,
    pub timers_fired: u32,
    /// Count of renders so far.
    pub frame_idx: u64,
}

impl StepResult {
    fn idle(frame_idx: u64) -> Self {
        Self {
            running: false,
            rendered: false,
            events_processed: 0,
            timers_fired: 0,
            frame_idx,
        }
    }
}

/// Passive page runner: [`new`](Self::new), one [`init`](Self::init), then
/// [`step`](Self::step) once per animation frame.
pub struct StepProgram<M: Model> {
    model: M,
    clock: DeterministicClock,
    queue: VecDeque<Event>,
    timers: TimerQueue<M::Message>,
    outputs: WebOutputs,
    /// Time that `Cmd::After` delays count from. While a timer is handled
    /// this is the timer's deadline, not the frame time.
    now: Duration,
    running: bool,
    initialized: bool,
    dirty: bool,
    frame_idx: u64,
    last_rendered: Option<Document>,
}

impl<M: Model> StepProgram<M> {
    #[must_use]
    pub fn new(model: M) -> Self {
        Self::with_clock(model, DeterministicClock::new())
    }

    #[must_use]
    pub fn with_clock(model: M, clock: DeterministicClock) -> Self {
        let now = clock.now();
        Self {
            model,
            clock,
            queue: VecDeque::new(),
            timers: TimerQueue::new(),
            outputs: WebOutputs::default(),
            now,
            running: true,
            initialized: false,
            dirty: true,
            frame_idx: 0,
            last_rendered: None,
        }
    }

    /// Run `Model::init` and produce the first full render. A second call
    /// fails with [`WebError::AlreadyInitialized`].
    pub fn init(&mut self) -> Result<(), WebError> {
        if std::mem::replace(&mut self.initialized, true) {
            return Err(WebError::AlreadyInitialized);
        }
        self.now = self.clock.now();
        let cmd = self.model.init();
        self.run_cmd(cmd);
        if self.running {
            self.render();
        }
        Ok(())
    }

    /// Advance the page by one frame.
    pub fn step(&mut self) -> Result<StepResult, WebError> {
        if !self.initialized {
            return Err(WebError::NotInitialized);
        }
        if !self.running {
            return Ok(StepResult::idle(self.frame_idx));
        }

        let frame_time = self.clock.now();
        self.now = frame_time;
        let mut events_processed = 0;
        while self.running {
            let Some(event) = self.queue.pop_front() else {
                break;
            };
            events_processed += 1;
            self.dispatch(M::Message::from(event));
        }

        let mut timers_fired = 0;
        while self.running {
            let Some((deadline, msg)) = self.timers.pop_due(frame_time) else {
                break;
            };
            timers_fired += 1;
            self.now = deadline;
            self.dispatch(msg);
        }
        self.now = frame_time;

        let rendered = self.running && self.dirty;
        if rendered {
            self.render();
        }

        Ok(StepResult {
            running: self.running,
            rendered,
            events_processed,
            timers_fired,
            frame_idx: self.frame_idx,
        })
    }

    /// Queue an event for the next [`step`](Self::step).
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Hand everything produced since the last call to the host.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    pub fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Direct model access. Forces a render on the next step.
    pub fn model_mut(&mut self) -> &mut M {
        self.dirty = true;
        &mut self.model
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn frame_idx(&self) -> u64 {
        self.frame_idx
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Earliest pending timer; a host may sleep until then.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn dispatch(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.dirty = true;
        self.run_cmd(cmd);
    }

    fn render(&mut self) {
        let mut doc = Document::new();
        self.model.view(&mut doc);

        let patches = match &self.last_rendered {
            Some(prev) => Document::diff(prev, &doc),
            None => {
                self.outputs.full_render = true;
                Document::diff(&Document::new(), &doc)
            }
        };
        self.outputs.patches.extend(patches);
        self.outputs.last_document = Some(doc.clone());
        self.last_rendered = Some(doc);

        self.dirty = false;
        self.frame_idx += 1;
    }

    fn run_cmd(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => {
                self.running = false;
                self.timers.clear();
            }
            Cmd::Msg(msg) => {
                let next = self.model.update(msg);
                self.run_cmd(next);
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    if !self.running {
                        break;
                    }
                    self.run_cmd(cmd);
                }
            }
            Cmd::After(delay, msg) => self.timers.schedule(self.now.saturating_add(delay), msg),
            Cmd::Host(action) => self.outputs.actions.push(action),
            Cmd::Log(line) => self.outputs.logs.push(line),
        }
    }
}
