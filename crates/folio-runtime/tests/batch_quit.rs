use std::time::Duration;

use folio_core::document::Document;
use folio_core::event::Event;
use folio_runtime::program::{Cmd, Model};
use folio_runtime::simulator::ProgramSimulator;

#[derive(Default)]
struct Page {
    ran_after_quit: bool,
    timer_fired: bool,
}

#[derive(Debug)]
enum Step {
    QuitThenMark,
    ArmThenQuit,
    Mark,
    TimerFired,
}

impl From<Event> for Step {
    fn from(_: Event) -> Self {
        Step::QuitThenMark
    }
}

impl Model for Page {
    type Message = Step;

    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message> {
        match msg {
            Step::QuitThenMark => Cmd::Batch(vec![Cmd::Quit, Cmd::Msg(Step::Mark)]),
            Step::ArmThenQuit => Cmd::Batch(vec![
                Cmd::After(Duration::from_millis(10), Step::TimerFired),
                Cmd::Quit,
            ]),
            Step::Mark => {
                self.ran_after_quit = true;
                Cmd::None
            }
            Step::TimerFired => {
                self.timer_fired = true;
                Cmd::None
            }
        }
    }

    fn view(&self, _doc: &mut Document) {}
}

#[test]
fn quit_cuts_the_rest_of_a_batch() {
    let mut sim = ProgramSimulator::new(Page::default());
    sim.init();
    sim.send(Step::QuitThenMark);

    assert!(!sim.model().ran_after_quit);
    assert!(!sim.is_running());
}

#[test]
fn quit_discards_armed_timers() {
    let mut sim = ProgramSimulator::new(Page::default());
    sim.init();
    sim.send(Step::ArmThenQuit);
    assert_eq!(sim.advance(Duration::from_secs(1)), 0);

    assert!(!sim.model().timer_fired);
    assert_eq!(sim.pending_timers(), 0);
}
