//! Theme preference across page loads.

use std::sync::Arc;

use folio::{PageConfig, PageLayout, PortfolioApp, Theme};
use folio_core::event::{ClickEvent, Event, KeyCode, KeyEvent};
use folio_runtime::state_persistence::{MemoryStorage, StateRegistry, UnavailableStorage};
use folio_runtime::ProgramSimulator;

fn page(registry: Arc<StateRegistry>) -> ProgramSimulator<PortfolioApp> {
    let app = PortfolioApp::new(PageConfig::default(), PageLayout::portfolio(), registry);
    let mut sim = ProgramSimulator::new(app);
    sim.init();
    sim
}

fn shared_page(storage: &Arc<MemoryStorage>) -> ProgramSimulator<PortfolioApp> {
    page(StateRegistry::new(Box::new(Arc::clone(storage))).shared())
}

fn click_toggle(sim: &mut ProgramSimulator<PortfolioApp>) {
    sim.inject_event(Event::Click(
        ClickEvent::on("theme-icon").within("theme-toggle"),
    ));
}

#[test]
fn first_visit_is_dark() {
    let mut sim = page(StateRegistry::in_memory().shared());
    assert_eq!(sim.model().theme(), Theme::Dark);
    let doc = sim.capture_document();
    assert_eq!(doc.root_attr("data-color-scheme"), Some("dark"));
    assert_eq!(doc.element("theme-icon").and_then(|e| e.text()), Some("\u{2600}\u{fe0f}"));
}

#[test]
fn choice_survives_a_reload() {
    let storage = Arc::new(MemoryStorage::new());

    let mut first = shared_page(&storage);
    click_toggle(&mut first);
    assert_eq!(first.model().theme(), Theme::Light);
    first.inject_event(Event::Unload);

    let mut second = shared_page(&storage);
    assert_eq!(second.model().theme(), Theme::Light);
    let doc = second.capture_document();
    assert_eq!(doc.root_attr("data-color-scheme"), Some("light"));
    assert_eq!(doc.element("theme-icon").and_then(|e| e.text()), Some("\u{1f319}"));
}

#[test]
fn toggling_twice_restores_the_original() {
    let storage = Arc::new(MemoryStorage::new());
    let mut sim = shared_page(&storage);
    click_toggle(&mut sim);
    click_toggle(&mut sim);
    assert_eq!(sim.model().theme(), Theme::Dark);

    let reloaded = shared_page(&storage);
    assert_eq!(reloaded.model().theme(), Theme::Dark);
}

#[test]
fn stored_light_is_applied_at_init() {
    let storage = Arc::new(MemoryStorage::with_values([("theme", "light")]));
    let mut sim = shared_page(&storage);
    assert_eq!(sim.model().theme(), Theme::Light);
    assert_eq!(
        sim.capture_document().root_attr("data-color-scheme"),
        Some("light")
    );
}

#[test]
fn garbage_in_storage_falls_back_to_dark() {
    let storage = Arc::new(MemoryStorage::with_values([("theme", "solarized")]));
    let sim = shared_page(&storage);
    assert_eq!(sim.model().theme(), Theme::Dark);
}

#[test]
fn unavailable_storage_never_breaks_the_page() {
    let registry = StateRegistry::new(Box::new(UnavailableStorage::new("private mode"))).shared();
    let mut sim = page(registry);
    assert_eq!(sim.model().theme(), Theme::Dark);

    click_toggle(&mut sim);
    assert_eq!(sim.model().theme(), Theme::Light);
    assert!(sim.is_running());
}

#[test]
fn keyboard_shortcut_toggles_outside_inputs() {
    let mut sim = page(StateRegistry::in_memory().shared());
    sim.inject_event(Event::Key(KeyEvent::new(KeyCode::Char('t'))));
    assert_eq!(sim.model().theme(), Theme::Light);

    sim.inject_event(Event::Key(KeyEvent::new(KeyCode::Char('t')).in_editable(true)));
    assert_eq!(sim.model().theme(), Theme::Light);
}

#[test]
fn file_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    let mut first = page(StateRegistry::with_file(&path).shared());
    click_toggle(&mut first);
    assert!(path.exists());

    let second = page(StateRegistry::with_file(&path).shared());
    assert_eq!(second.model().theme(), Theme::Light);
}
