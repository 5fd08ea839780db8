//! Property tests for the page state machines.

use std::time::Duration;

use folio::contact::{is_valid_email, validate, ContactFields, Field};
use folio::filter::{FilterController, ALL};
use folio::layout::{Card, FilterButton};
use folio::menu::{CloseReason, MenuController};
use folio::typewriter::Typewriter;
use folio::TypewriterTiming;
use proptest::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

const CATEGORIES: [&str; 3] = ["ml", "systems", "web"];

fn cards(categories: &[usize]) -> Vec<Card> {
    categories
        .iter()
        .enumerate()
        .map(|(i, c)| Card {
            id: format!("project-{i}").into(),
            category: CATEGORIES[*c].to_owned(),
        })
        .collect()
}

fn buttons() -> Vec<FilterButton> {
    std::iter::once(ALL)
        .chain(CATEGORIES)
        .map(|f| FilterButton {
            id: format!("filter-{f}").into(),
            filter: f.to_owned(),
        })
        .collect()
}

proptest! {
    /// Once every timer has fired, the visible set is exactly the
    /// selected category, however the clicks and timers interleaved.
    #[test]
    fn filter_settles_on_the_last_selection(
        categories in prop::collection::vec(0usize..3, 0..12),
        clicks in prop::collection::vec(0usize..4, 1..10),
        fire_between in prop::collection::vec(any::<bool>(), 10),
    ) {
        let cards = cards(&categories);
        let mut filter = FilterController::new(
            buttons(),
            &cards,
            Duration::from_millis(300),
            Duration::from_millis(50),
        );
        let mut pending = Vec::new();
        let mut last = ALL;
        for (i, click) in clicks.iter().enumerate() {
            last = if *click == 0 { ALL } else { CATEGORIES[click - 1] };
            pending.extend(filter.select(last));
            if fire_between[i] {
                for (_, t) in pending.drain(..) {
                    filter.on_timer(t);
                }
            }
        }
        // Timers fire in deadline order; stale ones are no-ops.
        pending.sort_by_key(|(d, _)| *d);
        for (_, t) in pending {
            filter.on_timer(t);
        }

        prop_assert!(filter.is_settled());
        let visible: Vec<_> = filter.visible_cards().cloned().collect();
        let expected: Vec<_> = cards
            .iter()
            .filter(|c| last == ALL || c.category == last)
            .map(|c| c.id.clone())
            .collect();
        prop_assert_eq!(visible, expected);
    }

    #[test]
    fn typewriter_index_stays_within_phrase(
        phrases in prop::collection::vec("[a-zé🙂 ]{0,8}", 1..5),
        ticks in 0usize..400,
    ) {
        let mut tw = Typewriter::new(phrases.clone(), TypewriterTiming::default());
        for _ in 0..ticks {
            let delay = tw.tick();
            let len = phrases[tw.phrase_index()].graphemes(true).count();
            prop_assert!(tw.char_index() <= len);
            prop_assert!(delay > Duration::ZERO);
            prop_assert_eq!(tw.text().graphemes(true).count(), tw.char_index());
        }
    }

    #[test]
    fn menu_is_closed_after_any_close_intent(
        toggles in prop::collection::vec(any::<bool>(), 0..20),
        reason in prop_oneof![
            Just(CloseReason::OutsideClick),
            Just(CloseReason::LinkClick),
            Just(CloseReason::Escape),
            Just(CloseReason::Resize),
        ],
    ) {
        let mut menu = MenuController::new(
            "hamburger".into(),
            "nav-menu".into(),
            768,
            Duration::from_millis(250),
        );
        let mut expected = false;
        for t in toggles {
            if t {
                menu.toggle();
                expected = !expected;
            }
        }
        prop_assert_eq!(menu.is_open(), expected);
        prop_assert_eq!(menu.close(reason), expected);
        prop_assert!(!menu.is_open());
    }

    #[test]
    fn whitespace_only_fields_are_required(
        pad in "[ \t\n]{0,6}",
    ) {
        let v = validate(&ContactFields {
            name: pad.clone(),
            email: pad.clone(),
            subject: pad.clone(),
            message: pad,
        });
        prop_assert_eq!(v.error(Field::Name), Some("Name is required"));
        prop_assert_eq!(v.error(Field::Email), Some("Email is required"));
        prop_assert_eq!(v.error(Field::Subject), Some("Subject is required"));
        prop_assert_eq!(v.error(Field::Message), Some("Message is required"));
    }

    #[test]
    fn well_formed_emails_pass(
        local in "[a-z0-9._+-]{1,10}",
        host in "[a-z0-9-]{1,10}",
        tld in "[a-z]{2,4}",
    ) {
        let email = format!("{local}@{host}.{tld}");
        prop_assert!(is_valid_email(&email), "{}", email);
    }

    #[test]
    fn emails_with_whitespace_fail(
        head in "[a-z]{1,5}",
        tail in "[a-z]{1,5}",
    ) {
        let email = format!("{head} {tail}@example.com");
        prop_assert!(!is_valid_email(&email));
    }
}
