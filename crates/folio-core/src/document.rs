#![forbid(unsafe_code)]

//! Headless document model.
//!
//! A [`Document`] is the page-side equivalent of a frame buffer: the model
//! renders its complete presentational state into one (classes, attributes,
//! inline styles, text, visibility) and the host applies the difference
//! against the previous render as a list of [`Patch`]es.
//!
//! Only elements the model manages appear in the document. Everything else in
//! the page markup is left alone by the host.
//!
//! # Invariants
//!
//! 1. Iteration order is deterministic (ordered maps and sets throughout).
//! 2. `Document::diff(a, a)` is empty.
//! 3. Applying `Document::diff(a, b)` to `a` yields `b` (see [`Document::apply`]).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identifier of a page element (the DOM `id`, or a host-assigned key).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(String);

impl ElementId {
    /// Create an id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ElementId> for ElementId {
    fn from(id: &ElementId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Presentational state of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: Option<String>,
    hidden: bool,
    disabled: bool,
}

impl Element {
    /// Add or remove a class.
    pub fn set_class(&mut self, class: &str, on: bool) -> &mut Self {
        if on {
            self.classes.insert(class.to_owned());
        } else {
            self.classes.remove(class);
        }
        self
    }

    /// Add a class.
    pub fn add_class(&mut self, class: &str) -> &mut Self {
        self.set_class(class, true)
    }

    /// Whether the element carries `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// All classes, sorted.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(name.to_owned(), value.into());
        self
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, property: &str, value: impl Into<String>) -> &mut Self {
        self.styles.insert(property.to_owned(), value.into());
        self
    }

    /// Inline style property, if set.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    /// Replace the text content.
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Text content, if the model manages it.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Hide (`display: none`) or show the element.
    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    /// Whether the element is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Enable or disable a form control.
    pub fn set_disabled(&mut self, disabled: bool) -> &mut Self {
        self.disabled = disabled;
        self
    }

    /// Whether the control is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// A complete render of the managed page state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    root_attributes: BTreeMap<String, String>,
    elements: BTreeMap<ElementId, Element>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute on the document root (`<html>`).
    pub fn set_root_attr(&mut self, name: &str, value: impl Into<String>) {
        self.root_attributes.insert(name.to_owned(), value.into());
    }

    /// Root attribute value, if set.
    #[must_use]
    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    /// Mutable access to an element, inserting an empty one if absent.
    pub fn element_mut(&mut self, id: impl Into<ElementId>) -> &mut Element {
        self.elements.entry(id.into()).or_default()
    }

    /// Element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(&ElementId::from(id))
    }

    /// Whether `id` carries `class`. Missing elements carry nothing.
    #[must_use]
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Iterate elements in id order.
    pub fn elements(&self) -> impl Iterator<Item = (&ElementId, &Element)> {
        self.elements.iter()
    }

    /// Number of managed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document manages no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty() && self.root_attributes.is_empty()
    }

    /// Compute the patches that turn `prev` into `next`.
    #[must_use]
    pub fn diff(prev: &Document, next: &Document) -> Vec<Patch> {
        let mut patches = Vec::new();

        diff_map(&prev.root_attributes, &next.root_attributes, |name, value| {
            patches.push(match value {
                Some(v) => Patch::SetRootAttr {
                    name: name.to_owned(),
                    value: v.to_owned(),
                },
                None => Patch::RemoveRootAttr {
                    name: name.to_owned(),
                },
            });
        });

        let empty = Element::default();
        for (id, old) in &prev.elements {
            if !next.elements.contains_key(id) {
                patches.push(Patch::Remove { id: id.clone() });
            } else {
                diff_element(id, old, &next.elements[id], &mut patches);
            }
        }
        for (id, new) in &next.elements {
            if !prev.elements.contains_key(id) {
                patches.push(Patch::Insert { id: id.clone() });
                diff_element(id, &empty, new, &mut patches);
            }
        }
        patches
    }

    /// Apply patches in order.
    pub fn apply(&mut self, patches: &[Patch]) {
        for patch in patches {
            match patch {
                Patch::SetRootAttr { name, value } => self.set_root_attr(name, value.clone()),
                Patch::RemoveRootAttr { name } => {
                    self.root_attributes.remove(name);
                }
                Patch::Insert { id } => {
                    self.elements.entry(id.clone()).or_default();
                }
                Patch::Remove { id } => {
                    self.elements.remove(id);
                }
                Patch::AddClass { id, class } => {
                    self.element_mut(id).add_class(class);
                }
                Patch::RemoveClass { id, class } => {
                    self.element_mut(id).set_class(class, false);
                }
                Patch::SetAttr { id, name, value } => {
                    self.element_mut(id).set_attr(name, value.clone());
                }
                Patch::RemoveAttr { id, name } => {
                    self.element_mut(id).attributes.remove(name);
                }
                Patch::SetStyle { id, property, value } => {
                    self.element_mut(id).set_style(property, value.clone());
                }
                Patch::RemoveStyle { id, property } => {
                    self.element_mut(id).styles.remove(property);
                }
                Patch::SetText { id, text } => {
                    self.element_mut(id).text = text.clone();
                }
                Patch::SetHidden { id, hidden } => {
                    self.element_mut(id).set_hidden(*hidden);
                }
                Patch::SetDisabled { id, disabled } => {
                    self.element_mut(id).set_disabled(*disabled);
                }
            }
        }
    }
}

fn diff_map(
    prev: &BTreeMap<String, String>,
    next: &BTreeMap<String, String>,
    mut emit: impl FnMut(&str, Option<&str>),
) {
    for (k, v) in next {
        if prev.get(k) != Some(v) {
            emit(k, Some(v));
        }
    }
    for k in prev.keys() {
        if !next.contains_key(k) {
            emit(k, None);
        }
    }
}

fn diff_element(id: &ElementId, old: &Element, new: &Element, out: &mut Vec<Patch>) {
    for class in new.classes.difference(&old.classes) {
        out.push(Patch::AddClass {
            id: id.clone(),
            class: class.clone(),
        });
    }
    for class in old.classes.difference(&new.classes) {
        out.push(Patch::RemoveClass {
            id: id.clone(),
            class: class.clone(),
        });
    }
    diff_map(&old.attributes, &new.attributes, |name, value| {
        out.push(match value {
            Some(v) => Patch::SetAttr {
                id: id.clone(),
                name: name.to_owned(),
                value: v.to_owned(),
            },
            None => Patch::RemoveAttr {
                id: id.clone(),
                name: name.to_owned(),
            },
        });
    });
    diff_map(&old.styles, &new.styles, |property, value| {
        out.push(match value {
            Some(v) => Patch::SetStyle {
                id: id.clone(),
                property: property.to_owned(),
                value: v.to_owned(),
            },
            None => Patch::RemoveStyle {
                id: id.clone(),
                property: property.to_owned(),
            },
        });
    });
    if old.text != new.text {
        out.push(Patch::SetText {
            id: id.clone(),
            text: new.text.clone(),
        });
    }
    if old.hidden != new.hidden {
        out.push(Patch::SetHidden {
            id: id.clone(),
            hidden: new.hidden,
        });
    }
    if old.disabled != new.disabled {
        out.push(Patch::SetDisabled {
            id: id.clone(),
            disabled: new.disabled,
        });
    }
}

/// One change the host applies to the live page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
    /// Set an attribute on the document root.
    SetRootAttr { name: String, value: String },
    /// Remove an attribute from the document root.
    RemoveRootAttr { name: String },
    /// A managed element appeared (create it if the markup lacks it).
    Insert { id: ElementId },
    /// A managed element disappeared (remove it from the page).
    Remove { id: ElementId },
    AddClass { id: ElementId, class: String },
    RemoveClass { id: ElementId, class: String },
    SetAttr { id: ElementId, name: String, value: String },
    RemoveAttr { id: ElementId, name: String },
    SetStyle { id: ElementId, property: String, value: String },
    RemoveStyle { id: ElementId, property: String },
    /// Replace text content; `None` leaves the markup's text to the page.
    SetText { id: ElementId, text: Option<String> },
    SetHidden { id: ElementId, hidden: bool },
    SetDisabled { id: ElementId, disabled: bool },
}

/// A one-shot imperative request to the host.
///
/// Unlike document state these are not re-derived on every render: they are
/// emitted once, by the update that decided them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// Scroll the window to an absolute vertical offset.
    ScrollTo {
        /// Target offset in CSS pixels.
        top: u32,
        /// Animate the scroll instead of jumping.
        smooth: bool,
    },
    /// Reset all controls of a form to their initial values.
    ResetForm(ElementId),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.set_root_attr("data-color-scheme", "dark");
        doc.element_mut("hamburger").add_class("active");
        doc.element_mut("progress-0").set_style("width", "90%");
        doc
    }

    #[test]
    fn diff_of_identical_documents_is_empty() {
        let doc = sample();
        assert!(Document::diff(&doc, &doc).is_empty());
    }

    #[test]
    fn diff_reports_class_changes() {
        let prev = sample();
        let mut next = sample();
        next.element_mut("hamburger").set_class("active", false);
        next.element_mut("nav-menu").add_class("active");

        let patches = Document::diff(&prev, &next);
        assert!(patches.contains(&Patch::RemoveClass {
            id: "hamburger".into(),
            class: "active".into()
        }));
        assert!(patches.contains(&Patch::Insert {
            id: "nav-menu".into()
        }));
        assert!(patches.contains(&Patch::AddClass {
            id: "nav-menu".into(),
            class: "active".into()
        }));
    }

    #[test]
    fn diff_reports_root_attribute_change() {
        let prev = sample();
        let mut next = sample();
        next.set_root_attr("data-color-scheme", "light");
        assert_eq!(
            Document::diff(&prev, &next),
            vec![Patch::SetRootAttr {
                name: "data-color-scheme".into(),
                value: "light".into()
            }]
        );
    }

    #[test]
    fn apply_diff_reconstructs_target() {
        let prev = sample();
        let mut next = Document::new();
        next.set_root_attr("data-color-scheme", "light");
        next.element_mut("toast").set_text("sent").set_style("transform", "translateX(0)");
        next.element_mut("submit").set_disabled(true).set_attr("aria-busy", "true");

        let mut patched = prev.clone();
        patched.apply(&Document::diff(&prev, &next));
        assert_eq!(patched, next);
    }

    #[test]
    fn removed_elements_emit_remove() {
        let prev = sample();
        let mut next = prev.clone();
        next.elements.remove(&ElementId::from("progress-0"));
        assert_eq!(
            Document::diff(&prev, &next),
            vec![Patch::Remove {
                id: "progress-0".into()
            }]
        );
    }

    #[test]
    fn missing_element_has_no_class() {
        assert!(!Document::new().has_class("nowhere", "visible"));
    }
}
