//! Style application boundary.
//!
//! The engine never owns visual objects. It writes through [`StyleTarget`]
//! handles: set one property, or clear everything previously set. An
//! [`ElementSet`] holds one or more handles and fans every write out to all
//! of them.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::compiler::PropertySet;

/// Handle to an external visual object.
///
/// Methods take `&self`: a handle refers to state owned elsewhere.
pub trait StyleTarget {
    /// Set property `name` to `value`.
    fn set_property(&self, name: &str, value: &str);

    /// Remove every explicitly set property.
    fn clear_style(&self);
}

impl<T: StyleTarget + ?Sized> StyleTarget for Rc<T> {
    fn set_property(&self, name: &str, value: &str) {
        (**self).set_property(name, value);
    }

    fn clear_style(&self) {
        (**self).clear_style();
    }
}

/// One or more handles receiving identical writes.
#[derive(Debug, Clone)]
pub struct ElementSet<H> {
    handles: Vec<H>,
}

impl<H> ElementSet<H> {
    pub fn single(handle: H) -> Self {
        Self {
            handles: vec![handle],
        }
    }

    pub fn many(handles: Vec<H>) -> Self {
        Self { handles }
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<H: StyleTarget> ElementSet<H> {
    pub fn set_property(&self, name: &str, value: &str) {
        for handle in &self.handles {
            handle.set_property(name, value);
        }
    }

    pub fn apply(&self, properties: &PropertySet) {
        for (name, value) in properties {
            self.set_property(name, value);
        }
    }

    pub fn clear_style(&self) {
        for handle in &self.handles {
            handle.clear_style();
        }
    }
}

impl<H> From<H> for ElementSet<H> {
    fn from(handle: H) -> Self {
        Self::single(handle)
    }
}

impl<H> FromIterator<H> for ElementSet<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        Self {
            handles: iter.into_iter().collect(),
        }
    }
}

/// In-memory inline style, shared between clones.
///
/// Used by the demo runner and tests as a stand-in for a real element.
#[derive(Debug, Clone, Default)]
pub struct InlineStyle {
    properties: Rc<RefCell<BTreeMap<String, String>>>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.properties.borrow().get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.borrow().is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.properties.borrow().clone()
    }

    /// Render as a `style` attribute body, e.g. `marginLeft: 10px; opacity: 0.5`.
    pub fn to_css_text(&self) -> String {
        self.properties
            .borrow()
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl StyleTarget for InlineStyle {
    fn set_property(&self, name: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn clear_style(&self) {
        self.properties.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_style_shared_between_clones() {
        let style = InlineStyle::new();
        let handle = style.clone();
        handle.set_property("opacity", "0.5");
        assert_eq!(style.get("opacity").as_deref(), Some("0.5"));

        handle.clear_style();
        assert!(style.is_empty());
    }

    #[test]
    fn test_element_set_fans_out() {
        let a = InlineStyle::new();
        let b = InlineStyle::new();
        let set = ElementSet::many(vec![a.clone(), b.clone()]);

        let mut props = PropertySet::new();
        props.insert("width".to_string(), "10px".to_string());
        props.insert("opacity".to_string(), "1".to_string());
        set.apply(&props);

        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.to_css_text(), "opacity: 1; width: 10px");

        set.clear_style();
        assert!(a.is_empty() && b.is_empty());
    }

    #[test]
    fn test_rc_dyn_handles() {
        let inner = InlineStyle::new();
        let handle: Rc<dyn StyleTarget> = Rc::new(inner.clone());
        let set = ElementSet::single(handle);
        set.set_property("height", "2px");
        assert_eq!(inner.get("height").as_deref(), Some("2px"));
        assert_eq!(set.len(), 1);
    }
}
