//! Scroll binding: feeds scroll offsets into an [`AnimationRegistry`].
//!
//! The binding owns its subscription lifecycle and holds exactly one
//! registry. Reading the platform offset and delivering change
//! notifications are external concerns, abstracted as [`ScrollSource`] and
//! [`ScrollEvents`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::animation::registry::AnimationRegistry;
use crate::animation::style::StyleTarget;
use crate::error::{RelaxError, Result};

/// Reads the current scroll offset.
pub trait ScrollSource {
    fn name(&self) -> &str;

    /// Current offset, or `None` when this source is unavailable in the environment.
    fn offset(&self) -> Option<f64>;
}

/// Settable scroll offset shared between clones.
#[derive(Debug, Clone)]
pub struct ScrollOffset {
    name: String,
    offset: Rc<Cell<Option<f64>>>,
}

impl ScrollOffset {
    pub fn new(name: impl Into<String>, offset: f64) -> Self {
        Self {
            name: name.into(),
            offset: Rc::new(Cell::new(Some(offset))),
        }
    }

    /// A source that reports itself unavailable until [`ScrollOffset::set`] is called.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: Rc::new(Cell::new(None)),
        }
    }

    pub fn set(&self, offset: f64) {
        self.offset.set(Some(offset));
    }
}

impl ScrollSource for ScrollOffset {
    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> Option<f64> {
        self.offset.get()
    }
}

pub type ScrollListener = Rc<dyn Fn()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Scroll change notification channel.
pub trait ScrollEvents {
    fn subscribe(&self, listener: ScrollListener) -> ListenerId;

    /// Returns `false` if `id` was not subscribed.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Synchronous in-process [`ScrollEvents`] implementation.
#[derive(Default)]
pub struct ScrollNotifier {
    listeners: RefCell<Vec<(ListenerId, ScrollListener)>>,
    next_id: Cell<u64>,
}

impl ScrollNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call every listener once, in subscription order.
    pub fn notify(&self) {
        // Listeners may (un)subscribe while being called
        let listeners: Vec<ScrollListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ScrollEvents for ScrollNotifier {
    fn subscribe(&self, listener: ScrollListener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

/// Connects one registry to a scroll source and its change notifications.
///
/// Call [`ScrollBinding::disable`] before dropping an enabled binding. The
/// subscribed listener holds its own `Rc` of the registry, so dropping the
/// binding alone leaves the listener rendering and the registry alive until
/// the event source drops it.
pub struct ScrollBinding<H> {
    registry: Rc<RefCell<AnimationRegistry<H>>>,
    candidates: Vec<Rc<dyn ScrollSource>>,
    source: Option<Rc<dyn ScrollSource>>,
    subscription: Option<ListenerId>,
}

impl<H: StyleTarget + 'static> ScrollBinding<H> {
    pub fn new(registry: Rc<RefCell<AnimationRegistry<H>>>) -> Self {
        Self {
            registry,
            candidates: Vec::new(),
            source: None,
            subscription: None,
        }
    }

    /// Add a candidate source. Candidates are tried in the order added.
    pub fn with_source(mut self, source: Rc<dyn ScrollSource>) -> Self {
        self.candidates.push(source);
        self
    }

    pub fn registry(&self) -> &Rc<RefCell<AnimationRegistry<H>>> {
        &self.registry
    }

    pub fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }

    /// Name of the source picked by the last `enable`.
    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref().map(|s| s.name())
    }

    fn resolve_source(&self) -> Option<Rc<dyn ScrollSource>> {
        self.candidates
            .iter()
            .find(|source| source.offset().is_some())
            .cloned()
    }

    /// Resolve a source, subscribe to scroll changes and render once.
    pub fn enable(&mut self, events: &dyn ScrollEvents) -> Result<()> {
        if self.is_enabled() {
            tracing::warn!("scroll binding already enabled");
            return Ok(());
        }

        let source = self.resolve_source().ok_or(RelaxError::NoScrollSource)?;
        tracing::debug!(source = %source.name(), "scroll binding enabled");

        let registry = Rc::clone(&self.registry);
        let listener_source = Rc::clone(&source);
        let listener: ScrollListener =
            Rc::new(move || render_from(&registry, listener_source.as_ref()));

        self.subscription = Some(events.subscribe(listener));
        self.source = Some(source);
        self.on_scroll();
        Ok(())
    }

    /// Unsubscribe and clear every element's style.
    pub fn disable(&mut self, events: &dyn ScrollEvents) {
        if let Some(id) = self.subscription.take() {
            if !events.unsubscribe(id) {
                tracing::warn!(?id, "scroll listener was already removed");
            }
        }
        self.source = None;
        match self.registry.try_borrow() {
            Ok(registry) => registry.reset(),
            Err(_) => tracing::warn!("registry busy; style not reset"),
        }
    }

    /// Render at the current offset of the active source.
    pub fn on_scroll(&self) {
        if let Some(source) = &self.source {
            render_from(&self.registry, source.as_ref());
        }
    }
}

fn render_from<H: StyleTarget>(registry: &RefCell<AnimationRegistry<H>>, source: &dyn ScrollSource) {
    let Some(offset) = source.offset() else {
        tracing::warn!(source = %source.name(), "scroll source stopped reporting an offset");
        return;
    };
    match registry.try_borrow() {
        Ok(registry) => registry.render(offset),
        // A registration is in flight; the next notification renders.
        Err(_) => tracing::warn!(offset, "registry busy; skipping scroll frame"),
    }
}
