//! Rendering components into queryable screens.

use crate::config::QueryConfig;
use crate::element::Element;
use crate::queries::Screen;
use crate::snapshot::Snapshot;

/// Anything that produces an element tree
pub trait Component {
    /// Build the element tree for the current state
    fn render(&self) -> Element;
}

impl Component for Element {
    fn render(&self) -> Element {
        self.clone()
    }
}

impl<C: Component + ?Sized> Component for &C {
    fn render(&self) -> Element {
        (**self).render()
    }
}

impl<C: Component + ?Sized> Component for Box<C> {
    fn render(&self) -> Element {
        (**self).render()
    }
}

/// Render a component with the default configuration
#[must_use]
pub fn render<C: Component + ?Sized>(component: &C) -> Screen {
    render_with_config(component, QueryConfig::default())
}

/// Render a component with an explicit configuration
#[must_use]
pub fn render_with_config<C: Component + ?Sized>(component: &C, config: QueryConfig) -> Screen {
    let element = component.render();
    let snapshot = Snapshot::render(&element);
    tracing::trace!(nodes = snapshot.len(), root = %element.tag, "component rendered");
    Screen::new(snapshot, config)
}
