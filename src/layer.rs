//! Items and the layer container.

use crate::drawable::SharedDrawable;
use crate::foundation::color::Rgba8;
use crate::foundation::geometry::{OptRect, Rect};

/// One plotted entry: a shared drawable, its color and the outline flag.
/// Immutable once constructed.
#[derive(Clone)]
pub struct Item {
    pub(crate) drawable: SharedDrawable,
    /// Fill or stroke color.
    pub color: Rgba8,
    /// Draw as an outline instead of a filled shape.
    pub outline: bool,
}

impl Item {
    /// Build an item from a shared drawable handle.
    pub fn new(drawable: SharedDrawable, color: Rgba8, outline: bool) -> Self {
        Self {
            drawable,
            color,
            outline,
        }
    }

    /// The drawable handle.
    pub fn drawable(&self) -> &SharedDrawable {
        &self.drawable
    }
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item")
            .field("color", &self.color)
            .field("outline", &self.outline)
            .finish_non_exhaustive()
    }
}

/// Ordered, append-only collection of committed items with a cached
/// bounding box.
///
/// Invariant: once marked valid, the cached box equals the union of the
/// model-space boxes of every item in the layer; any mutation invalidates
/// the cache.
#[derive(Debug, Default)]
pub(crate) struct Layer {
    items: Vec<Item>,
    bbox: OptRect,
}

impl Layer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, item: Item) {
        self.items.push(item);
        self.bbox.clear();
    }

    pub(crate) fn items(&self) -> &[Item] {
        &self.items
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.bbox.clear();
    }

    pub(crate) fn bounding_box(&self) -> &OptRect {
        &self.bbox
    }

    pub(crate) fn set_bounding_box(&mut self, r: Rect) {
        self.bbox.set(r);
    }
}
