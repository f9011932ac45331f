//! The ordered collection of live drawables.

use crate::drawable::{Drawable, DrawableKind};
use crate::render::RenderTarget;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    entries: Vec<Drawable>,
    /// Bumped on every mutation.
    revision: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, drawable: impl Into<Drawable>) {
        self.entries.push(drawable.into());
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.revision += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Drawable> {
        self.entries.iter()
    }

    pub fn get(&self, idx: usize) -> Option<&Drawable> {
        self.entries.get(idx)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether any animation is still running.
    pub fn is_animating(&self) -> bool {
        self.entries
            .iter()
            .any(|d| d.kind() == DrawableKind::Animated && !d.is_finished())
    }

    /// Draw every entry in insertion order.
    pub fn draw_all(&mut self, target: &mut dyn RenderTarget) {
        for entry in self.entries.iter_mut() {
            entry.draw(target);
        }
    }

    /// Drop finished animations in place. Returns how many were removed.
    pub fn prune_finished(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|d| !d.is_finished());
        let removed = before - self.entries.len();
        if removed > 0 {
            self.revision += 1;
        }
        removed
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Drawable;
    type IntoIter = std::slice::Iter<'a, Drawable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
