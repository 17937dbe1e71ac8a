//! Scoped text suppression
//!
//! [`TextSuppression`] turns a surface's text entry points into no-ops for as
//! long as the guard lives, and puts back whatever state the surface had when
//! the guard was taken. Restoration runs on drop, so it also happens when a
//! render pass returns early with an error or is cancelled.

use std::ops::{Deref, DerefMut};

use super::surface::DrawingSurface;

/// Guard that disables text drawing on a borrowed surface
pub struct TextSuppression<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
    previous: bool,
}

impl<'a, S: DrawingSurface + ?Sized> TextSuppression<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let previous = surface.text_enabled();
        surface.set_text_enabled(false);
        Self { surface, previous }
    }
}

impl<S: DrawingSurface + ?Sized> Deref for TextSuppression<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.surface
    }
}

impl<S: DrawingSurface + ?Sized> DerefMut for TextSuppression<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.surface
    }
}

impl<S: DrawingSurface + ?Sized> Drop for TextSuppression<'_, S> {
    fn drop(&mut self) {
        self.surface.set_text_enabled(self.previous);
    }
}
