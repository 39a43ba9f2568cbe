//! Asynchronously loaded particle images.
//!
//! A handle starts out `Loading` and is resolved by the host between frames. Particles
//! holding an unresolved or failed handle still move and get culled, they just draw nothing.

use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconState<I> {
    Loading,
    Ready(I),
    Failed,
}

/// Shared slot for an image that may not have finished loading.
#[derive(Debug)]
pub struct IconHandle<I>(Arc<RwLock<IconState<I>>>);

impl<I> Clone for IconHandle<I> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<I> Default for IconHandle<I> {
    fn default() -> Self {
        Self::loading()
    }
}

impl<I> IconHandle<I> {
    pub fn loading() -> Self {
        Self(Arc::new(RwLock::new(IconState::Loading)))
    }

    pub fn resolve(&self, image: I) {
        *self.0.write() = IconState::Ready(image);
    }

    pub fn fail(&self) {
        *self.0.write() = IconState::Failed;
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.0.read(), IconState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.0.read(), IconState::Ready(_))
    }

    /// Runs `f` with the loaded image, if there is one.
    pub fn with_ready<R>(&self, f: impl FnOnce(&I) -> R) -> Option<R> {
        match &*self.0.read() {
            IconState::Ready(image) => Some(f(image)),
            IconState::Loading | IconState::Failed => None,
        }
    }

    /// Whether both handles point at the same slot.
    pub fn same_slot(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Starts loading an icon source and hands back a handle to its eventual image.
pub trait IconLoader {
    type Image;

    fn load(&mut self, source: &str) -> IconHandle<Self::Image>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_resolution() {
        let handle = IconHandle::<u32>::loading();
        let held_by_particle = handle.clone();
        assert!(held_by_particle.is_loading(), "starts loading");
        assert!(held_by_particle.with_ready(|_| ()).is_none(), "nothing to draw yet");

        handle.resolve(42);
        assert_eq!(held_by_particle.with_ready(|image| *image), Some(42), "resolved");
        assert!(handle.same_slot(&held_by_particle), "shared slot");
    }

    #[test]
    fn failed_handles_never_draw() {
        let handle = IconHandle::<u32>::loading();
        handle.fail();
        assert!(!handle.is_loading(), "no longer loading");
        assert!(!handle.is_ready(), "not ready");
        assert!(handle.with_ready(|_| ()).is_none(), "nothing to draw");
    }
}
