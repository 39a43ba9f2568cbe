//! Loads confetti icons through the asset server.

use bevy::asset::LoadState;
use bevy::prelude::*;
use confetti::{IconHandle, IconLoader};

pub type ImageIcon = IconHandle<Handle<Image>>;

/// Icons requested by the confetti engine that the asset server has not finished yet.
#[derive(Resource, Default)]
pub struct PendingIcons(Vec<(Handle<Image>, ImageIcon)>);

impl PendingIcons {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct AssetIconLoader<'a> {
    pub asset_server: &'a AssetServer,
    pub pending: &'a mut PendingIcons,
}

impl IconLoader for AssetIconLoader<'_> {
    type Image = Handle<Image>;

    fn load(&mut self, source: &str) -> ImageIcon {
        let image = self.asset_server.load::<Image>(source.to_owned());
        let icon = IconHandle::loading();
        self.pending.0.push((image, icon.clone()));
        icon
    }
}

/// Hands finished images to the particles waiting on them.
pub fn resolve_pending_icons(asset_server: Res<AssetServer>, mut pending: ResMut<PendingIcons>) {
    if pending.is_empty() {
        return;
    }

    pending
        .0
        .retain(|(image, icon)| match asset_server.get_load_state(image) {
            Some(LoadState::Loaded) => {
                debug!("Confetti icon {:?} loaded", image.path());
                icon.resolve(image.clone());
                false
            }
            Some(LoadState::Failed(error)) => {
                warn!("Confetti icon failed to load, particles stay blank: {error}");
                icon.fail();
                false
            }
            Some(LoadState::NotLoaded | LoadState::Loading) | None => true,
        });
}
