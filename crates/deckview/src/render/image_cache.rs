use std::collections::HashMap;

use eframe::egui;

/// Loads and caches slide images as egui textures, keyed by the resolved
/// reference. Remote references are fetched over HTTP, local ones read from
/// disk. A failed load is cached as `None` so it is not retried every
/// frame.
pub struct ImageCache {
    textures: HashMap<String, Option<egui::TextureHandle>>,
    agent: ureq::Agent,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCache {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            agent: ureq::Agent::new_with_defaults(),
        }
    }

    pub fn get(&mut self, ctx: &egui::Context, reference: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.get(reference) {
            return cached.clone();
        }
        let loaded = self.load(ctx, reference);
        self.textures.insert(reference.to_string(), loaded.clone());
        loaded
    }

    fn load(&self, ctx: &egui::Context, reference: &str) -> Option<egui::TextureHandle> {
        let bytes = self.read_bytes(reference)?;
        let image = image::load_from_memory(&bytes).ok()?.into_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        Some(ctx.load_texture(reference, color_image, egui::TextureOptions::LINEAR))
    }

    fn read_bytes(&self, reference: &str) -> Option<Vec<u8>> {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            let mut response = self.agent.get(reference).call().ok()?;
            response.body_mut().read_to_vec().ok()
        } else {
            std::fs::read(reference).ok()
        }
    }
}
