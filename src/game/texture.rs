//! Procedural textures
//!
//! Demos have no asset pipeline: `preload` paints simple shapes into
//! images and uploads them under a string key. Drawing code asks the cache
//! for a key and falls back to a plain shape when it is missing.

use std::collections::HashMap;

use macroquad::prelude::*;

#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<String, Texture2D>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled rectangle texture
    pub fn rect(&mut self, key: &str, width: u16, height: u16, color: Color) {
        let image = Image::gen_image_color(width.max(1), height.max(1), color);
        self.insert_image(key, &image);
    }

    /// Filled circle on a transparent background
    pub fn circle(&mut self, key: &str, radius: u16, color: Color) {
        let size = radius.max(1) * 2;
        let mut image = Image::gen_image_color(size, size, Color::new(0.0, 0.0, 0.0, 0.0));
        let r = radius.max(1) as f32;
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - r;
                let dy = y as f32 + 0.5 - r;
                if dx * dx + dy * dy <= r * r {
                    image.set_pixel(x as u32, y as u32, color);
                }
            }
        }
        self.insert_image(key, &image);
    }

    /// Rectangle with a darker outline, for buttons and platforms
    pub fn outlined_rect(&mut self, key: &str, width: u16, height: u16, fill: Color, outline: Color) {
        let (w, h) = (width.max(3), height.max(3));
        let mut image = Image::gen_image_color(w, h, fill);
        for x in 0..w as u32 {
            image.set_pixel(x, 0, outline);
            image.set_pixel(x, h as u32 - 1, outline);
        }
        for y in 0..h as u32 {
            image.set_pixel(0, y, outline);
            image.set_pixel(w as u32 - 1, y, outline);
        }
        self.insert_image(key, &image);
    }

    fn insert_image(&mut self, key: &str, image: &Image) {
        let texture = Texture2D::from_image(image);
        texture.set_filter(FilterMode::Nearest);
        self.textures.insert(key.to_string(), texture);
    }

    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.textures.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Draw texture `key` centred on `center` with the given size and tint.
    /// Missing textures draw as a tinted rectangle so a typo is visible.
    pub fn draw_centered(&self, key: &str, center: Vec2, size: Vec2, tint: Color) {
        let top_left = center - size * 0.5;
        match self.get(key) {
            Some(texture) => draw_texture_ex(
                texture,
                top_left.x,
                top_left.y,
                tint,
                DrawTextureParams {
                    dest_size: Some(size),
                    ..Default::default()
                },
            ),
            None => draw_rectangle(top_left.x, top_left.y, size.x, size.y, tint),
        }
    }
}
