//! Upload of the CPU canvas into a Bevy texture.

use bevy::image::ImageSampler;
use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use simulation::scene::Viewport;

use super::canvas::PixelCanvas;

/// Create an opaque black RGBA image at logical resolution, sampled with
/// nearest filtering so every logical pixel becomes a crisp block.
pub(crate) fn create_canvas_image(viewport: Viewport) -> Image {
    let data = [0u8, 0, 0, 255].repeat(viewport.pixel_count());
    let mut image = Image::new(
        Extent3d {
            width: viewport.width,
            height: viewport.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = ImageSampler::nearest();
    image
}

/// Copy `canvas` into `image`, recreating the image first if the canvas
/// size changed.
pub(crate) fn upload_canvas(canvas: &PixelCanvas, image: &mut Image) {
    let viewport = canvas.viewport();
    if image.width() != viewport.width || image.height() != viewport.height {
        *image = create_canvas_image(viewport);
    }
    image.data.clear();
    image.data.extend_from_slice(canvas.as_bytes());
}
