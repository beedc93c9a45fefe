//! Texture loading with graceful degradation.
//!
//! The block highlight and logo textures are decoration; a missing or
//! undecodable file logs a warning and yields a transparent 1x1 texture so
//! the animation still runs.

use anyhow::{Context, Result};

pub fn load_texture_or_blank(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &str,
    label: &'static str,
) -> wgpu::TextureView {
    match load_texture(device, queue, path, label) {
        Ok(view) => view,
        Err(e) => {
            log::warn!("texture '{path}' unavailable ({e:#}); rendering without it");
            blank_texture(device, queue, label)
        }
    }
}

fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &str,
    label: &'static str,
) -> Result<wgpu::TextureView> {
    let img = image::open(path).with_context(|| format!("decoding {path}"))?;
    // Quad UVs put v = 0 at the bottom edge, so store rows bottom-up.
    let rgba = img.flipv().to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(upload_rgba(device, queue, label, width, height, &rgba))
}

fn blank_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &'static str,
) -> wgpu::TextureView {
    upload_rgba(device, queue, label, 1, 1, &[0, 0, 0, 0])
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &'static str,
    width: u32,
    height: u32,
    pixels: &[u8],
) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
