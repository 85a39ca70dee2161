use super::helpers;
use crate::core::constants::MSAA_SAMPLES;
use crate::core::post::Target;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Multisampled color and depth for the base scene pass. The color resolves
/// into either the post chain's scene target or the surface.
pub(crate) struct BaseTargets {
    format: wgpu::TextureFormat,
    msaa_tex: wgpu::Texture,
    pub(crate) msaa_view: wgpu::TextureView,
    depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
}

impl BaseTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let (msaa_tex, msaa_view, depth_tex, depth_view) =
            Self::create(device, format, width, height);
        Self {
            format,
            msaa_tex,
            msaa_view,
            depth_tex,
            depth_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (msaa_tex, msaa_view, depth_tex, depth_view) =
            Self::create(device, self.format, width, height);
        self.msaa_tex = msaa_tex;
        self.msaa_view = msaa_view;
        self.depth_tex = depth_tex;
        self.depth_view = depth_view;
    }

    pub(crate) fn destroy(&self) {
        self.msaa_tex.destroy();
        self.depth_tex.destroy();
    }

    fn create(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> (
        wgpu::Texture,
        wgpu::TextureView,
        wgpu::Texture,
        wgpu::TextureView,
    ) {
        let (msaa_tex, msaa_view) = helpers::create_render_texture(
            device,
            "base_msaa",
            width,
            height,
            format,
            MSAA_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (depth_tex, depth_view) = helpers::create_render_texture(
            device,
            "base_depth",
            width,
            height,
            DEPTH_FORMAT,
            MSAA_SAMPLES,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        (msaa_tex, msaa_view, depth_tex, depth_view)
    }
}

/// Single-sample offscreen colors for the post chain: the resolved scene
/// plus two ping-pong intermediates, all in the surface format.
pub(crate) struct PostTargets {
    format: wgpu::TextureFormat,
    textures: [wgpu::Texture; 3],
    views: [wgpu::TextureView; 3],
}

impl PostTargets {
    pub(crate) fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let (textures, views) = Self::create(device, format, width, height);
        Self {
            format,
            textures,
            views,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        for tex in &self.textures {
            tex.destroy();
        }
        (self.textures, self.views) = Self::create(device, self.format, width, height);
    }

    pub(crate) fn destroy(&self) {
        for tex in &self.textures {
            tex.destroy();
        }
    }

    /// View for an offscreen target; `Screen` has no view here.
    pub(crate) fn view(&self, target: Target) -> Option<&wgpu::TextureView> {
        match target {
            Target::Scene => Some(&self.views[0]),
            Target::Ping => Some(&self.views[1]),
            Target::Pong => Some(&self.views[2]),
            Target::Screen => None,
        }
    }

    fn create(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> ([wgpu::Texture; 3], [wgpu::TextureView; 3]) {
        let usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        let (scene, scene_view) =
            helpers::create_render_texture(device, "post_scene", width, height, format, 1, usage);
        let (ping, ping_view) =
            helpers::create_render_texture(device, "post_ping", width, height, format, 1, usage);
        let (pong, pong_view) =
            helpers::create_render_texture(device, "post_pong", width, height, format, 1, usage);
        ([scene, ping, pong], [scene_view, ping_view, pong_view])
    }
}
