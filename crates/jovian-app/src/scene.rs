//! Scene composition: everything drawn each frame, built once at startup.

use glam::Vec3;
use jovian_config::{Config, LensFlareConfig};
use jovian_planet::{
    AtmosphereRenderer, PLANET_RADIUS, PlanetBindings, ShaderError, SunLight, SurfaceRenderer,
};
use jovian_render::{
    Camera, DepthBuffer, FrameEncoder, LensFlareRenderer, LensFlareSettings, Occluder,
    RenderContext, RenderPassBuilder, SurfaceError, TextureError, load_rgba_image,
};
use jovian_shading::{FrameInputs, ShaderParams};
use tracing::info;

/// Fatal errors while building the scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error("failed to load lens dirt texture: {0}")]
    LensDirt(#[from] TextureError),
}

/// Flare settings with the configured overrides applied.
pub fn lens_flare_settings(config: &LensFlareConfig) -> LensFlareSettings {
    LensFlareSettings {
        enabled: config.enabled,
        opacity: config.opacity.clamp(0.0, 1.0),
        ..Default::default()
    }
}

/// The planet body blocks the sun; the atmosphere shell does not.
pub fn sun_occluders() -> [Occluder; 1] {
    [Occluder {
        center: Vec3::ZERO,
        radius: PLANET_RADIUS,
    }]
}

/// Sun, planet, atmosphere and lens flare with their GPU resources.
pub struct Scene {
    pub sun: SunLight,
    bindings: PlanetBindings,
    surface: SurfaceRenderer,
    atmosphere: AtmosphereRenderer,
    lens_flare: LensFlareRenderer,
    depth: DepthBuffer,
}

impl Scene {
    pub fn new(gpu: &RenderContext, config: &Config) -> Result<Self, SceneError> {
        let device = &gpu.device;
        let format = gpu.surface_format;
        let (width, height) = gpu.size();

        let bindings = PlanetBindings::new(device);
        let surface = SurfaceRenderer::new(device, format, &bindings)?;
        let atmosphere = AtmosphereRenderer::new(device, format, &bindings)?;

        let dirt = config
            .lens_flare
            .dirt_texture
            .as_deref()
            .map(load_rgba_image)
            .transpose()?;
        let lens_flare = LensFlareRenderer::new(
            device,
            &gpu.queue,
            format,
            lens_flare_settings(&config.lens_flare),
            dirt.as_ref(),
        );

        let depth = DepthBuffer::new(device, width, height);

        info!(
            flare_elements = lens_flare.element_count(),
            "Scene ready ({width}x{height})"
        );

        Ok(Self {
            sun: SunLight::default(),
            bindings,
            surface,
            atmosphere,
            lens_flare,
            depth,
        })
    }

    pub fn resize(&mut self, gpu: &RenderContext) {
        let (width, height) = gpu.size();
        self.depth.resize(&gpu.device, width, height);
    }

    /// Upload this frame's uniforms, draw and present.
    pub fn render(
        &mut self,
        gpu: &RenderContext,
        camera: &Camera,
        params: &ShaderParams,
        frame: FrameInputs,
        dt: f32,
    ) -> Result<(), SurfaceError> {
        let surface_texture = gpu.get_current_texture()?;

        self.bindings
            .update(&gpu.queue, camera, &self.sun, params, frame);
        let flare_visible = self.lens_flare.update(
            &gpu.queue,
            camera,
            self.sun.position,
            &sun_occluders(),
            dt,
        );

        let mut encoder = FrameEncoder::new(&gpu.device, gpu.queue.clone(), surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .depth(&self.depth)
                .label("planet-pass");
            let mut pass = encoder.begin_render_pass(&builder);
            self.surface.render(&mut pass, &self.bindings);
            self.atmosphere.render(&mut pass, &self.bindings);
        }
        if flare_visible {
            let builder = RenderPassBuilder::new().load().label("lens-flare-pass");
            let mut pass = encoder.begin_render_pass(&builder);
            self.lens_flare.render(&mut pass);
        }
        encoder.submit();
        Ok(())
    }
}
