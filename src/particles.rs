use crate::core::camera::Camera;
use crate::core::constants::{
    CAMERA_FAR, CAMERA_NEAR, NOMINAL_FRAME_STEP, PARTICLE_CAMERA_FOV_DEG, PARTICLE_CAMERA_Z,
};
use crate::core::particles::{ParticleConfig, ParticleField};
use crate::core::scheduler::TaskHandle;
use crate::dom;
use crate::frame::FrameLoop;
use crate::render::{GpuContext, ParticleRenderer};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Background point cloud on its own canvas with its own clock and frame task.
pub struct ParticleSystem {
    canvas: web::HtmlCanvasElement,
    camera: Camera,
    time: f32,
    renderer: Option<ParticleRenderer>,
    frame_task: Option<TaskHandle>,
}

impl ParticleSystem {
    pub async fn create(
        canvas: web::HtmlCanvasElement,
        config: ParticleConfig,
        frame: &FrameLoop,
    ) -> anyhow::Result<Rc<RefCell<Self>>> {
        dom::sync_canvas_backing_size(&canvas);
        let (width, height) = (canvas.width(), canvas.height());
        let field = ParticleField::generate(&config, &mut rand::thread_rng());
        let ctx = GpuContext::new(&canvas, "particles").await?;
        let renderer = ParticleRenderer::new(ctx, &field);
        let camera = Camera::looking_at_origin(
            PARTICLE_CAMERA_FOV_DEG,
            width as f32 / height.max(1) as f32,
            CAMERA_NEAR,
            CAMERA_FAR,
            PARTICLE_CAMERA_Z,
        );

        let system = Rc::new(RefCell::new(Self {
            canvas,
            camera,
            time: 0.0,
            renderer: Some(renderer),
            frame_task: None,
        }));

        let weak = Rc::downgrade(&system);
        dom::on_window("resize", move |_| {
            if let Some(system) = weak.upgrade() {
                system.borrow_mut().handle_resize();
            }
        });
        let weak = Rc::downgrade(&system);
        let task = frame.register(move |_| {
            if let Some(system) = weak.upgrade() {
                system.borrow_mut().animate();
            }
        });
        system.borrow_mut().frame_task = Some(task);
        Ok(system)
    }

    pub fn animate(&mut self) {
        self.time += NOMINAL_FRAME_STEP;
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.write_uniforms(&self.camera, self.time);
        if let Err(e) = renderer.render() {
            log::error!("[particles] render failed: {:?}", e);
        }
    }

    pub fn dispose(&mut self) {
        if let Some(task) = self.frame_task.take() {
            task.stop();
        }
        if let Some(renderer) = self.renderer.take() {
            renderer.destroy();
            log::info!("[particles] disposed");
        }
    }

    fn handle_resize(&mut self) {
        dom::sync_canvas_backing_size(&self.canvas);
        let (width, height) = (self.canvas.width(), self.canvas.height());
        self.camera.set_viewport(width as f32, height as f32);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize_if_needed(width, height);
        }
    }
}
