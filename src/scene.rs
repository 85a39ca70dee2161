use crate::audio::SharedAudio;
use crate::core::brain::BrainState;
use crate::core::camera::{pixel_to_ndc, Camera};
use crate::core::constants::{CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_Z, MOUSE_PLANE_Z};
use crate::core::model::{parse_glb, resolve_model, MeshDecoder, ModelError, ModelOutcome};
use crate::core::post::PassChain;
use crate::core::scene::SceneGraph;
use crate::core::scheduler::TaskHandle;
use crate::dom;
use crate::draco::WebDracoDecoder;
use crate::frame::FrameLoop;
use crate::render::{BrainRenderer, GpuContext, PostProcessing};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::JsCast;
use web_sys as web;

/// The audio-reactive brain: camera, lights, model, renderer and post chain
/// for one canvas, plus its own per-frame task.
pub struct BrainScene {
    canvas: web::HtmlCanvasElement,
    state: BrainState,
    camera: Camera,
    graph: SceneGraph,
    audio: Option<SharedAudio>,
    renderer: Option<BrainRenderer>,
    post: Option<PostProcessing>,
    frame_task: Option<TaskHandle>,
}

impl BrainScene {
    /// Build the scene on `canvas` and start rendering. The model loads in the
    /// background; until it arrives the scene renders empty lit space.
    pub async fn create(
        canvas: web::HtmlCanvasElement,
        audio: Option<SharedAudio>,
        frame: &FrameLoop,
        model_path: &str,
        draco_path: &str,
        effects: PassChain,
    ) -> anyhow::Result<Rc<RefCell<Self>>> {
        dom::sync_canvas_backing_size(&canvas);
        let (width, height) = (canvas.width(), canvas.height());
        let ctx = GpuContext::new(&canvas, "brain").await?;
        let renderer = BrainRenderer::new(ctx, &crate::core::brain_shader_source());
        let post = PostProcessing::new(
            renderer.device(),
            renderer.format(),
            width,
            height,
            effects,
        );
        let camera = Camera::looking_at_origin(
            CAMERA_FOV_DEG,
            width as f32 / height.max(1) as f32,
            CAMERA_NEAR,
            CAMERA_FAR,
            CAMERA_Z,
        );

        let scene = Rc::new(RefCell::new(Self {
            canvas,
            state: BrainState::new(),
            camera,
            graph: SceneGraph::with_default_lights(),
            audio,
            renderer: Some(renderer),
            post: Some(post),
            frame_task: None,
        }));

        let weak = Rc::downgrade(&scene);
        dom::on_window("pointermove", move |e| {
            let (Some(scene), Some(e)) = (weak.upgrade(), e.dyn_ref::<web::PointerEvent>()) else {
                return;
            };
            scene
                .borrow_mut()
                .track_pointer(e.client_x() as f32, e.client_y() as f32);
        });
        let weak = Rc::downgrade(&scene);
        dom::on_window("resize", move |_| {
            if let Some(scene) = weak.upgrade() {
                scene.borrow_mut().handle_resize();
            }
        });

        let weak = Rc::downgrade(&scene);
        let task = frame.register(move |_| {
            if let Some(scene) = weak.upgrade() {
                scene.borrow_mut().animate();
            }
        });
        scene.borrow_mut().frame_task = Some(task);

        spawn_model_load(
            Rc::downgrade(&scene),
            model_path.to_string(),
            draco_path.to_string(),
        );
        log::info!("[brain] scene created {}x{}", width, height);
        Ok(scene)
    }

    pub fn set_scroll_progress(&mut self, progress: f32) {
        self.state.set_scroll_progress(progress);
    }

    pub fn set_morph_progress(&mut self, progress: f32) {
        self.state.set_morph_progress(progress);
    }

    /// One display refresh: advance the clock and rotation, refresh uniforms,
    /// then draw through the post chain.
    pub fn animate(&mut self) {
        let frequency = self
            .audio
            .as_ref()
            .map(|a| a.borrow_mut().frequency())
            .unwrap_or(0.0);
        self.state.advance(frequency);

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.write_uniforms(&self.state.uniforms(&self.camera, &self.graph.lights));
        if let Some(post) = self.post.as_ref() {
            post.update(renderer.queue(), self.state.time());
        }
        if let Err(e) = renderer.render(self.post.as_ref()) {
            log::error!("[brain] render failed: {:?}", e);
        }
    }

    /// Release GPU resources and stop the frame task. Safe to call repeatedly
    /// and before the model has loaded.
    pub fn dispose(&mut self) {
        if let Some(task) = self.frame_task.take() {
            task.stop();
        }
        let released = self.graph.dispose();
        if let Some(mut renderer) = self.renderer.take() {
            renderer.destroy();
        }
        if let Some(post) = self.post.take() {
            post.destroy();
        }
        self.audio = None;
        if released > 0 {
            log::info!("[brain] disposed, released {} geometries", released);
        }
    }

    fn install_model(&mut self, outcome: ModelOutcome) {
        if self.graph.is_disposed() {
            log::info!("[brain] model arrived after dispose, dropped");
            return;
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.upload_model(outcome.model());
        }
        self.graph.install_model(outcome);
    }

    fn track_pointer(&mut self, x: f32, y: f32) {
        let (vw, vh) = dom::viewport_size();
        let ndc = pixel_to_ndc(x, y, vw as f32, vh as f32);
        if let Some(world) = self.camera.unproject_to_plane(ndc, MOUSE_PLANE_Z) {
            self.state.set_mouse(world);
        }
    }

    fn handle_resize(&mut self) {
        dom::sync_canvas_backing_size(&self.canvas);
        let (width, height) = (self.canvas.width(), self.canvas.height());
        self.camera.set_viewport(width as f32, height as f32);
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if renderer.resize_if_needed(width, height) {
            if let Some(post) = self.post.as_mut() {
                post.resize(renderer.device(), width, height);
            }
        }
    }
}

fn spawn_model_load(scene: Weak<RefCell<BrainScene>>, path: String, draco_path: String) {
    wasm_bindgen_futures::spawn_local(async move {
        let asset = dom::fetch_bytes(&path)
            .await
            .map_err(|e| ModelError::Fetch(e.to_string()))
            .and_then(|bytes| parse_glb(&bytes));

        // The decoder script is only fetched for compressed assets
        let decoder = match &asset {
            Ok(asset) if asset.is_compressed() => match WebDracoDecoder::load(&draco_path).await {
                Ok(decoder) => Some(decoder),
                Err(e) => {
                    log::warn!("[brain] Draco decoder unavailable at {}: {:?}", draco_path, e);
                    None
                }
            },
            _ => None,
        };
        let geometry = asset.and_then(|asset| {
            asset.into_geometry(decoder.as_ref().map(|d| d as &dyn MeshDecoder))
        });

        let outcome = resolve_model(geometry, &mut rand::thread_rng());
        match scene.upgrade() {
            Some(scene) => scene.borrow_mut().install_model(outcome),
            None => log::info!("[brain] scene dropped before the model loaded"),
        }
    });
}
