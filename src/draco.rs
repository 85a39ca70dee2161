use crate::core::constants::DRACO_DECODER_SCRIPT;
use crate::core::model::{DecodedMesh, DracoPrimitive, MeshDecoder, ModelError};
use crate::dom;
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = DracoDecoderModule, catch)]
    fn draco_decoder_module(config: &JsValue) -> Result<JsValue, JsValue>;

    type Decoder;
    #[wasm_bindgen(method, js_name = DecodeBufferToMesh)]
    fn decode_buffer_to_mesh(this: &Decoder, buffer: &DecoderBuffer, mesh: &Mesh) -> Status;
    #[wasm_bindgen(method, js_name = GetAttributeByUniqueId)]
    fn attribute_by_unique_id(this: &Decoder, mesh: &Mesh, id: u32) -> JsValue;
    #[wasm_bindgen(method, js_name = GetAttributeFloatForAllPoints)]
    fn attribute_float_for_all_points(
        this: &Decoder,
        mesh: &Mesh,
        attribute: &JsValue,
        out: &DracoFloat32Array,
    ) -> bool;
    #[wasm_bindgen(method, js_name = GetFaceFromMesh)]
    fn face_from_mesh(this: &Decoder, mesh: &Mesh, face: u32, out: &DracoInt32Array) -> bool;

    type DecoderBuffer;
    #[wasm_bindgen(method, js_name = Init)]
    fn init(this: &DecoderBuffer, data: &js_sys::Int8Array, len: u32);

    type Mesh;
    #[wasm_bindgen(method)]
    fn num_points(this: &Mesh) -> u32;
    #[wasm_bindgen(method)]
    fn num_faces(this: &Mesh) -> u32;

    type Status;
    #[wasm_bindgen(method)]
    fn ok(this: &Status) -> bool;
    #[wasm_bindgen(method)]
    fn error_msg(this: &Status) -> String;

    type DracoFloat32Array;
    #[wasm_bindgen(method, js_name = GetValue)]
    fn get_value(this: &DracoFloat32Array, index: u32) -> f32;

    type DracoInt32Array;
    #[wasm_bindgen(method, js_name = GetValue)]
    fn get_value(this: &DracoInt32Array, index: u32) -> i32;
}

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// The page's Draco decoder (`draco_decoder.js`), loaded from a directory on
/// first use and driven through its JS API.
pub struct WebDracoDecoder {
    module: JsValue,
}

impl WebDracoDecoder {
    /// Load `draco_decoder.js` from `dir` unless the page already has it, then
    /// wait for the module to finish initialising.
    pub async fn load(dir: &str) -> anyhow::Result<Self> {
        let global = js_sys::global();
        if !Reflect::has(&global, &"DracoDecoderModule".into()).unwrap_or(false) {
            let url = format!("{}{}", dir, DRACO_DECODER_SCRIPT);
            load_script(&url).await?;
            log::info!("[draco] decoder script loaded from {}", url);
        }

        // The module object is itself thenable, so hand it back inside an array
        let config = js_sys::Object::new();
        let ready = js_sys::Promise::new(&mut |resolve, _reject| {
            let on_loaded = Closure::once_into_js(move |module: JsValue| {
                _ = resolve.call1(&JsValue::NULL, &js_sys::Array::of1(&module));
            });
            _ = Reflect::set(&config, &"onModuleLoaded".into(), &on_loaded);
        });
        draco_decoder_module(&config).map_err(js_err)?;
        let loaded = JsFuture::from(ready).await.map_err(js_err)?;
        let module = js_sys::Array::from(&loaded).get(0);
        Ok(Self { module })
    }

    fn construct<T: JsCast>(&self, class: &str) -> anyhow::Result<T> {
        let ctor = Reflect::get(&self.module, &class.into())
            .map_err(js_err)?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| anyhow::anyhow!("Draco module has no {} class", class))?;
        let obj = Reflect::construct(&ctor, &js_sys::Array::new()).map_err(js_err)?;
        Ok(obj.unchecked_into())
    }

    /// Free emscripten-side objects.
    fn destroy(&self, objects: &[&JsValue]) {
        let Ok(destroy) = Reflect::get(&self.module, &"destroy".into())
            .and_then(|f| f.dyn_into::<js_sys::Function>())
        else {
            return;
        };
        for obj in objects {
            _ = destroy.call1(&self.module, obj);
        }
    }

    fn decode_mesh(&self, primitive: &DracoPrimitive) -> anyhow::Result<DecodedMesh> {
        let buffer: DecoderBuffer = self.construct("DecoderBuffer")?;
        let decoder: Decoder = self.construct("Decoder")?;
        let mesh: Mesh = self.construct("Mesh")?;

        let data = js_sys::Int8Array::new_with_length(primitive.data.len() as u32);
        data.copy_from(bytemuck::cast_slice(&primitive.data));
        buffer.init(&data, primitive.data.len() as u32);

        let status = decoder.decode_buffer_to_mesh(&buffer, &mesh);
        let decoded = if status.ok() {
            self.read_mesh(&decoder, &mesh, primitive)
        } else {
            Err(anyhow::anyhow!("decode failed: {}", status.error_msg()))
        };
        self.destroy(&[&*status, &*mesh, &*decoder, &*buffer]);
        decoded
    }

    fn read_mesh(
        &self,
        decoder: &Decoder,
        mesh: &Mesh,
        primitive: &DracoPrimitive,
    ) -> anyhow::Result<DecodedMesh> {
        let points = mesh.num_points();
        let positions = self
            .read_vec3(decoder, mesh, primitive.position_id, points)?
            .ok_or_else(|| anyhow::anyhow!("no attribute {}", primitive.position_id))?;
        let normals = match primitive.normal_id {
            Some(id) => self.read_vec3(decoder, mesh, id, points)?,
            None => None,
        };

        let faces = mesh.num_faces();
        let face: DracoInt32Array = self.construct("DracoInt32Array")?;
        let mut indices = Vec::with_capacity(faces as usize * 3);
        for f in 0..faces {
            decoder.face_from_mesh(mesh, f, &face);
            indices.extend((0..3).map(|k| face.get_value(k).max(0) as u32));
        }
        self.destroy(&[&*face]);

        Ok(DecodedMesh {
            positions,
            normals,
            indices,
        })
    }

    /// Three floats per point for attribute `id`, or None if the mesh lacks it.
    fn read_vec3(
        &self,
        decoder: &Decoder,
        mesh: &Mesh,
        id: u32,
        points: u32,
    ) -> anyhow::Result<Option<Vec<[f32; 3]>>> {
        let attribute = decoder.attribute_by_unique_id(mesh, id);
        let ptr = Reflect::get(&attribute, &"ptr".into())
            .ok()
            .and_then(|p| p.as_f64())
            .unwrap_or(0.0);
        if attribute.is_falsy() || ptr == 0.0 {
            return Ok(None);
        }
        let values: DracoFloat32Array = self.construct("DracoFloat32Array")?;
        decoder.attribute_float_for_all_points(mesh, &attribute, &values);
        let out = (0..points)
            .map(|i| {
                let base = i * 3;
                [
                    values.get_value(base),
                    values.get_value(base + 1),
                    values.get_value(base + 2),
                ]
            })
            .collect();
        self.destroy(&[&*values]);
        Ok(Some(out))
    }
}

impl MeshDecoder for WebDracoDecoder {
    fn decode(&self, primitive: &DracoPrimitive) -> Result<DecodedMesh, ModelError> {
        let mesh = self
            .decode_mesh(primitive)
            .map_err(|e| ModelError::Draco(e.to_string()))?;
        log::info!(
            "[draco] decoded {} points, {} triangles",
            mesh.positions.len(),
            mesh.indices.len() / 3
        );
        Ok(mesh)
    }
}

/// Append a `<script src=url>` to `<head>` and wait for it to run.
async fn load_script(url: &str) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let head = document.head().ok_or_else(|| anyhow::anyhow!("no <head>"))?;
    let script = document
        .create_element("script")
        .map_err(js_err)?
        .dyn_into::<web::HtmlScriptElement>()
        .map_err(|e| anyhow::anyhow!("not a script element: {:?}", e))?;
    script.set_src(url);
    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });
    head.append_child(&script).map_err(js_err)?;
    JsFuture::from(loaded)
        .await
        .map_err(|_| anyhow::anyhow!("failed to load {}", url))?;
    Ok(())
}
