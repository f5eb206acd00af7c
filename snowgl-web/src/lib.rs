/// snowgl web - WebGL front end compiled to WASM
///
/// `WebScene` owns a camera, one mesh and its GPU buffers. JavaScript
/// drives it through the exported methods and calls `draw` once per
/// animation frame.
use snowgl_core::{parse_obj, Camera, Mesh, Real};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGlProgram, WebGlRenderingContext as Gl, WebGlUniformLocation};

pub mod buffers;
pub mod error;
pub mod shaders;

use buffers::GpuGeometry;
pub use error::WebError;

const DEFAULT_CAMERA_POSITION: [Real; 3] = [0.0, 0.0, 5.0];
const DEFAULT_FOV: Real = std::f64::consts::FRAC_PI_2;
const DEFAULT_NEAR: Real = 0.1;
const DEFAULT_FAR: Real = 100.0;

/// Every matrix a frame needs, already in column-major `f32` layout
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    pub projection: Vec<f32>,
    pub view: Vec<f32>,
    pub model: Vec<f32>,
    /// `None` when the model matrix is singular
    pub normal: Option<Vec<f32>>,
    pub camera_position: [f32; 4],
}

impl FrameUniforms {
    pub fn capture(camera: &Camera, mesh: &Mesh) -> Self {
        Self {
            projection: camera.projection_for_gpu(),
            view: camera.view_for_gpu(),
            model: mesh.model_for_gpu(),
            normal: mesh.normal_for_gpu().ok(),
            camera_position: camera.position_for_gpu(),
        }
    }
}

struct Bindings {
    position: i32,
    normal: i32,
    projection: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    normal_matrix: Option<WebGlUniformLocation>,
    camera: Option<WebGlUniformLocation>,
}

impl Bindings {
    fn locate(gl: &Gl, program: &WebGlProgram) -> Self {
        Self {
            position: gl.get_attrib_location(program, shaders::POSITION_ATTRIBUTE),
            normal: gl.get_attrib_location(program, shaders::NORMAL_ATTRIBUTE),
            projection: gl.get_uniform_location(program, shaders::PROJECTION_UNIFORM),
            view: gl.get_uniform_location(program, shaders::VIEW_UNIFORM),
            model: gl.get_uniform_location(program, shaders::MODEL_UNIFORM),
            normal_matrix: gl.get_uniform_location(program, shaders::NORMAL_UNIFORM),
            camera: gl.get_uniform_location(program, shaders::CAMERA_UNIFORM),
        }
    }
}

#[wasm_bindgen]
pub struct WebScene {
    gl: Gl,
    program: WebGlProgram,
    bindings: Bindings,
    buffers: GpuGeometry,
    camera: Camera,
    mesh: Mesh,
}

#[wasm_bindgen]
impl WebScene {
    /// Compile the shaders, parse the OBJ text and upload its buffers
    #[wasm_bindgen(constructor)]
    pub fn new(
        gl: Gl,
        vertex_source: &str,
        fragment_source: &str,
        obj_source: &str,
    ) -> Result<WebScene, JsValue> {
        Ok(Self::build(gl, vertex_source, fragment_source, obj_source)?)
    }

    /// Look up a canvas by id and build a scene with the built-in shaders
    #[wasm_bindgen(js_name = fromCanvas)]
    pub fn from_canvas(canvas_id: &str, obj_source: &str) -> Result<WebScene, JsValue> {
        let gl = webgl_context(canvas_id)?;
        Self::new(
            gl,
            shaders::BASIC_VERTEX_SHADER,
            shaders::BASIC_FRAGMENT_SHADER,
            obj_source,
        )
    }

    /// Spin the mesh about `axis` by `angle` radians
    #[wasm_bindgen(js_name = rotateMesh)]
    pub fn rotate_mesh(&mut self, angle: Real, x: Real, y: Real, z: Real) {
        self.mesh.rotate(angle, [x, y, z]);
    }

    #[wasm_bindgen(js_name = translateMesh)]
    pub fn translate_mesh(&mut self, dx: Real, dy: Real, dz: Real) {
        self.mesh.translate([dx, dy, dz]);
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, sx: Real, sy: Real, sz: Real) {
        self.mesh.set_scale(sx, sy, sz);
    }

    #[wasm_bindgen(js_name = moveCamera)]
    pub fn move_camera(&mut self, dx: Real, dy: Real, dz: Real) {
        self.camera.translate([dx, dy, dz]);
    }

    #[wasm_bindgen(js_name = rotateCamera)]
    pub fn rotate_camera(&mut self, angle: Real, x: Real, y: Real, z: Real) {
        self.camera.rotate(angle, [x, y, z]);
    }

    #[wasm_bindgen(js_name = lookAt)]
    pub fn look_at(&mut self, x: Real, y: Real, z: Real) {
        self.camera.look_at([x, y, z]);
    }

    #[wasm_bindgen(js_name = projectionMatrix)]
    pub fn projection_matrix(&self) -> Vec<f32> {
        self.camera.projection_for_gpu()
    }

    #[wasm_bindgen(js_name = viewMatrix)]
    pub fn view_matrix(&self) -> Vec<f32> {
        self.camera.view_for_gpu()
    }

    #[wasm_bindgen(js_name = modelMatrix)]
    pub fn model_matrix(&self) -> Vec<f32> {
        self.mesh.model_for_gpu()
    }

    #[wasm_bindgen(js_name = normalMatrix)]
    pub fn normal_matrix(&self) -> Result<Vec<f32>, JsValue> {
        Ok(self.mesh.normal_for_gpu().map_err(WebError::from)?)
    }

    /// Clear the canvas and draw the mesh with the current transforms.
    ///
    /// A singular model matrix has no normal matrix; that frame is cleared
    /// but nothing is drawn.
    pub fn draw(&self) {
        let gl = &self.gl;
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let uniforms = FrameUniforms::capture(&self.camera, &self.mesh);
        let Some(normal) = uniforms.normal.as_deref() else {
            log::warn!("skipping frame: model matrix is singular");
            return;
        };

        gl.enable(Gl::DEPTH_TEST);
        gl.use_program(Some(&self.program));

        let b = &self.bindings;
        gl.uniform_matrix4fv_with_f32_array(b.projection.as_ref(), false, &uniforms.projection);
        gl.uniform_matrix4fv_with_f32_array(b.view.as_ref(), false, &uniforms.view);
        gl.uniform_matrix4fv_with_f32_array(b.model.as_ref(), false, &uniforms.model);
        gl.uniform_matrix3fv_with_f32_array(b.normal_matrix.as_ref(), false, normal);
        gl.uniform4fv_with_f32_array(b.camera.as_ref(), &uniforms.camera_position);

        self.buffers.bind_positions(gl, b.position);
        self.buffers.bind_normals(gl, b.normal);
        self.buffers.draw(gl);
    }

    /// Release the GPU objects owned by this scene
    pub fn dispose(&self) {
        self.buffers.release(&self.gl);
        self.gl.delete_program(Some(&self.program));
    }
}

impl WebScene {
    fn build(
        gl: Gl,
        vertex_source: &str,
        fragment_source: &str,
        obj_source: &str,
    ) -> Result<Self, WebError> {
        let geometry = parse_obj(obj_source)?;
        let width = gl.drawing_buffer_width().max(1) as Real;
        let height = gl.drawing_buffer_height().max(1) as Real;
        let camera = Camera::with_aspect(
            DEFAULT_CAMERA_POSITION,
            DEFAULT_FOV,
            width / height,
            DEFAULT_NEAR,
            DEFAULT_FAR,
        )?;
        let mesh = Mesh::new([0.0; 3], [1.0, 0.0, 0.0], geometry)?;

        let program = shaders::compile_program(&gl, vertex_source, fragment_source)?;
        let buffers = match GpuGeometry::upload(&gl, mesh.geometry()) {
            Ok(buffers) => buffers,
            Err(err) => {
                gl.delete_program(Some(&program));
                return Err(err);
            }
        };
        let bindings = Bindings::locate(&gl, &program);

        log::info!("scene ready: {}x{} drawing buffer", width, height);
        Ok(Self {
            gl,
            program,
            bindings,
            buffers,
            camera,
            mesh,
        })
    }
}

fn webgl_context(canvas_id: &str) -> Result<Gl, WebError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(WebError::Dom("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| WebError::MissingCanvas(canvas_id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| WebError::MissingCanvas(canvas_id.to_string()))?;

    canvas
        .get_context("webgl")
        .ok()
        .flatten()
        .and_then(|context| context.dyn_into::<Gl>().ok())
        .ok_or(WebError::Dom("WebGL is not supported"))
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    Ok(())
}
