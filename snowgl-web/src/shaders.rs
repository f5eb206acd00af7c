/// Shader compilation and program linking for a WebGL context
use thiserror::Error;
use web_sys::{WebGlProgram, WebGlRenderingContext as Gl, WebGlShader};

/// Vertex attribute holding object-space positions
pub const POSITION_ATTRIBUTE: &str = "vertexMeshPos";
/// Vertex attribute holding object-space normals
pub const NORMAL_ATTRIBUTE: &str = "vertexNormal";

pub const PROJECTION_UNIFORM: &str = "projectionMat";
pub const VIEW_UNIFORM: &str = "viewMat";
pub const MODEL_UNIFORM: &str = "modelMat";
pub const NORMAL_UNIFORM: &str = "normalMat";
pub const CAMERA_UNIFORM: &str = "cameraPos";

/// Headlight shading: brightness follows how directly a face looks at the camera
pub const BASIC_VERTEX_SHADER: &str = r#"
attribute vec3 vertexMeshPos;
attribute vec3 vertexNormal;

uniform mat4 projectionMat;
uniform mat4 viewMat;
uniform mat4 modelMat;
uniform mat3 normalMat;
uniform vec4 cameraPos;

varying mediump float brightness;

void main() {
    vec4 world = modelMat * vec4(vertexMeshPos, 1.0);
    vec3 normal = normalize(normalMat * vertexNormal);
    vec3 toCamera = normalize(cameraPos.xyz - world.xyz);
    brightness = abs(dot(normal, toCamera));
    gl_Position = projectionMat * viewMat * world;
}
"#;

pub const BASIC_FRAGMENT_SHADER: &str = r#"
precision mediump float;

varying mediump float brightness;

void main() {
    gl_FragColor = vec4(vec3(0.2 + 0.8 * brightness), 1.0);
}
"#;

/// Errors raised while building a shader program
#[derive(Debug, Error)]
pub enum ShaderError {
    /// The context refused to allocate a shader or program object
    #[error("WebGL context could not create a {0}")]
    Context(&'static str),

    /// A shader stage failed to compile
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: &'static str, log: String },

    /// The program failed to link
    #[error("shader program failed to link: {0}")]
    Link(String),
}

/// Compile both stages and link them into a program
pub fn compile_program(
    gl: &Gl,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<WebGlProgram, ShaderError> {
    let vertex = compile_shader(gl, Gl::VERTEX_SHADER, vertex_source)?;
    let fragment = match compile_shader(gl, Gl::FRAGMENT_SHADER, fragment_source) {
        Ok(shader) => shader,
        Err(err) => {
            gl.delete_shader(Some(&vertex));
            return Err(err);
        }
    };

    let Some(program) = gl.create_program() else {
        gl.delete_shader(Some(&vertex));
        gl.delete_shader(Some(&fragment));
        return Err(ShaderError::Context("program"));
    };
    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);

    // The linked program keeps its own copy of the stages
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    let linked = gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !linked {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(ShaderError::Link(log));
    }

    Ok(program)
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader, ShaderError> {
    let stage = stage_name(kind);
    let shader = gl.create_shader(kind).ok_or(ShaderError::Context("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !compiled {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(ShaderError::Compile { stage, log });
    }

    Ok(shader)
}

fn stage_name(kind: u32) -> &'static str {
    match kind {
        Gl::VERTEX_SHADER => "vertex",
        Gl::FRAGMENT_SHADER => "fragment",
        _ => "unknown",
    }
}
