/// snowgl terminal demo - spinning mesh
///
/// Usage: snowgl-terminal [file.obj [scale]]
///
/// Without a file a cube is shown.
/// Controls:
///   - WASD / E/R: Rotate the mesh
///   - Left/Right: Move the camera, keeping the origin in view
///   - Q/ESC: Quit

use std::env;
use std::io;
use snowgl_core::{load_obj, Geometry};
use snowgl_terminal::{SceneConfig, TerminalApp};

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = SceneConfig::default();

    let geometry = match args.get(1) {
        Some(path) => {
            println!("Loading OBJ file: {}", path);
            load_obj(path).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Failed to load OBJ: {}", e))
            })?
        }
        None => Geometry::cube(2.0),
    };

    if let Some(scale) = args.get(2) {
        config.mesh_scale = scale.parse().map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid scale {:?}: {}", scale, e))
        })?;
    }

    println!(
        "{} vertices, {} triangles. Starting renderer (press Q to quit)...",
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(geometry, config)?;
    app.run()?;

    Ok(())
}
