/// Example: the hardcoded triangle, spinning slowly about +Y
///
/// Usage: cargo run --example spin_triangle

use std::io;
use snowgl_core::Geometry;
use snowgl_terminal::{SceneConfig, TerminalApp};

fn main() -> io::Result<()> {
    env_logger::init();

    let config = SceneConfig {
        camera_position: [0.0, 0.0, 3.0],
        spin_rate: 0.03,
        ..SceneConfig::default()
    };

    let mut app = TerminalApp::new(Geometry::triangle(), config)?;
    app.run()
}
