/// Scene context owned by the render loop
use snowgl_core::{Camera, Geometry, MathResult, Mesh, Real};

/// Startup parameters for a scene
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub camera_position: [Real; 3],
    pub fov: Real,
    pub near: Real,
    pub far: Real,
    /// Radians the mesh turns each frame
    pub spin_rate: Real,
    pub spin_axis: [Real; 3],
    /// Uniform scale applied to the mesh
    pub mesh_scale: Real,
    pub target_fps: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera_position: [0.0, 0.0, 5.0],
            fov: std::f64::consts::FRAC_PI_2,
            near: 0.1,
            far: 20.0,
            spin_rate: 0.01,
            spin_axis: [0.0, 1.0, 0.0],
            mesh_scale: 1.0,
            target_fps: 30,
        }
    }
}

/// The camera and mesh driven by one render loop
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: Camera,
    pub mesh: Mesh,
    spin_rate: Real,
    spin_axis: [Real; 3],
}

impl Scene {
    /// Build a scene with the mesh at the origin, facing +x
    pub fn new(geometry: Geometry, config: &SceneConfig, aspect: Real) -> MathResult<Self> {
        let camera = Camera::with_aspect(
            config.camera_position,
            config.fov,
            aspect,
            config.near,
            config.far,
        )?;
        let mut mesh = Mesh::new([0.0; 3], [1.0, 0.0, 0.0], geometry)?;
        mesh.set_scale(config.mesh_scale, config.mesh_scale, config.mesh_scale);

        Ok(Self {
            camera,
            mesh,
            spin_rate: config.spin_rate,
            spin_axis: config.spin_axis,
        })
    }

    /// Advance the idle animation by one frame
    pub fn step(&mut self) {
        self.mesh.rotate(self.spin_rate, self.spin_axis);
    }

    /// Slide the camera sideways and keep it aimed at the origin
    pub fn strafe_camera(&mut self, dx: Real) {
        self.camera.translate([dx, 0.0, 0.0]);
        self.camera.look_at([0.0, 0.0, 0.0]);
    }
}
