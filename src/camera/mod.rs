pub mod registry;

pub use registry::{CameraRegistry, CameraSummary};
