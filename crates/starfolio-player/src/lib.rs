//! Vehicle controllers, the cinematic camera rig, and screen projection.

pub mod camera_rig;
pub mod projection;
pub mod vehicle;

pub use camera_rig::{CameraMode, CameraRig, FollowTarget};
pub use projection::CameraPose;
pub use vehicle::{Steering, VehicleController, VehicleStep, VehicleTuning, glow_level};
