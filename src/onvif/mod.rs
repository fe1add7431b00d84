pub mod auth;
pub mod client;
pub mod controller;
pub mod device;
pub mod media;
pub mod ptz;
pub mod soap;
pub mod types;

pub use controller::OnvifController;
