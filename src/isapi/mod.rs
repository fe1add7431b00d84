pub mod client;
pub mod controller;
pub mod types;

pub use controller::IsapiController;
