pub mod window;

pub use window::WindowPolicy;
