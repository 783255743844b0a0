pub mod sampler;
pub mod soft_uart;

pub use sampler::Sampler;
pub use soft_uart::SoftUart;
