mod provider;
mod transform;
mod types;

pub use provider::TravisCi;
