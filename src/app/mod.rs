// Application layer: wires configuration, adapters and core services together.

pub mod bootstrap;

pub use bootstrap::{build_toolkit, build_toolkit_with_storage, market_noise};
