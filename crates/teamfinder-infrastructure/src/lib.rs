//! Infrastructure layer: gateway implementations, configuration loading and
//! local paths.

pub mod config_service;
pub mod demo;
pub mod memory_gateway;
pub mod paths;
pub mod supabase;

use std::sync::Arc;

use teamfinder_core::config::{BackendKind, RootConfig};
use teamfinder_core::error::Result;
use teamfinder_core::gateway::Gateway;

pub use crate::config_service::ConfigService;
pub use crate::memory_gateway::{GatewayOp, MemoryGateway};
pub use crate::paths::TeamfinderPaths;
pub use crate::supabase::SupabaseGateway;

/// Creates the gateway selected by `config.backend`.
///
/// The memory backend starts with the demo catalog and profiles.
pub fn build_gateway(config: &RootConfig) -> Result<Arc<dyn Gateway>> {
    let gateway: Arc<dyn Gateway> = match config.backend {
        BackendKind::Supabase => Arc::new(SupabaseGateway::new(&config.supabase)?),
        BackendKind::Memory => Arc::new(MemoryGateway::with_demo_data()),
    };
    tracing::info!(backend = %config.backend, "Gateway ready");
    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_memory_gateway_by_default() {
        assert!(build_gateway(&RootConfig::default()).is_ok());
    }

    #[test]
    fn test_build_supabase_requires_settings() {
        let config = RootConfig {
            backend: BackendKind::Supabase,
            ..RootConfig::default()
        };
        let err = build_gateway(&config).err().unwrap();
        assert!(matches!(err, teamfinder_core::TeamfinderError::Config(_)));
    }
}
