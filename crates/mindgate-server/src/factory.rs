//! Factory for creating the blocked-sites gateway from configuration.

use std::sync::Arc;

use mindgate_client::{BlockedSitesBackend, BlockedSitesGateway, OfflineBackend, SupabaseBackend};
use mindgate_core::config::BackendConfig;
use mindgate_core::error::MindgateResult;
use tracing::{info, warn};

/// Create a gateway for the configured backend.
///
/// Without a project URL and anon key the gateway runs offline and always
/// serves the fallback list.
pub fn create_gateway(config: &BackendConfig) -> MindgateResult<BlockedSitesGateway> {
    let backend = create_backend(config)?;
    Ok(BlockedSitesGateway::new(backend).with_fallback(config.fallback_domains.clone()))
}

fn create_backend(config: &BackendConfig) -> MindgateResult<Arc<dyn BlockedSitesBackend>> {
    match (&config.url, &config.anon_key) {
        (Some(url), Some(_)) => {
            let backend = SupabaseBackend::from_config(config)?;
            info!(
                url = %url,
                table = %config.table,
                session = config.access_token.is_some(),
                "Using Supabase blocked-sites backend"
            );
            Ok(Arc::new(backend))
        }
        (Some(_), None) | (None, Some(_)) => {
            warn!("Incomplete backend configuration, running offline");
            Ok(Arc::new(OfflineBackend))
        }
        (None, None) => {
            info!("No backend configured, running offline");
            Ok(Arc::new(OfflineBackend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_gateway_uses_configured_fallback() {
        let config = BackendConfig {
            fallback_domains: vec!["https://reddit.com".to_string()],
            ..Default::default()
        };
        let gateway = create_gateway(&config).unwrap();
        assert_eq!(
            gateway.fetch_blocked_domains().await,
            vec!["https://reddit.com".to_string()]
        );
    }

    #[test]
    fn test_supabase_gateway() {
        let config = BackendConfig {
            url: Some("https://demo.supabase.co".to_string()),
            anon_key: Some("anon".to_string()),
            ..Default::default()
        };
        let gateway = create_gateway(&config).unwrap();
        assert_eq!(gateway.fallback().len(), 14);
    }
}
