use axum::Router;
use axum::extract::Request;
use axum::middleware::Next;
use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use crate::plugins::metrics::MetricsPlugin;


#[async_trait]
pub trait Plugin: Send + Sync {

    async fn router(&self) -> Router;

    fn name(&self) -> &'static str;
    /// Optional lifecycle hook called when the kernel starts.
    async fn on_start(&self) {}
    /// Optional lifecycle hook called on shutdown.
    async fn on_shutdown(&self) {}
}

/// Builds the application router by mounting each plugin under `/{plugin.name()}`.
/// When a metrics plugin is supplied, each plugin router is wrapped so requests
/// are counted and timed with the plugin name as the path label.
pub async fn build_app(plugins: &Vec<Box<dyn Plugin>>, metrics: Option<MetricsPlugin>) -> Router {
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;
        let mut router = plugin.router().await;

        if let Some(m) = metrics.as_ref() {
            let counter = m.request_counter.clone();
            let duration = m.request_duration.clone();
            let route = plugin.name();
            router = router.layer(axum::middleware::from_fn(move |req: Request, next: Next| {
                let counter = counter.clone();
                let duration = duration.clone();
                async move {
                    let method = req.method().to_string();
                    let start = Instant::now();
                    let resp = next.run(req).await;
                    counter.with_label_values(&[method.as_str(), route, resp.status().as_str()]).inc();
                    duration.with_label_values(&[method.as_str(), route]).observe(start.elapsed().as_secs_f64());
                    resp
                }
            }));
        }

        // mount plugin under its name to namespace routes
        app = app.nest(&format!("/{}", plugin.name()), router);
    }

    app
}
