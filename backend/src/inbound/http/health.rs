//! Liveness and readiness probes for orchestrators and load balancers.
//!
//! Readiness needs both the startup flag and a reachable database; liveness
//! only reflects whether the process is draining.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use tracing::warn;

use crate::domain::ports::ReadinessProbe;

/// Shared probe state, registered as `web::Data<HealthState>`.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    database: Option<Arc<dyn ReadinessProbe>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            database: None,
        }
    }
}

impl HealthState {
    /// Not ready, alive, and with no dependency to check.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also require `probe` to answer before reporting ready.
    pub fn with_database(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.database = Some(probe);
        self
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so orchestrators stop routing during shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    async fn dependencies_ready(&self) -> bool {
        let Some(database) = &self.database else {
            return true;
        };
        match database.check().await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "readiness check failed");
                false
            }
        }
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe: 200 once started and the database answers, else 503.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is starting or the database is unreachable")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    let ok = state.is_ready() && state.dependencies_ready().await;
    HealthState::probe_response(ok)
}

/// Liveness probe: 200 until [`HealthState::mark_unhealthy`] is called.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockReadinessProbe, ReadinessProbeError};
    use actix_web::{App, http::StatusCode, test as actix_test};
    use rstest::rstest;

    async fn probe(state: HealthState, uri: &str) -> (StatusCode, Option<String>) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(ready)
                .service(live),
        )
        .await;
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let cache = res
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        (res.status(), cache)
    }

    fn database(healthy: bool) -> Arc<dyn ReadinessProbe> {
        let mut mock = MockReadinessProbe::new();
        mock.expect_check().returning(move || {
            if healthy {
                Ok(())
            } else {
                Err(ReadinessProbeError::unavailable("connection refused"))
            }
        });
        Arc::new(mock)
    }

    #[actix_web::test]
    async fn not_ready_before_startup_completes() {
        let (status, cache) = probe(HealthState::new(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.as_deref(), Some("no-store"));
    }

    #[rstest]
    #[case(true, StatusCode::OK)]
    #[case(false, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_rt::test]
    async fn readiness_follows_the_database(#[case] healthy: bool, #[case] expected: StatusCode) {
        let state = HealthState::new().with_database(database(healthy));
        state.mark_ready();
        let (status, _) = probe(state, "/health/ready").await;
        assert_eq!(status, expected);
    }

    #[actix_web::test]
    async fn liveness_fails_once_draining() {
        let state = HealthState::new();
        state.mark_unhealthy();
        let (status, _) = probe(state, "/health/live").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
