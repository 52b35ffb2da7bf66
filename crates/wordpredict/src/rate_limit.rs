use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::warn;

const LOG_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct RateLimiterLayer {
    rate_per_sec: f64,
    burst: f64,
}

impl RateLimiterLayer {
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        Self {
            rate_per_sec: rate_per_sec as f64,
            burst: burst as f64,
        }
    }
}

impl<S> Layer<S> for RateLimiterLayer {
    type Service = RateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimiter {
            inner,
            buckets: Arc::new(DashMap::new()),
            dropped: Arc::new(DropCounter {
                since_log: AtomicU64::new(0),
                last_log: std::sync::Mutex::new(Instant::now()),
            }),
            rate_per_sec: self.rate_per_sec,
            burst: self.burst,
        }
    }
}

/// Per-client token bucket. Clients without an identifying header (local
/// development, health probes from the platform) are not limited.
#[derive(Clone)]
pub struct RateLimiter<S> {
    inner: S,
    buckets: Arc<DashMap<String, Bucket>>,
    dropped: Arc<DropCounter>,
    rate_per_sec: f64,
    burst: f64,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

struct DropCounter {
    since_log: AtomicU64,
    last_log: std::sync::Mutex<Instant>,
}

impl<S, ReqBody> Service<axum::http::Request<ReqBody>> for RateLimiter<S>
where
    S: Service<axum::http::Request<ReqBody>, Response = axum::http::Response<axum::body::Body>>
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: axum::http::Request<ReqBody>) -> Self::Future {
        if let Some(client) = client_id(&req)
            && !self.check_and_consume(&client)
        {
            self.dropped.since_log.fetch_add(1, Ordering::Relaxed);
            self.dropped.log_if_due();
            return Box::pin(async move {
                Ok(axum::http::Response::builder()
                    .status(axum::http::StatusCode::TOO_MANY_REQUESTS)
                    .body(axum::body::Body::from("rate limited"))
                    .unwrap())
            });
        }

        let fut = self.inner.call(req);
        Box::pin(async move { fut.await })
    }
}

impl<S> RateLimiter<S> {
    fn check_and_consume(&self, client: &str) -> bool {
        let mut bucket = self.buckets.entry(client.to_string()).or_insert(Bucket {
            tokens: self.burst,
            last_refill: Instant::now(),
        });
        let now = Instant::now();
        let elapsed = now
            .saturating_duration_since(bucket.last_refill)
            .as_secs_f64();
        if elapsed > 0.0 {
            bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
            bucket.last_refill = now;
        }
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

impl DropCounter {
    fn log_if_due(&self) {
        let now = Instant::now();
        let Ok(mut last) = self.last_log.lock() else {
            return;
        };
        if now.saturating_duration_since(*last) >= LOG_INTERVAL {
            let dropped = self.since_log.swap(0, Ordering::Relaxed);
            if dropped > 0 {
                warn!("rate limiter dropped {dropped} requests in the last minute");
            }
            *last = now;
        }
    }
}

fn client_id<B>(req: &axum::http::Request<B>) -> Option<String> {
    // First hop of x-forwarded-for as set by the fronting proxy.
    req.headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
