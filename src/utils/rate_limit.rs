use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use rocket::State;
use rocket_okapi::request::OpenApiFromRequest;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// Per-route limits, matching the abuse policy of the public API.
const BOOKING_LIMIT: usize = 20;
const BOOKING_WINDOW: Duration = Duration::from_secs(60);
const LOGIN_LIMIT: usize = 10;
const LOGIN_WINDOW: Duration = Duration::from_secs(900);
const REGISTER_LIMIT: usize = 5;
const REGISTER_WINDOW: Duration = Duration::from_secs(3600);

// Sweep dead identifiers once the map grows past this.
const SWEEP_THRESHOLD: usize = 4096;

/// Process-wide sliding-window request counter. State lives only in memory:
/// initialized at startup, nothing persisted across restarts. Growth is
/// bounded by inline pruning plus a full sweep once the identifier map gets
/// large.
pub struct ThrottleManager {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl ThrottleManager {
    pub fn new() -> Self {
        ThrottleManager {
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Records one request for `identifier` and reports whether it exceeded
    /// `limit` within the trailing `window`.
    pub fn is_throttled(&self, identifier: &str, limit: usize, window: Duration) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("throttle mutex poisoned");

        if windows.len() > SWEEP_THRESHOLD {
            Self::sweep(&mut windows, now);
        }

        let timestamps = windows.entry(identifier.to_string()).or_default();
        timestamps.retain(|ts| now.duration_since(*ts) < window);

        if timestamps.len() >= limit {
            return true;
        }
        timestamps.push(now);
        false
    }

    // Drop identifiers whose entire history is older than the longest window.
    fn sweep(windows: &mut HashMap<String, Vec<Instant>>, now: Instant) {
        windows.retain(|_, timestamps| {
            timestamps.retain(|ts| now.duration_since(*ts) < REGISTER_WINDOW);
            !timestamps.is_empty()
        });
    }

    #[cfg(test)]
    fn tracked_identifiers(&self) -> usize {
        self.windows.lock().unwrap().len()
    }
}

impl Default for ThrottleManager {
    fn default() -> Self {
        Self::new()
    }
}

fn client_identifier(request: &Request<'_>) -> String {
    request
        .client_ip()
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn check_throttle(
    request: &Request<'_>,
    scope: &str,
    limit: usize,
    window: Duration,
) -> Option<Status> {
    let manager = match request.guard::<&State<ThrottleManager>>().await {
        Outcome::Success(manager) => manager,
        _ => return Some(Status::InternalServerError),
    };
    let identifier = format!("{}:{}", scope, client_identifier(request));
    if manager.is_throttled(&identifier, limit, window) {
        log::warn!("rate limit hit for {}", identifier);
        return Some(Status::TooManyRequests);
    }
    None
}

/// Request guard shaping booking creation: 20 requests per minute per client.
#[derive(Debug, OpenApiFromRequest)]
pub struct BookingThrottle;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BookingThrottle {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match check_throttle(request, "bookings", BOOKING_LIMIT, BOOKING_WINDOW).await {
            Some(status) => Outcome::Error((status, ())),
            None => Outcome::Success(BookingThrottle),
        }
    }
}

/// Request guard for login attempts: 10 per 15 minutes per client.
#[derive(Debug, OpenApiFromRequest)]
pub struct LoginThrottle;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for LoginThrottle {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match check_throttle(request, "login", LOGIN_LIMIT, LOGIN_WINDOW).await {
            Some(status) => Outcome::Error((status, ())),
            None => Outcome::Success(LoginThrottle),
        }
    }
}

/// Request guard for account registration: 5 per hour per client.
#[derive(Debug, OpenApiFromRequest)]
pub struct RegisterThrottle;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RegisterThrottle {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match check_throttle(request, "register", REGISTER_LIMIT, REGISTER_WINDOW).await {
            Some(status) => Outcome::Error((status, ())),
            None => Outcome::Success(RegisterThrottle),
        }
    }
}
