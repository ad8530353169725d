//! Bearer-token lifecycle for the Amadeus API.
//!
//! Tokens come from an OAuth2 client-credentials exchange and are cached
//! until shortly before the provider says they expire. The cache is the
//! only state shared between concurrent searches, so refreshes go through
//! a single gate: when N callers see an expired token, one of them performs
//! the exchange and the rest pick up its result.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use super::error::AmadeusError;
use super::types::TokenResponse;

/// Upper bound on a token lifetime we are willing to trust.
const MAX_TOKEN_LIFETIME_SECS: u64 = 24 * 60 * 60;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A bearer token and the instant after which it must not be used.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    /// Build a token from an exchange result.
    ///
    /// Expiry is `issued_at + (lifetime - safety_margin)`, floored at
    /// `issued_at`.
    fn from_issued(issued: IssuedToken, issued_at: DateTime<Utc>, safety_margin: Duration) -> Self {
        let usable_secs = issued
            .expires_in_secs
            .min(MAX_TOKEN_LIFETIME_SECS)
            .saturating_sub(safety_margin.as_secs());
        let usable = TimeDelta::seconds(i64::try_from(usable_secs).unwrap_or(0));

        Self {
            access_token: issued.access_token,
            expires_at: issued_at + usable,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token may still be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

// Never print the credential itself.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of one client-credentials exchange.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in_secs: u64,
}

impl From<TokenResponse> for IssuedToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            expires_in_secs: response.expires_in,
        }
    }
}

/// Performs the credential exchange.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self) -> impl Future<Output = Result<IssuedToken, AmadeusError>> + Send;
}

/// Client id and secret for the client-credentials grant.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    /// Returns `None` when either half is blank.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Option<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return None;
        }
        Some(Self {
            client_id,
            client_secret,
        })
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Issues tokens from the Amadeus OAuth2 endpoint.
#[derive(Debug, Clone)]
pub struct OAuthIssuer {
    http: reqwest::Client,
    token_url: String,
    credentials: Option<ClientCredentials>,
}

impl OAuthIssuer {
    pub fn new(
        http: reqwest::Client,
        token_url: impl Into<String>,
        credentials: Option<ClientCredentials>,
    ) -> Self {
        Self {
            http,
            token_url: token_url.into(),
            credentials,
        }
    }
}

impl TokenIssuer for OAuthIssuer {
    async fn issue(&self) -> Result<IssuedToken, AmadeusError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            AmadeusError::AuthConfig(
                "AMADEUS_CLIENT_ID and AMADEUS_CLIENT_SECRET must both be set".to_string(),
            )
        })?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AmadeusError::AuthUpstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AmadeusError::AuthUpstream(format!(
                "status {}: {}",
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AmadeusError::AuthUpstream(e.to_string()))?;

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| AmadeusError::AuthUpstream(format!("malformed token response: {e}")))?;

        if token.access_token.is_empty() {
            return Err(AmadeusError::AuthUpstream(
                "token response has an empty access_token".to_string(),
            ));
        }

        Ok(token.into())
    }
}

/// Process-wide token cache with single-flight refresh.
pub struct TokenCache<I> {
    issuer: I,
    clock: Arc<dyn Clock>,
    safety_margin: Duration,
    current: RwLock<Option<Token>>,
    refresh: Mutex<()>,
}

impl<I: TokenIssuer> TokenCache<I> {
    /// Create a cache using the system clock.
    pub fn new(issuer: I, safety_margin: Duration) -> Self {
        Self {
            issuer,
            clock: Arc::new(SystemClock),
            safety_margin,
            current: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Use a different clock (for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return a valid token, exchanging credentials if needed.
    pub async fn get_token(&self) -> Result<Token, AmadeusError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _gate = self.refresh.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let issued_at = self.clock.now();
        let issued = self.issuer.issue().await.inspect_err(|e| {
            warn!(error = %e, "token exchange failed");
        })?;
        let token = Token::from_issued(issued, issued_at, self.safety_margin);

        debug!(expires_at = %token.expires_at(), "refreshed provider token");
        *self.current.write().await = Some(token.clone());

        Ok(token)
    }

    /// Drop `rejected` so the next call exchanges again.
    ///
    /// A no-op if the cache already holds a different token: a late
    /// rejection of an old token must not evict its replacement.
    pub async fn invalidate(&self, rejected: &Token) {
        let mut current = self.current.write().await;
        if current.as_ref() == Some(rejected) {
            *current = None;
        }
    }

    async fn cached(&self) -> Option<Token> {
        let now = self.clock.now();
        self.current
            .read()
            .await
            .as_ref()
            .filter(|t| t.is_valid_at(now))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            let start = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc);
            Arc::new(Self(StdMutex::new(start)))
        }

        fn advance(&self, secs: i64) {
            *self.0.lock().unwrap() += TimeDelta::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    struct CountingIssuer {
        calls: AtomicUsize,
        ttl_secs: u64,
        delay: Option<Duration>,
        fail: bool,
    }

    impl CountingIssuer {
        fn new(ttl_secs: u64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                ttl_secs,
                delay: None,
                fail: false,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TokenIssuer for CountingIssuer {
        async fn issue(&self) -> Result<IssuedToken, AmadeusError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(AmadeusError::AuthUpstream("status 401: invalid_client".into()));
            }
            Ok(IssuedToken {
                access_token: format!("token-{n}"),
                expires_in_secs: self.ttl_secs,
            })
        }
    }

    fn cache(issuer: CountingIssuer, clock: &Arc<ManualClock>) -> TokenCache<CountingIssuer> {
        TokenCache::new(issuer, Duration::from_secs(60)).with_clock(clock.clone())
    }

    #[tokio::test]
    async fn reuses_token_before_expiry() {
        let clock = ManualClock::new();
        let tokens = cache(CountingIssuer::new(1800), &clock);

        let first = tokens.get_token().await.unwrap();
        clock.advance(100);
        let second = tokens.get_token().await.unwrap();

        assert_eq!(first.access_token(), "token-1");
        assert_eq!(second.access_token(), "token-1");
        assert_eq!(tokens.issuer.calls(), 1);
    }

    #[tokio::test]
    async fn refreshes_once_after_expiry() {
        let clock = ManualClock::new();
        let tokens = cache(CountingIssuer::new(1800), &clock);

        tokens.get_token().await.unwrap();
        tokens.get_token().await.unwrap();
        assert_eq!(tokens.issuer.calls(), 1);

        // Usable lifetime is 1800 - 60 = 1740 seconds.
        clock.advance(1740);
        let refreshed = tokens.get_token().await.unwrap();
        assert_eq!(refreshed.access_token(), "token-2");
        assert_eq!(tokens.issuer.calls(), 2);

        tokens.get_token().await.unwrap();
        assert_eq!(tokens.issuer.calls(), 2);
    }

    #[tokio::test]
    async fn expiry_subtracts_safety_margin() {
        let clock = ManualClock::new();
        let start = clock.now();
        let tokens = cache(CountingIssuer::new(1800), &clock);

        let token = tokens.get_token().await.unwrap();
        assert_eq!(token.expires_at(), start + TimeDelta::seconds(1740));

        clock.advance(1739);
        tokens.get_token().await.unwrap();
        assert_eq!(tokens.issuer.calls(), 1);
    }

    #[tokio::test]
    async fn ttl_shorter_than_margin_is_never_reused() {
        let clock = ManualClock::new();
        let tokens = cache(CountingIssuer::new(30), &clock);

        let token = tokens.get_token().await.unwrap();
        assert_eq!(token.expires_at(), clock.now());

        tokens.get_token().await.unwrap();
        assert_eq!(tokens.issuer.calls(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_exchange() {
        let clock = ManualClock::new();
        let mut issuer = CountingIssuer::new(1800);
        issuer.delay = Some(Duration::from_millis(20));
        let tokens = cache(issuer, &clock);

        let (a, b, c, d) = tokio::join!(
            tokens.get_token(),
            tokens.get_token(),
            tokens.get_token(),
            tokens.get_token()
        );

        for token in [a, b, c, d] {
            assert_eq!(token.unwrap().access_token(), "token-1");
        }
        assert_eq!(tokens.issuer.calls(), 1);
    }

    #[tokio::test]
    async fn failed_exchange_is_not_cached() {
        let clock = ManualClock::new();
        let mut issuer = CountingIssuer::new(1800);
        issuer.fail = true;
        let tokens = cache(issuer, &clock);

        let err = tokens.get_token().await.unwrap_err();
        assert!(matches!(err, AmadeusError::AuthUpstream(_)));

        tokens.get_token().await.unwrap_err();
        assert_eq!(tokens.issuer.calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let clock = ManualClock::new();
        let tokens = cache(CountingIssuer::new(1800), &clock);

        let first = tokens.get_token().await.unwrap();
        tokens.invalidate(&first).await;
        let token = tokens.get_token().await.unwrap();

        assert_eq!(token.access_token(), "token-2");
    }

    #[tokio::test]
    async fn stale_invalidate_keeps_replacement() {
        let clock = ManualClock::new();
        let tokens = cache(CountingIssuer::new(1800), &clock);

        // Two legs were rejected with token-1; the first rejection refreshes.
        let first = tokens.get_token().await.unwrap();
        tokens.invalidate(&first).await;
        let second = tokens.get_token().await.unwrap();
        assert_eq!(second.access_token(), "token-2");

        // The slow leg's rejection arrives after the refresh.
        tokens.invalidate(&first).await;

        let third = tokens.get_token().await.unwrap();
        assert_eq!(third.access_token(), "token-2");
        assert_eq!(tokens.issuer.calls(), 2);
    }

    #[tokio::test]
    async fn missing_credentials_is_config_error() {
        let issuer = OAuthIssuer::new(reqwest::Client::new(), "http://127.0.0.1:9/token", None);
        let err = issuer.issue().await.unwrap_err();
        assert!(matches!(err, AmadeusError::AuthConfig(_)));
    }

    #[test]
    fn blank_credentials_are_rejected() {
        assert!(ClientCredentials::new("", "secret").is_none());
        assert!(ClientCredentials::new("id", "  ").is_none());
        assert!(ClientCredentials::new("id", "secret").is_some());
    }

    #[test]
    fn debug_redacts_secrets() {
        let issued = IssuedToken {
            access_token: "super-secret".to_string(),
            expires_in_secs: 1800,
        };
        let token = Token::from_issued(issued, Utc::now(), Duration::from_secs(60));
        assert!(!format!("{token:?}").contains("super-secret"));

        let creds = ClientCredentials::new("id", "hunter2").unwrap();
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
