//! One-time bootstrap codes for registering the first super administrator.
//!
//! At startup, when no super administrator exists, a random code is generated and
//! written to the log. `POST /api/auth/bootstrap` consumes it. Codes live in memory,
//! expire after their TTL and are invalidated on first successful use.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use tokio::sync::RwLock;

pub const BOOTSTRAP_CODE_TTL: Duration = Duration::from_secs(60);
const CODE_LENGTH: usize = 32;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Clone)]
struct IssuedCode {
    code: String,
    expires_at: Instant,
}

#[derive(Clone)]
pub struct BootstrapCodeService {
    issued: Arc<RwLock<Option<IssuedCode>>>,
    ttl: Duration,
}

impl BootstrapCodeService {
    pub fn new() -> Self {
        Self::with_ttl(BOOTSTRAP_CODE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            issued: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Issues a fresh code, replacing any previous one.
    pub async fn generate(&self) -> String {
        let mut rng = rand::rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect();

        *self.issued.write().await = Some(IssuedCode {
            code: code.clone(),
            expires_at: Instant::now() + self.ttl,
        });

        code
    }

    /// Returns whether `input` is the current unexpired code, consuming it on success.
    ///
    /// An expired code is discarded. A wrong guess leaves a valid code in place.
    pub async fn consume(&self, input: &str) -> bool {
        let mut issued = self.issued.write().await;

        match issued.as_ref() {
            Some(stored) if Instant::now() >= stored.expires_at => {
                *issued = None;
                false
            }
            Some(stored) if stored.code == input => {
                *issued = None;
                true
            }
            _ => false,
        }
    }

    pub async fn is_pending(&self) -> bool {
        matches!(
            self.issued.read().await.as_ref(),
            Some(stored) if Instant::now() < stored.expires_at
        )
    }
}

impl Default for BootstrapCodeService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn generates_alphanumeric_code() {
        let service = BootstrapCodeService::new();
        assert!(!service.is_pending().await);

        let code = service.generate().await;
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(service.is_pending().await);
    }

    #[tokio::test]
    async fn code_is_single_use() {
        let service = BootstrapCodeService::new();
        let code = service.generate().await;

        assert!(!service.consume("wrong").await);
        assert!(service.is_pending().await);
        assert!(service.consume(&code).await);
        assert!(!service.consume(&code).await);
    }

    #[tokio::test]
    async fn regenerating_replaces_previous_code() {
        let service = BootstrapCodeService::new();
        let first = service.generate().await;
        let second = service.generate().await;

        assert_ne!(first, second);
        assert!(!service.consume(&first).await);
        assert!(service.consume(&second).await);
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let service = BootstrapCodeService::with_ttl(Duration::from_millis(20));
        let code = service.generate().await;

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(!service.is_pending().await);
        assert!(!service.consume(&code).await);
    }

    #[tokio::test]
    async fn consume_without_code_fails() {
        let service = BootstrapCodeService::new();
        assert!(!service.consume("anything").await);
    }
}
