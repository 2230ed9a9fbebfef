//! Token-bucket admission control for sends into a room.
//!
//! Each acquisition reserves one token, letting the balance go negative; the
//! caller then sleeps until its reservation is covered. Reservations are
//! handed back when the wait is abandoned, including when the waiting
//! future is dropped.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::RoomError;

/// Cancellation scope of a single send: an explicit token plus an optional
/// deadline.
#[derive(Debug, Clone, Default)]
pub struct SendContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl SendContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Sleep until `until`, failing early on cancellation or deadline.
    async fn sleep_until(&self, until: Instant) -> Result<(), RoomError> {
        if self.cancel.is_cancelled() {
            return Err(RoomError::Canceled);
        }
        match self.deadline {
            Some(deadline) if deadline < until => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
                Err(RoomError::Canceled)
            }
            _ => tokio::select! {
                _ = self.cancel.cancelled() => Err(RoomError::Canceled),
                _ = tokio::time::sleep_until(until) => Ok(()),
            },
        }
    }
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<Bucket>,
    /// Tokens per second.
    rate: f64,
    /// Maximum tokens.
    burst: f64,
}

impl RateLimiter {
    /// Creates a limiter starting with a full bucket.
    pub fn new(rate_per_second: u32, burst: u32) -> Self {
        let burst = f64::from(burst.max(1));
        Self {
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
            rate: f64::from(rate_per_second.max(1)),
            burst,
        }
    }

    /// The bucket is only held for arithmetic, never across an await.
    fn bucket(&self) -> MutexGuard<'_, Bucket> {
        self.bucket.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn refill(&self, bucket: &mut Bucket, now: Instant) {
        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate).min(self.burst);
        bucket.last_refill = now;
    }

    fn refund(&self) {
        let mut bucket = self.bucket();
        self.refill(&mut bucket, Instant::now());
        bucket.tokens = (bucket.tokens + 1.0).min(self.burst);
    }

    /// Take one token, waiting for the bucket to refill if needed.
    ///
    /// # Errors
    ///
    /// `RoomError::Canceled` when `ctx` is canceled or its deadline passes
    /// before the token becomes available.
    pub async fn acquire(&self, ctx: &SendContext) -> Result<(), RoomError> {
        let ready_at = {
            let mut bucket = self.bucket();
            let now = Instant::now();
            self.refill(&mut bucket, now);
            bucket.tokens -= 1.0;
            if bucket.tokens >= 0.0 {
                return Ok(());
            }
            now + Duration::from_secs_f64(-bucket.tokens / self.rate)
        };

        let reservation = Reservation::new(self);
        ctx.sleep_until(ready_at).await?;
        reservation.commit();
        Ok(())
    }

    /// Current whole tokens, refilled to now.
    pub fn available(&self) -> u64 {
        let mut bucket = self.bucket();
        self.refill(&mut bucket, Instant::now());
        // Truncation is fine: the bucket never exceeds `burst`.
        bucket.tokens.max(0.0).floor() as u64
    }
}

/// A token taken on credit while its waiter sleeps.
///
/// Dropped without [`Reservation::commit`] (error, cancellation or the
/// waiting future being dropped), it hands the token back.
struct Reservation<'a> {
    limiter: &'a RateLimiter,
    committed: bool,
}

impl<'a> Reservation<'a> {
    fn new(limiter: &'a RateLimiter) -> Self {
        Self {
            limiter,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.limiter.refund();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_is_available_immediately() {
        // テスト項目: バースト分のトークンは待機なしで取得できる
        // given (前提条件):
        let limiter = RateLimiter::new(10, 3);
        let ctx = SendContext::default();
        let start = Instant::now();

        // when (操作):
        for _ in 0..3 {
            limiter.acquire(&ctx).await.unwrap();
        }

        // then (期待する結果):
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.available(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_refill() {
        // テスト項目: トークン枯渇時は補充されるまで待機する
        // given (前提条件):
        let limiter = RateLimiter::new(10, 1);
        let ctx = SendContext::default();
        limiter.acquire(&ctx).await.unwrap();
        let start = Instant::now();

        // when (操作):
        let result = limiter.acquire(&ctx).await;

        // then (期待する結果): 10 tokens/sec なので約 100ms 待つ
        assert!(result.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(99));
        assert!(start.elapsed() < Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_fails_when_deadline_elapses() {
        // テスト項目: 締め切りまでにトークンが得られない場合、締め切り時点で Canceled になる
        // given (前提条件):
        let limiter = RateLimiter::new(1, 1);
        limiter.acquire(&SendContext::default()).await.unwrap();
        let ctx = SendContext::default().with_timeout(Duration::from_millis(100));
        let start = Instant::now();

        // when (操作):
        let result = limiter.acquire(&ctx).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::Canceled));
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_fails_on_cancel() {
        // テスト項目: 待機中にキャンセルされると Canceled が返される
        // given (前提条件):
        let limiter = RateLimiter::new(1, 1);
        limiter.acquire(&SendContext::default()).await.unwrap();
        let token = CancellationToken::new();
        let ctx = SendContext::new(token.clone());
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });

        // when (操作):
        let result = limiter.acquire(&ctx).await;

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_wait_returns_reservation() {
        // テスト項目: 諦めた待機の予約分は返却され、後続の待機時間が伸びない
        // given (前提条件):
        let limiter = RateLimiter::new(10, 1);
        limiter.acquire(&SendContext::default()).await.unwrap();
        let token = CancellationToken::new();
        token.cancel();

        // when (操作):
        let canceled = limiter.acquire(&SendContext::new(token)).await;
        let start = Instant::now();
        let next = limiter.acquire(&SendContext::default()).await;

        // then (期待する結果):
        assert_eq!(canceled, Err(RoomError::Canceled));
        assert!(next.is_ok());
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_wait_returns_reservation() {
        // テスト項目: 待機中の acquire が破棄（タイムアウト・切断）されても予約分は返却される
        // given (前提条件):
        let limiter = RateLimiter::new(1, 1);
        let ctx = SendContext::default();
        limiter.acquire(&ctx).await.unwrap();
        for _ in 0..10 {
            let dropped =
                tokio::time::timeout(Duration::from_millis(10), limiter.acquire(&ctx)).await;
            assert!(dropped.is_err());
        }
        let start = Instant::now();

        // when (操作):
        let next = limiter.acquire(&ctx).await;

        // then (期待する結果): 破棄された 10 件分は待たず、約 1 秒で取得できる
        assert!(next.is_ok());
        assert!(start.elapsed() <= Duration::from_secs(1));
    }
}
