//! Per-user bounded mailbox.
//!
//! A mailbox is a fixed-capacity FIFO of [`Event`]s owned by exactly one
//! [`Room`](super::Room). Producers never block: when the queue is full the
//! new event is dropped and the mailbox is flagged so the next sweep evicts it.
//!
//! The receiving half lives behind its own async mutex, so a consumer blocked
//! on [`EventStream`] never holds the room lock.

use std::{
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    task::{Context, Poll},
    time::Duration,
};

use futures_util::Stream;
use tokio::{
    sync::{Mutex, OwnedMutexGuard, mpsc},
    time::Instant,
};

use super::{event::Event, value_object::UserId};

/// Why an enqueue did not land in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MailboxError {
    /// The queue is at capacity; the event was dropped.
    Overflow,
    /// The consuming half is gone.
    Closed,
}

/// Last-activity clock shared between a mailbox and its stream.
#[derive(Debug)]
struct Activity {
    origin: Instant,
    /// Milliseconds since `origin`.
    last_millis: AtomicU64,
}

impl Activity {
    fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_millis: AtomicU64::new(0),
        }
    }

    fn touch(&self) {
        let elapsed = u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_millis.fetch_max(elapsed, Ordering::Relaxed);
    }

    fn idle(&self) -> Duration {
        let last = self.origin + Duration::from_millis(self.last_millis.load(Ordering::Relaxed));
        Instant::now().saturating_duration_since(last)
    }
}

#[derive(Debug)]
pub(crate) struct Mailbox {
    user_id: UserId,
    sender: mpsc::Sender<Event>,
    receiver: Arc<Mutex<mpsc::Receiver<Event>>>,
    activity: Arc<Activity>,
    joined_at: Instant,
    overflowed: AtomicBool,
}

impl Mailbox {
    pub(crate) fn new(user_id: UserId, capacity: usize) -> Self {
        // mpsc panics on a zero-sized buffer
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            user_id,
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            activity: Arc::new(Activity::new()),
            joined_at: Instant::now(),
            overflowed: AtomicBool::new(false),
        }
    }

    /// Append to the tail without blocking.
    pub(crate) fn enqueue(&self, event: Event) -> Result<(), MailboxError> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.overflowed.store(true, Ordering::Relaxed);
                Err(MailboxError::Overflow)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(MailboxError::Closed),
        }
    }

    /// Remove and return every queued event in FIFO order.
    ///
    /// While a stream consumer is attached the events belong to it, so the
    /// batch comes back empty.
    pub(crate) fn drain_all(&self) -> Vec<Event> {
        self.touch();
        let Ok(mut receiver) = self.receiver.try_lock() else {
            return Vec::new();
        };
        let mut events = Vec::with_capacity(receiver.len());
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// Attach the single stream consumer. `None` if one is already attached.
    pub(crate) fn stream(&self) -> Option<EventStream> {
        self.touch();
        let receiver = Arc::clone(&self.receiver).try_lock_owned().ok()?;
        Some(EventStream {
            user_id: self.user_id.clone(),
            receiver,
            activity: Arc::clone(&self.activity),
        })
    }

    /// Number of queued events.
    pub(crate) fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub(crate) fn has_overflowed(&self) -> bool {
        self.overflowed.load(Ordering::Relaxed)
    }

    pub(crate) fn touch(&self) {
        self.activity.touch();
    }

    pub(crate) fn idle_for(&self) -> Duration {
        self.activity.idle()
    }

    pub(crate) fn joined_at(&self) -> Instant {
        self.joined_at
    }

    /// Mark the mailbox terminal.
    ///
    /// An attached stream still yields what was queued, then ends.
    pub(crate) fn close(self) {
        tracing::debug!("Mailbox of '{}' closed with {} pending events", self.user_id, self.len());
    }
}

/// Push-style view over one mailbox.
///
/// Yields events as they are enqueued and ends once the mailbox is closed.
/// Dropping the stream detaches the consumer.
#[derive(Debug)]
pub struct EventStream {
    user_id: UserId,
    receiver: OwnedMutexGuard<mpsc::Receiver<Event>>,
    activity: Arc<Activity>,
}

impl EventStream {
    /// Wait for the next event; `None` once the mailbox is closed and drained.
    pub async fn next_event(&mut self) -> Option<Event> {
        let event = self.receiver.recv().await;
        if event.is_some() {
            self.activity.touch();
        }
        event
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl Stream for EventStream {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                this.activity.touch();
                Poll::Ready(Some(event))
            }
            other => other,
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        tracing::debug!("Event stream of '{}' released", self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn alice() -> UserId {
        UserId::new("alice".to_string()).unwrap()
    }

    fn joined(name: &str) -> Event {
        Event::user_joined(UserId::new(name.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_drain_all_returns_fifo_and_empties() {
        // テスト項目: drain_all は FIFO 順に全イベントを返し、キューを空にする
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 10);
        mailbox.enqueue(joined("bob")).unwrap();
        mailbox.enqueue(joined("carol")).unwrap();

        // when (操作):
        let events = mailbox.drain_all();

        // then (期待する結果):
        let origins: Vec<&str> = events.iter().map(|e| e.origin.as_str()).collect();
        assert_eq!(origins, vec!["bob", "carol"]);
        assert_eq!(mailbox.len(), 0);
        assert!(mailbox.drain_all().is_empty());
    }

    #[tokio::test]
    async fn test_enqueue_overflow_flags_mailbox() {
        // テスト項目: 容量超過時は新しいイベントが破棄され、overflow フラグが立つ
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 2);
        mailbox.enqueue(joined("bob")).unwrap();
        mailbox.enqueue(joined("carol")).unwrap();

        // when (操作):
        let result = mailbox.enqueue(joined("dave"));

        // then (期待する結果):
        assert_eq!(result, Err(MailboxError::Overflow));
        assert!(mailbox.has_overflowed());
        assert_eq!(mailbox.len(), 2);
        let origins: Vec<String> = mailbox
            .drain_all()
            .into_iter()
            .map(|e| e.origin.into_string())
            .collect();
        assert_eq!(origins, vec!["bob", "carol"]);
    }

    #[tokio::test]
    async fn test_stream_drains_pending_then_ends_on_close() {
        // テスト項目: close 後もキュー済みイベントは配信され、その後ストリームが終了する
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 10);
        mailbox.enqueue(joined("bob")).unwrap();
        let mut stream = mailbox.stream().unwrap();
        mailbox.enqueue(joined("carol")).unwrap();

        // when (操作):
        mailbox.close();

        // then (期待する結果):
        assert_eq!(stream.next().await.unwrap().origin.as_str(), "bob");
        assert_eq!(stream.next().await.unwrap().origin.as_str(), "carol");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_blocked_stream_unblocks_on_close() {
        // テスト項目: イベント待ちでブロック中のストリームが close で終了を観測する
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 10);
        let mut stream = mailbox.stream().unwrap();
        let waiter = tokio::spawn(async move { stream.next_event().await });
        tokio::task::yield_now().await;

        // when (操作):
        mailbox.close();

        // then (期待する結果):
        assert!(waiter.await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_only_one_stream_consumer() {
        // テスト項目: ストリームの同時利用者は 1 人まで、解放後は再取得できる
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 10);
        let first = mailbox.stream();

        // when (操作):
        let second = mailbox.stream();

        // then (期待する結果):
        assert!(first.is_some());
        assert!(second.is_none());
        drop(first);
        assert!(mailbox.stream().is_some());
    }

    #[tokio::test]
    async fn test_drain_all_is_empty_while_streaming() {
        // テスト項目: ストリーム接続中の drain_all はイベントを横取りしない
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 10);
        let mut stream = mailbox.stream().unwrap();
        mailbox.enqueue(joined("bob")).unwrap();

        // when (操作):
        let batch = mailbox.drain_all();

        // then (期待する結果):
        assert!(batch.is_empty());
        assert_eq!(stream.next_event().await.unwrap().origin.as_str(), "bob");
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_for_resets_on_touch() {
        // テスト項目: 最終アクティビティからの経過時間が touch でリセットされる
        // given (前提条件):
        let mailbox = Mailbox::new(alice(), 10);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(mailbox.idle_for() >= Duration::from_secs(30));

        // when (操作):
        mailbox.touch();

        // then (期待する結果):
        assert!(mailbox.idle_for() < Duration::from_secs(1));
    }
}
