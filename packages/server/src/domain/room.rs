//! Room: a named group of users, each with a bounded mailbox.
//!
//! ## ロックの規約
//!
//! - メンバーのマップは Room ごとの `RwLock` で保護する
//! - Room のロックを保持したまま他の Room のロックを取らない
//! - レートリミッタの待機とストリームの待機はロックの外で行う

use std::{collections::HashMap, time::Duration};

use tokio::{sync::RwLock, time::Instant};

use super::{
    error::RoomError,
    event::{Event, Payload},
    mailbox::{EventStream, Mailbox, MailboxError},
    rate_limiter::{RateLimiter, SendContext},
    value_object::{RoomName, UserId},
};

/// Default mailbox capacity (events).
pub const DEFAULT_MAILBOX_CAPACITY: usize = 100;
/// Default queue depth above which a member is evicted by the sweep.
pub const DEFAULT_OVERFLOW_THRESHOLD: usize = 40;
/// Default inactivity after which a member is evicted by the sweep.
pub const DEFAULT_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(5 * 60);
/// Default sustained send rate per room (messages per second).
pub const DEFAULT_RATE_LIMIT_PER_SECOND: u32 = 100;
/// Default send burst per room.
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 2 * DEFAULT_RATE_LIMIT_PER_SECOND;

/// Per-room tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    pub mailbox_capacity: usize,
    pub overflow_threshold: usize,
    pub inactivity_timeout: Duration,
    pub rate_limit_per_second: u32,
    pub rate_limit_burst: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            overflow_threshold: DEFAULT_OVERFLOW_THRESHOLD,
            inactivity_timeout: DEFAULT_INACTIVITY_TIMEOUT,
            rate_limit_per_second: DEFAULT_RATE_LIMIT_PER_SECOND,
            rate_limit_burst: DEFAULT_RATE_LIMIT_BURST,
        }
    }
}

/// Why the sweep removed a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// Queue depth above the threshold, or an event was dropped at capacity.
    Overflow,
    /// No activity for longer than the inactivity timeout.
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eviction {
    pub user_id: UserId,
    pub reason: EvictionReason,
}

/// Read-only view of one member for observability.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSnapshot {
    pub user_id: UserId,
    pub seconds_since_last_activity: f64,
    pub queued_events: usize,
}

/// Outcome of a successful [`Room::send_to_user`].
#[derive(Debug, Clone, Copy)]
pub struct Delivery {
    /// When the sender joined the room.
    pub sender_joined_at: Instant,
    /// `false` when the recipient's mailbox was full and the message was dropped.
    pub enqueued: bool,
}

impl Delivery {
    /// How long the sender has been a member.
    pub fn sender_membership_age(&self) -> Duration {
        self.sender_joined_at.elapsed()
    }
}

#[derive(Debug, Default)]
struct RoomState {
    members: HashMap<UserId, Mailbox>,
    /// Set once the room is disposed; no further joins are accepted.
    closed: bool,
}

/// A named channel of users exchanging presence and signaling events.
#[derive(Debug)]
pub struct Room {
    name: RoomName,
    config: RoomConfig,
    state: RwLock<RoomState>,
    limiter: RateLimiter,
}

impl Room {
    pub fn new(name: RoomName, config: RoomConfig) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_per_second, config.rate_limit_burst);
        Self {
            name,
            config,
            state: RwLock::new(RoomState::default()),
            limiter,
        }
    }

    pub fn name(&self) -> &RoomName {
        &self.name
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Best-effort fan-out; a full mailbox drops the event and is flagged.
    fn publish(&self, members: &HashMap<UserId, Mailbox>, event: &Event) {
        tracing::debug!(
            "Room '{}': publishing {:?} of '{}' to {} members",
            self.name,
            event.action,
            event.origin,
            members.len()
        );
        for (user_id, mailbox) in members {
            if let Err(MailboxError::Overflow) = mailbox.enqueue(event.clone()) {
                tracing::warn!(
                    "Room '{}': mailbox of '{}' is full, dropped {:?} event",
                    self.name,
                    user_id,
                    event.action
                );
            }
        }
    }

    /// Join the room.
    ///
    /// Existing members receive `UserJoined` before the new mailbox becomes
    /// reachable, so a joiner's message can never overtake its join event.
    pub async fn add_user(&self, user_id: UserId) -> Result<(), RoomError> {
        let mut state = self.state.write().await;
        if state.closed {
            return Err(RoomError::Closed(self.name.clone()));
        }
        if state.members.contains_key(&user_id) {
            return Err(RoomError::AlreadyMember(user_id));
        }

        self.publish(&state.members, &Event::user_joined(user_id.clone()));

        let mailbox = Mailbox::new(user_id.clone(), self.config.mailbox_capacity);
        state.members.insert(user_id.clone(), mailbox);

        tracing::info!(
            "Room '{}': user '{}' joined ({} members)",
            self.name,
            user_id,
            state.members.len()
        );
        Ok(())
    }

    /// Leave the room: close the mailbox, then tell the remaining members.
    pub async fn remove_user(&self, user_id: &UserId) -> Result<(), RoomError> {
        let mut state = self.state.write().await;
        let mailbox = state
            .members
            .remove(user_id)
            .ok_or_else(|| RoomError::NotMember(user_id.clone()))?;
        mailbox.close();

        self.publish(&state.members, &Event::user_left(user_id.clone()));

        tracing::info!(
            "Room '{}': user '{}' left ({} members)",
            self.name,
            user_id,
            state.members.len()
        );
        Ok(())
    }

    /// Relay `payload` from one member to another.
    ///
    /// Waits for a send token first (no lock held), then checks both
    /// memberships under one read section.
    pub async fn send_to_user(
        &self,
        ctx: &SendContext,
        from: &UserId,
        to: &UserId,
        payload: Payload,
    ) -> Result<Delivery, RoomError> {
        if let Err(e) = self.limiter.acquire(ctx).await {
            tracing::warn!("Room '{}': send limiter canceled for '{}'", self.name, from);
            return Err(e);
        }

        let state = self.state.read().await;
        let sender = state
            .members
            .get(from)
            .ok_or_else(|| RoomError::NotMember(from.clone()))?;
        let recipient = state
            .members
            .get(to)
            .ok_or_else(|| RoomError::NotMember(to.clone()))?;

        sender.touch();
        let enqueued = match recipient.enqueue(Event::message(from.clone(), payload)) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(
                    "Room '{}': message from '{}' to '{}' dropped ({:?})",
                    self.name,
                    from,
                    to,
                    reason
                );
                false
            }
        };

        Ok(Delivery {
            sender_joined_at: sender.joined_at(),
            enqueued,
        })
    }

    /// Attach the push-style consumer of `user_id`'s mailbox.
    pub async fn get_events_stream(&self, user_id: &UserId) -> Result<EventStream, RoomError> {
        let state = self.state.read().await;
        let mailbox = state
            .members
            .get(user_id)
            .ok_or_else(|| RoomError::NotMember(user_id.clone()))?;
        mailbox
            .stream()
            .ok_or_else(|| RoomError::StreamBusy(user_id.clone()))
    }

    /// Drain everything queued for `user_id`.
    pub async fn get_events_batch(&self, user_id: &UserId) -> Result<Vec<Event>, RoomError> {
        let state = self.state.read().await;
        let mailbox = state
            .members
            .get(user_id)
            .ok_or_else(|| RoomError::NotMember(user_id.clone()))?;
        Ok(mailbox.drain_all())
    }

    /// Evict overflowing and inactive members, announcing each departure once.
    pub async fn sweep_inactive(&self) -> Vec<Eviction> {
        let mut state = self.state.write().await;

        let evictions: Vec<Eviction> = state
            .members
            .iter()
            .filter_map(|(user_id, mailbox)| {
                let reason = if mailbox.has_overflowed()
                    || mailbox.len() > self.config.overflow_threshold
                {
                    EvictionReason::Overflow
                } else if mailbox.idle_for() > self.config.inactivity_timeout {
                    EvictionReason::Inactive
                } else {
                    return None;
                };
                Some(Eviction {
                    user_id: user_id.clone(),
                    reason,
                })
            })
            .collect();

        for eviction in &evictions {
            if let Some(mailbox) = state.members.remove(&eviction.user_id) {
                mailbox.close();
            }
        }
        for eviction in &evictions {
            self.publish(&state.members, &Event::user_left(eviction.user_id.clone()));
        }

        if !evictions.is_empty() {
            tracing::info!(
                "Room '{}': evicted {} users: {:?}",
                self.name,
                evictions.len(),
                evictions
            );
        }
        evictions
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.members.is_empty()
    }

    pub async fn member_count(&self) -> usize {
        self.state.read().await.members.len()
    }

    pub async fn is_member(&self, user_id: &UserId) -> bool {
        self.state.read().await.members.contains_key(user_id)
    }

    /// Members sorted by user id.
    pub async fn snapshot(&self) -> Vec<MemberSnapshot> {
        let state = self.state.read().await;
        let mut members: Vec<MemberSnapshot> = state
            .members
            .iter()
            .map(|(user_id, mailbox)| MemberSnapshot {
                user_id: user_id.clone(),
                seconds_since_last_activity: mailbox.idle_for().as_secs_f64(),
                queued_events: mailbox.len(),
            })
            .collect();
        members.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        members
    }

    /// Close the room if nobody is left. Returns whether it was closed.
    pub(crate) async fn close_if_empty(&self) -> bool {
        let mut state = self.state.write().await;
        if state.members.is_empty() {
            state.closed = true;
        }
        state.closed
    }

    /// Force-close every mailbox and refuse further joins. No `UserLeft` is sent.
    pub async fn dispose(&self) -> usize {
        let mut state = self.state.write().await;
        state.closed = true;
        let disposed = state.members.len();
        for (_, mailbox) in state.members.drain() {
            mailbox.close();
        }
        tracing::info!("Room '{}': disposed {} mailboxes", self.name, disposed);
        disposed
    }
}
