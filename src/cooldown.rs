//! Per-key cooldowns
//!
//! A key that starts cooling down stays blocked for one fixed duration and
//! then expires on its own. A second attempt while blocked is rejected and
//! does not extend the cooldown.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

struct Slots<K> {
    active: HashMap<K, u64>,
    next_generation: u64,
}

/// Keyed debounce set with automatic expiry.
///
/// Each accepted key gets a one-shot tokio task that removes it after the
/// requested duration. Expiry and insertion share one lock, and each
/// insertion is tagged with a generation so a stale timer never removes a
/// newer cooldown of the same key.
///
/// Must be used from within a tokio runtime.
pub struct CooldownRegister<K> {
    slots: Arc<Mutex<Slots<K>>>,
}

impl<K> Clone for CooldownRegister<K> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<K> Default for CooldownRegister<K> {
    fn default() -> Self {
        Self {
            slots: Arc::new(Mutex::new(Slots {
                active: HashMap::new(),
                next_generation: 0,
            })),
        }
    }
}

impl<K> CooldownRegister<K>
where
    K: Eq + Hash + Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slots<K>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start cooling down `key` for `duration`.
    ///
    /// Returns `false` without touching the existing timer when the key is
    /// already cooling down.
    pub fn try_cool_down(&self, key: K, duration: Duration) -> bool {
        let mut slots = self.lock();
        if slots.active.contains_key(&key) {
            return false;
        }

        slots.next_generation += 1;
        let generation = slots.next_generation;
        slots.active.insert(key.clone(), generation);
        drop(slots);

        let register = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let mut slots = register.lock();
            if slots.active.get(&key) == Some(&generation) {
                slots.active.remove(&key);
                debug!("Cooldown expired");
            }
        });

        true
    }

    /// End the cooldown of `key` early. Returns whether it was cooling down.
    pub fn remove(&self, key: &K) -> bool {
        self.lock().active.remove(key).is_some()
    }

    pub fn is_cooling_down(&self, key: &K) -> bool {
        self.lock().active.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().active.is_empty()
    }
}

/// Cooldown settings for one guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildCooldown {
    pub duration: Duration,
    pub message: String,
}

/// Outcome of asking to perform a throttled action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    /// Rejected; carries the message configured for the guild
    CoolingDown(String),
}

/// Per-channel throttling with guild-specific durations.
///
/// Direct messages (no guild) and guilds with a zero duration are never
/// throttled.
pub struct CooldownPolicy {
    default: GuildCooldown,
    per_guild: HashMap<String, GuildCooldown>,
    register: CooldownRegister<String>,
}

impl CooldownPolicy {
    pub fn new(default: GuildCooldown, per_guild: HashMap<String, GuildCooldown>) -> Self {
        Self {
            default,
            per_guild,
            register: CooldownRegister::new(),
        }
    }

    /// Settings that apply to `guild_id`
    pub fn settings_for(&self, guild_id: &str) -> &GuildCooldown {
        self.per_guild.get(guild_id).unwrap_or(&self.default)
    }

    pub fn try_cool_down(&self, channel_id: &str, guild_id: Option<&str>) -> Admission {
        let Some(guild_id) = guild_id.filter(|g| !g.is_empty()) else {
            return Admission::Accepted;
        };

        let settings = self.settings_for(guild_id);
        if settings.duration.is_zero()
            || self
                .register
                .try_cool_down(channel_id.to_string(), settings.duration)
        {
            Admission::Accepted
        } else {
            Admission::CoolingDown(settings.message.clone())
        }
    }

    /// Lift the cooldown of a channel, e.g. when the action it guarded
    /// turned out not to post anything.
    pub fn remove_cool_down(&self, channel_id: &str) {
        self.register.remove(&channel_id.to_string());
    }
}
