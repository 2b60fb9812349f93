//! Bounded cache in front of user lookups by chat identifier.
//!
//! Only hits are stored: a lookup that finds nothing is never memoized, so a
//! user registered after a failed lookup is visible right away. Writes to a
//! user refresh its entry. When full, the oldest entry is evicted.

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::User;

pub(crate) const DEFAULT_USER_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<i64, User>,
    order: VecDeque<i64>,
}

#[derive(Clone, Debug)]
pub(crate) struct UserCache {
    capacity: usize,
    inner: Arc<RwLock<CacheState>>,
}

impl UserCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Arc::new(RwLock::new(CacheState::default())),
        }
    }

    pub(crate) async fn get(&self, telegram_id: i64) -> Option<User> {
        let guard = self.inner.read().await;
        guard.entries.get(&telegram_id).cloned()
    }

    pub(crate) async fn put(&self, user: User) {
        if self.capacity == 0 {
            return;
        }
        let mut guard = self.inner.write().await;
        let key = user.telegram_id;
        if guard.entries.insert(key, user).is_some() {
            return;
        }
        guard.order.push_back(key);
        while guard.order.len() > self.capacity {
            if let Some(oldest) = guard.order.pop_front() {
                guard.entries.remove(&oldest);
            }
        }
    }

    pub(crate) async fn invalidate(&self, telegram_id: i64) {
        let mut guard = self.inner.write().await;
        if guard.entries.remove(&telegram_id).is_some() {
            guard.order.retain(|id| *id != telegram_id);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}
