use std::{collections::HashMap, sync::Arc};

use engine::{Category, EntryDate, Money};
use teloxide::types::ChatId;
use tokio::sync::Mutex;

/// What the next plain-text message from a chat is expected to be.
///
/// Each chat holds at most one pending state; storing a new one replaces the
/// previous, which is how a user abandons a flow by issuing another command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum DialogState {
    #[default]
    Idle,
    IncomeAmount,
    IncomeDate {
        amount: Money,
    },
    IncomeDescription {
        amount: Money,
        date: EntryDate,
    },
    ExpenseCategory,
    NewCategoryName {
        /// Continue with the expense amount once the category exists.
        continue_expense: bool,
    },
    ExpenseAmount {
        category: Category,
    },
    ExpenseDate {
        category: Category,
        amount: Money,
    },
    ExpenseDescription {
        category: Category,
        amount: Money,
        date: EntryDate,
    },
    PeriodStart,
    PeriodEnd {
        start: EntryDate,
    },
}

impl DialogState {
    /// Steps whose input is arbitrary text, so menu labels are taken literally.
    pub(crate) fn takes_free_text(&self) -> bool {
        matches!(
            self,
            DialogState::ExpenseCategory
                | DialogState::NewCategoryName { .. }
                | DialogState::IncomeDescription { .. }
                | DialogState::ExpenseDescription { .. }
        )
    }
}

#[derive(Clone, Default)]
pub(crate) struct SessionStore {
    inner: Arc<Mutex<HashMap<ChatId, DialogState>>>,
}

impl SessionStore {
    pub(crate) async fn get(&self, chat_id: ChatId) -> DialogState {
        let guard = self.inner.lock().await;
        guard.get(&chat_id).cloned().unwrap_or_default()
    }

    pub(crate) async fn set(&self, chat_id: ChatId, state: DialogState) {
        let mut guard = self.inner.lock().await;
        if state == DialogState::Idle {
            guard.remove(&chat_id);
        } else {
            guard.insert(chat_id, state);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_state_replaces_pending_one() {
        let store = SessionStore::default();
        let chat = ChatId(10);

        store.set(chat, DialogState::IncomeAmount).await;
        store.set(chat, DialogState::PeriodStart).await;
        assert_eq!(store.get(chat).await, DialogState::PeriodStart);

        store.set(chat, DialogState::Idle).await;
        assert_eq!(store.get(chat).await, DialogState::Idle);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn chats_are_independent() {
        let store = SessionStore::default();
        store.set(ChatId(1), DialogState::ExpenseCategory).await;

        assert_eq!(store.get(ChatId(1)).await, DialogState::ExpenseCategory);
        assert_eq!(store.get(ChatId(2)).await, DialogState::Idle);
    }
}
