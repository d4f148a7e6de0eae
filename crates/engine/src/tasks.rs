//! Task source adapter — fetches outstanding work items from the upstream API.
//!
//! Failures at this boundary degrade to an empty list: callers cannot (and
//! must not) distinguish "no tasks" from "fetch failed". The failure itself
//! is logged here.

use std::time::Duration;

use taskherald_common::types::WorkItem;

/// Highest upstream owner id whose tasks are notified. Operational constant,
/// not user-configurable.
const MAX_OWNER_ID: i64 = 5;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the upstream task source.
#[derive(Clone)]
pub struct TaskClient {
    client: reqwest::Client,
    api_url: String,
}

impl TaskClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }

    /// Fetch all upstream tasks and keep the eligible ones, preserving
    /// upstream order. Returns an empty list on any upstream failure.
    pub async fn fetch_incomplete(&self) -> Vec<WorkItem> {
        match self.try_fetch().await {
            Ok(items) => {
                let open = filter_open(items);
                tracing::debug!(count = open.len(), "Fetched eligible tasks");
                open
            }
            Err(err) => {
                tracing::error!(error = %err, "Task source fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self) -> anyhow::Result<Vec<WorkItem>> {
        let response = self
            .client
            .get(&self.api_url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("task source returned {}", status);
        }

        Ok(response.json().await?)
    }
}

/// Keep items that are not completed and belong to an eligible owner.
pub fn filter_open(items: Vec<WorkItem>) -> Vec<WorkItem> {
    items
        .into_iter()
        .filter(|item| !item.completed && item.user_id <= MAX_OWNER_ID)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, user_id: i64, completed: bool) -> WorkItem {
        WorkItem {
            id,
            user_id,
            title: format!("Task {}", id),
            completed,
        }
    }

    #[test]
    fn test_filter_drops_completed_items() {
        let open = filter_open(vec![item(1, 1, false), item(2, 2, true)]);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, 1);
    }

    #[test]
    fn test_filter_drops_high_owner_ids() {
        let open = filter_open(vec![item(1, 6, false), item(2, 5, false)]);
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, 2);
    }

    #[test]
    fn test_filter_preserves_upstream_order() {
        let open = filter_open(vec![
            item(4, 3, false),
            item(2, 2, true),
            item(1, 1, false),
            item(3, 6, false),
        ]);
        let ids: Vec<i64> = open.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[test]
    fn test_work_item_deserializes_upstream_field_names() {
        let raw = r#"{"id": 7, "userId": 3, "title": "delectus aut autem", "completed": false}"#;
        let parsed: WorkItem = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.id, 7);
        assert_eq!(parsed.user_id, 3);
        assert_eq!(parsed.title, "delectus aut autem");
        assert!(!parsed.completed);
    }
}
