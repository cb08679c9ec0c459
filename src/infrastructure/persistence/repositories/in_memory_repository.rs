use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{
    CallRepository, ChecklistProvider, ChecklistRepository, RepositoryError, StatusUpdate,
};
use crate::domain::{
    AnalysisStatus, Call, CallId, ChecklistItem, ChecklistItemId, ChecklistItemPatch, Criterion,
    CriterionScore, CriterionScoreView, RunToken, Score, UserId,
};

/// Process-local store holding calls, checklist items and criterion scores
/// behind one lock, so a run's completion is applied as a single step.
///
/// Used when no database is configured and as the backing store in tests.
#[derive(Default)]
pub struct InMemoryRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    calls: HashMap<CallId, Call>,
    checklist: HashMap<ChecklistItemId, ChecklistItem>,
    scores: HashMap<CallId, Vec<CriterionScore>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checklist(items: Vec<ChecklistItem>) -> Self {
        let state = State {
            checklist: items.into_iter().map(|i| (i.id, i)).collect(),
            ..State::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    /// Raw score rows stored for a call, in insertion order.
    pub async fn stored_scores(&self, id: CallId) -> Vec<CriterionScore> {
        self.state
            .read()
            .await
            .scores
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }
}

fn ordered(items: impl Iterator<Item = ChecklistItem>) -> Vec<ChecklistItem> {
    let mut items: Vec<ChecklistItem> = items.collect();
    items.sort_by_key(|i| (i.order_index, i.id));
    items
}

#[async_trait]
impl CallRepository for InMemoryRepository {
    async fn create(&self, call: &Call) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.calls.contains_key(&call.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "call {} already exists",
                call.id
            )));
        }
        state.calls.insert(call.id, call.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: CallId) -> Result<Option<Call>, RepositoryError> {
        Ok(self.state.read().await.calls.get(&id).cloned())
    }

    async fn list(&self, manager_id: Option<UserId>) -> Result<Vec<Call>, RepositoryError> {
        let state = self.state.read().await;
        let mut calls: Vec<Call> = state
            .calls
            .values()
            .filter(|c| manager_id.is_none_or(|m| c.manager_id == m))
            .cloned()
            .collect();
        calls.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(calls)
    }

    async fn criterion_scores(
        &self,
        id: CallId,
    ) -> Result<Vec<CriterionScoreView>, RepositoryError> {
        let state = self.state.read().await;
        let mut rows: Vec<(i32, CriterionScoreView)> = state
            .scores
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|s| {
                let item = state.checklist.get(&s.criterion_id)?;
                Some((
                    item.order_index,
                    CriterionScoreView {
                        criterion_id: s.criterion_id,
                        category: item.category.clone(),
                        criterion: item.criterion.clone(),
                        passed: s.passed,
                        ai_comment: s.ai_comment.clone(),
                    },
                ))
            })
            .collect();
        rows.sort_by_key(|(order, view)| (*order, view.criterion_id));
        Ok(rows.into_iter().map(|(_, view)| view).collect())
    }

    async fn begin_run(&self, id: CallId, token: RunToken) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let call = state
            .calls
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        call.status = AnalysisStatus::Transcribing;
        call.run_token = Some(token);
        call.transcript = None;
        call.score = None;
        call.summary = None;
        Ok(())
    }

    async fn update_status(
        &self,
        id: CallId,
        token: RunToken,
        update: StatusUpdate,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        let call = state
            .calls
            .get_mut(&id)
            .filter(|c| c.run_token == Some(token))
            .ok_or_else(|| RepositoryError::StaleRun(id))?;
        ensure_transition(call, update.status)?;
        call.status = update.status;
        if let Some(transcript) = update.transcript {
            call.transcript = Some(transcript);
        }
        if let Some(summary) = update.summary {
            call.summary = Some(summary);
        }
        Ok(())
    }

    async fn complete_run(
        &self,
        id: CallId,
        token: RunToken,
        score: Score,
        summary: &str,
        scores: &[CriterionScore],
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;

        if let Some(missing) = scores
            .iter()
            .find(|s| !state.checklist.contains_key(&s.criterion_id))
        {
            return Err(RepositoryError::ConstraintViolation(format!(
                "unknown criterion {}",
                missing.criterion_id
            )));
        }

        let call = state
            .calls
            .get_mut(&id)
            .filter(|c| c.run_token == Some(token))
            .ok_or_else(|| RepositoryError::StaleRun(id))?;
        ensure_transition(call, AnalysisStatus::Done)?;
        call.status = AnalysisStatus::Done;
        call.score = Some(score);
        call.summary = Some(summary.to_string());

        state.scores.insert(id, scores.to_vec());
        Ok(())
    }
}

#[async_trait]
impl ChecklistProvider for InMemoryRepository {
    async fn active_criteria(&self) -> Result<Vec<Criterion>, RepositoryError> {
        let state = self.state.read().await;
        Ok(ordered(state.checklist.values().filter(|i| i.is_active).cloned())
            .iter()
            .map(ChecklistItem::as_criterion)
            .collect())
    }
}

#[async_trait]
impl ChecklistRepository for InMemoryRepository {
    async fn list_all(&self) -> Result<Vec<ChecklistItem>, RepositoryError> {
        let state = self.state.read().await;
        Ok(ordered(state.checklist.values().cloned()))
    }

    async fn create(&self, item: &ChecklistItem) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        if state.checklist.contains_key(&item.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "checklist item {} already exists",
                item.id
            )));
        }
        state.checklist.insert(item.id, item.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: ChecklistItemId,
        patch: ChecklistItemPatch,
    ) -> Result<Option<ChecklistItem>, RepositoryError> {
        let mut state = self.state.write().await;
        Ok(state.checklist.get_mut(&id).map(|item| {
            patch.apply(item);
            item.clone()
        }))
    }

    async fn delete(&self, id: ChecklistItemId) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let removed = state.checklist.remove(&id).is_some();
        if removed {
            for rows in state.scores.values_mut() {
                rows.retain(|s| s.criterion_id != id);
            }
        }
        Ok(removed)
    }
}

fn ensure_transition(call: &Call, to: AnalysisStatus) -> Result<(), RepositoryError> {
    if call.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(RepositoryError::InvalidTransition {
            call_id: call.id,
            from: call.status,
            to,
        })
    }
}
