//! Recommendation Pool Manager: one `SkillBoard` per wizard instance.
//!
//! All pool mutations go through the methods below and enforce the
//! one-entry-per-identity rule on write. `generate` never holds the state lock
//! across the generation call: it snapshots what the prompt needs, releases
//! the lock, and merges against the pools as they are when the response
//! arrives. Responses issued under a session token that has since been
//! rotated are dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::skills::classify::{summarize, SkillSummary};
use crate::skills::dedup::{contains_identity, dedupe, find_conflict, IdentityPool, IdentitySet};
use crate::skills::fallback::fallback_skills;
use crate::skills::generator::{DescribeRequest, GenerationRequest, SkillGenerator};
use crate::skills::identity::{SkillIdentity, SkillLike};
use crate::skills::merge::{self, extend_history};
use crate::skills::models::{
    CustomSkill, NewCustomSkill, ProfileContext, RecommendedSkill, SelectedSkill, SkillPatch,
};
use crate::skills::prompts::NOTHING_TO_AVOID;
use crate::skills::session::{SessionController, SessionToken};
use crate::skills::store::{BoardMirror, MirrorView, PersistenceAdapter};

pub const FALLBACK_ADVISORY: &str = "Skill recommendations are temporarily unavailable. \
    Showing a basic set of common skills instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeIntent {
    /// Start over: the new batch replaces the pool and the history.
    Replace,
    /// Add more: the new batch is appended minus duplicates.
    Supplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateStatus {
    Applied,
    /// The session was reset while the call was in flight.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOutcome {
    pub intent: MergeIntent,
    pub status: GenerateStatus,
    pub source: CandidateSource,
    pub admitted: usize,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// Read-only snapshot of a board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub board_id: Uuid,
    pub session_token: Option<SessionToken>,
    pub recommended: Vec<RecommendedSkill>,
    pub custom: Vec<CustomSkill>,
    pub history_len: usize,
    pub generating: bool,
}

/// Payload handed to the next wizard step.
#[derive(Debug, Clone, Serialize)]
pub struct SkillHandoff {
    pub selection: Vec<SelectedSkill>,
    pub custom: Vec<CustomSkill>,
    pub summary: SkillSummary,
}

#[derive(Debug, Default)]
struct BoardState {
    session: SessionController,
    recommended: Vec<RecommendedSkill>,
    history: Vec<RecommendedSkill>,
    custom: Vec<CustomSkill>,
}

impl BoardState {
    fn active_token(&self) -> Result<SessionToken, AppError> {
        Ok(self.session.require_active()?)
    }

    fn position(&self, id: &SkillIdentity) -> Option<usize> {
        self.recommended.iter().position(|r| &r.identity() == id)
    }
}

/// Clears the busy flag when the generate call finishes, however it finishes.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SkillBoard {
    id: Uuid,
    profile: ProfileContext,
    generator: Arc<dyn SkillGenerator>,
    mirror: BoardMirror,
    recommend_count: usize,
    state: Mutex<BoardState>,
    busy: AtomicBool,
}

impl SkillBoard {
    /// Builds a board for one wizard instance and starts its first session.
    /// `saved_custom` is the custom pool carried over from an earlier visit.
    pub async fn open(
        profile: ProfileContext,
        saved_custom: Vec<NewCustomSkill>,
        generator: Arc<dyn SkillGenerator>,
        store: Arc<dyn PersistenceAdapter>,
        recommend_count: usize,
    ) -> Result<Self, AppError> {
        if let Some(blank) = saved_custom.iter().position(|c| c.name.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "custom skill #{} has an empty name",
                blank + 1
            )));
        }
        let mut custom = dedupe(
            saved_custom
                .into_iter()
                .map(NewCustomSkill::into_custom)
                .collect(),
        );
        let mut ids = HashSet::new();
        for skill in &mut custom {
            if !ids.insert(skill.id) {
                skill.id = Uuid::new_v4();
                ids.insert(skill.id);
            }
        }

        let id = Uuid::new_v4();
        let board = SkillBoard {
            id,
            profile,
            generator,
            mirror: BoardMirror::new(id, store),
            recommend_count,
            state: Mutex::new(BoardState {
                custom,
                ..BoardState::default()
            }),
            busy: AtomicBool::new(false),
        };

        let mut state = board.state.lock().await;
        let token = state.session.initialize();
        board.mirror_fresh_session(&state, token).await;
        info!(
            "Opened skill board {id} (session {token}, {} custom skills)",
            state.custom.len()
        );
        drop(state);

        Ok(board)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_generating(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn view(&self) -> BoardView {
        let state = self.state.lock().await;
        BoardView {
            board_id: self.id,
            session_token: state.session.current(),
            recommended: state.recommended.clone(),
            custom: state.custom.clone(),
            history_len: state.history.len(),
            generating: self.is_generating(),
        }
    }

    /// Asks the generation service for candidates and merges them according to
    /// `intent`. Service failures fall back to the built-in list; only a second
    /// concurrent call or an uninitialized session is an error.
    pub async fn generate(&self, intent: MergeIntent) -> Result<GenerateOutcome, AppError> {
        let _busy = self.claim_busy()?;

        let (token, request) = {
            let state = self.state.lock().await;
            let token = state.active_token()?;
            let request = GenerationRequest {
                profile: self.profile.render(),
                avoid: render_avoid_list(&state.history, &state.custom),
                count: self.recommend_count,
            };
            (token, request)
        };

        let (candidates, source, advisory) = match self.generator.recommend(&request).await {
            Ok(candidates) => (candidates, CandidateSource::Generated, None),
            Err(e) => {
                warn!("Board {}: generation failed, using fallback skills: {e}", self.id);
                (
                    fallback_skills(),
                    CandidateSource::Fallback,
                    Some(FALLBACK_ADVISORY.to_string()),
                )
            }
        };

        let mut state = self.state.lock().await;
        if !state.session.is_current(token) {
            warn!(
                "Board {}: discarding {intent:?} response issued under stale session {token}",
                self.id
            );
            return Ok(GenerateOutcome {
                intent,
                status: GenerateStatus::Discarded,
                source,
                admitted: 0,
                rejected: 0,
                advisory,
            });
        }

        let merged = match intent {
            MergeIntent::Replace => merge::replace(candidates),
            MergeIntent::Supplement => merge::supplement(
                &state.recommended,
                &state.history,
                &state.custom,
                candidates,
            ),
        };
        state.recommended = merged.recommended;
        state.history = merged.history;

        self.mirror
            .write_recommended(token, &state.recommended)
            .await;
        if let Some(minted_at) = state.session.minted_at() {
            self.mirror.write_session(token, minted_at).await;
        }

        info!(
            "Board {}: {intent:?} from {source:?} admitted {} / rejected {} (pool {})",
            self.id,
            merged.admitted,
            merged.rejected,
            state.recommended.len()
        );

        Ok(GenerateOutcome {
            intent,
            status: GenerateStatus::Applied,
            source,
            admitted: merged.admitted,
            rejected: merged.rejected,
            advisory,
        })
    }

    /// Flips `selected` on the matching candidate. Returns the new value, or
    /// `None` when no candidate has that identity.
    pub async fn toggle_selection(&self, id: &SkillIdentity) -> Result<Option<bool>, AppError> {
        let mut state = self.state.lock().await;
        let token = state.active_token()?;
        let Some(idx) = state.position(id) else {
            return Ok(None);
        };
        let entry = &mut state.recommended[idx];
        entry.selected = !entry.selected;
        let selected = entry.selected;
        self.mirror
            .write_recommended(token, &state.recommended)
            .await;
        Ok(Some(selected))
    }

    /// Applies `patch` to a recommended candidate. When the name, level or
    /// category changes, or the description ends up empty, a fresh description
    /// is requested. That request is best effort: the edit stands either way.
    pub async fn edit_candidate(
        &self,
        id: &SkillIdentity,
        patch: SkillPatch,
    ) -> Result<RecommendedSkill, AppError> {
        if patch.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::Validation("skill name cannot be empty".to_string()));
        }

        let (token, edited, regenerate) = {
            let mut state = self.state.lock().await;
            let token = state.active_token()?;
            let idx = state
                .position(id)
                .ok_or_else(|| AppError::NotFound(format!("recommended skill '{}'", id.name)))?;

            let current = state.recommended[idx].clone();
            let edited = apply_patch(&current, &patch);

            if edited.identity() != current.identity() {
                let others: Vec<RecommendedSkill> = state
                    .recommended
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != idx)
                    .map(|(_, r)| r.clone())
                    .collect();
                let pools: [&dyn IdentityPool; 2] = [&others, &state.custom];
                if contains_identity(&edited, &pools) {
                    return Err(conflict_error(&edited, &others, &state.custom));
                }
            }

            let explicit_description = patch
                .description
                .as_deref()
                .is_some_and(|d| !d.trim().is_empty());
            let regenerate = !explicit_description
                && (edited.name != current.name
                    || edited.level != current.level
                    || edited.category != current.category
                    || edited
                        .description
                        .as_deref()
                        .map_or(true, |d| d.trim().is_empty()));

            state.recommended[idx] = edited.clone();
            state.history = extend_history(&state.history, std::slice::from_ref(&edited));
            self.mirror
                .write_recommended(token, &state.recommended)
                .await;
            (token, edited, regenerate)
        };

        if !regenerate {
            return Ok(edited);
        }

        let request = DescribeRequest {
            name: edited.name.clone(),
            category: edited.category.clone(),
            level: edited.level,
            profile: self.profile.render(),
        };
        let description = match self.generator.describe(&request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Board {}: description refresh for '{}' failed, keeping edit: {e}",
                    self.id, edited.name
                );
                return Ok(edited);
            }
        };

        let mut state = self.state.lock().await;
        if !state.session.is_current(token) {
            return Ok(edited);
        }
        let Some(idx) = state.position(&edited.identity()) else {
            return Ok(edited);
        };
        state.recommended[idx].description = Some(description);
        let updated = state.recommended[idx].clone();
        self.mirror
            .write_recommended(token, &state.recommended)
            .await;
        Ok(updated)
    }

    /// Adds a user-authored skill. Rejected when its identity already exists
    /// in either pool.
    pub async fn add_custom(&self, skill: NewCustomSkill) -> Result<CustomSkill, AppError> {
        if skill.name.trim().is_empty() {
            return Err(AppError::Validation("skill name cannot be empty".to_string()));
        }

        let mut state = self.state.lock().await;
        state.active_token()?;
        let pools: [&dyn IdentityPool; 2] = [&state.recommended, &state.custom];
        if contains_identity(&skill, &pools) {
            let err = conflict_error(&skill, &state.recommended, &state.custom);
            info!("Board {}: rejected custom skill: {err}", self.id);
            return Err(err);
        }

        let mut custom = skill.into_custom();
        if state.custom.iter().any(|c| c.id == custom.id) {
            custom.id = Uuid::new_v4();
        }
        state.custom.push(custom.clone());
        state.custom = dedupe(std::mem::take(&mut state.custom));
        Ok(custom)
    }

    pub async fn remove_custom(&self, skill_id: Uuid) -> Result<CustomSkill, AppError> {
        let mut state = self.state.lock().await;
        state.active_token()?;
        let idx = state
            .custom
            .iter()
            .position(|c| c.id == skill_id)
            .ok_or_else(|| AppError::NotFound(format!("custom skill {skill_id}")))?;
        Ok(state.custom.remove(idx))
    }

    /// Drops every selected recommendation. History keeps them.
    pub async fn remove_selected_recommended(&self) -> Result<usize, AppError> {
        let mut state = self.state.lock().await;
        let token = state.active_token()?;
        let before = state.recommended.len();
        state.recommended.retain(|r| !r.selected);
        let removed = before - state.recommended.len();
        if removed > 0 {
            self.mirror
                .write_recommended(token, &state.recommended)
                .await;
        }
        Ok(removed)
    }

    /// Empties the recommended pool and history and starts a new session.
    /// Custom skills are untouched.
    pub async fn clear_all_recommended(&self) -> Result<SessionToken, AppError> {
        let mut state = self.state.lock().await;
        let previous = state.active_token()?;
        state.recommended.clear();
        state.history.clear();
        let token = state.session.reset();
        self.mirror_fresh_session(&state, token).await;
        info!("Board {}: session reset {previous} -> {token}", self.id);
        Ok(token)
    }

    pub async fn handoff(&self) -> SkillHandoff {
        let state = self.state.lock().await;
        let selection = merge::select(&state.recommended, &state.custom);
        SkillHandoff {
            summary: summarize(&selection),
            selection,
            custom: state.custom.clone(),
        }
    }

    pub async fn mirror_view(&self) -> Result<MirrorView, AppError> {
        self.mirror
            .inspect()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// Drops everything mirrored for this board. Called when the board leaves the registry.
    pub async fn close(&self) {
        self.mirror.clear().await;
        info!("Closed skill board {}", self.id);
    }

    fn claim_busy(&self) -> Result<BusyGuard<'_>, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                AppError::Busy("a recommendation request is already in progress".to_string())
            })?;
        Ok(BusyGuard(&self.busy))
    }

    /// Removes whatever was mirrored before and writes the empty pool and
    /// the new token.
    async fn mirror_fresh_session(&self, state: &BoardState, token: SessionToken) {
        self.mirror.clear().await;
        self.mirror
            .write_recommended(token, &state.recommended)
            .await;
        if let Some(minted_at) = state.session.minted_at() {
            self.mirror.write_session(token, minted_at).await;
        }
    }
}

/// Builds the 409 for a skill already known to collide, naming the existing record.
fn conflict_error<C: SkillLike + ?Sized>(
    candidate: &C,
    recommended: &[RecommendedSkill],
    custom: &[CustomSkill],
) -> AppError {
    let message = find_conflict(candidate, recommended, custom)
        .map(|conflict| conflict.message())
        .unwrap_or_else(|| format!("'{}' already exists", candidate.name().trim()));
    AppError::Conflict(message)
}

fn apply_patch(current: &RecommendedSkill, patch: &SkillPatch) -> RecommendedSkill {
    let mut next = current.clone();
    if let Some(name) = &patch.name {
        next.name = name.trim().to_string();
    }
    if let Some(category) = &patch.category {
        next.category = category.trim().to_string();
    }
    if let Some(level) = patch.level {
        next.level = level;
    }
    if let Some(description) = &patch.description {
        let description = description.trim();
        next.description = (!description.is_empty()).then(|| description.to_string());
    }
    next
}

/// Renders history and custom skills as the "do not repeat" hint.
fn render_avoid_list(history: &[RecommendedSkill], custom: &[CustomSkill]) -> String {
    let mut seen = IdentitySet::new();
    let entries: Vec<String> = history
        .iter()
        .map(|r| (r.identity(), r.name.as_str(), r.category.as_str()))
        .chain(
            custom
                .iter()
                .map(|c| (c.identity(), c.name.as_str(), c.category.as_str())),
        )
        .filter(|(id, _, _)| seen.insert(id))
        .map(|(_, name, category)| {
            if category.trim().is_empty() {
                name.to_string()
            } else {
                format!("{name} ({category})")
            }
        })
        .collect();

    if entries.is_empty() {
        NOTHING_TO_AVOID.to_string()
    } else {
        entries.join(", ")
    }
}
