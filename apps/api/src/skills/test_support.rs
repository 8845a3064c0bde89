//! Fixtures and scripted collaborators shared by the skill tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::skills::generator::{
    DescribeRequest, GenerationError, GenerationRequest, SkillGenerator,
};
use crate::skills::models::{
    CustomSkill, NewCustomSkill, Priority, ProficiencyLevel, RecommendedSkill,
};
use crate::skills::store::{PersistenceAdapter, StoreError};

pub fn recommended(name: &str, category: &str) -> RecommendedSkill {
    RecommendedSkill {
        name: name.to_string(),
        category: category.to_string(),
        level: ProficiencyLevel::Proficient,
        reason: format!("{name} is common in postings"),
        priority: Priority::Medium,
        selected: false,
        salary_impact: None,
        learning_time: None,
        trend: None,
        description: None,
    }
}

pub fn selected(name: &str, category: &str) -> RecommendedSkill {
    RecommendedSkill {
        selected: true,
        priority: Priority::High,
        ..recommended(name, category)
    }
}

pub fn custom(name: &str, category: &str) -> CustomSkill {
    CustomSkill {
        id: Uuid::new_v4(),
        name: name.to_string(),
        level: ProficiencyLevel::Proficient,
        category: category.to_string(),
        description: String::new(),
    }
}

pub fn custom_request(name: &str, category: &str) -> NewCustomSkill {
    NewCustomSkill {
        id: None,
        name: name.to_string(),
        level: ProficiencyLevel::Proficient,
        category: category.to_string(),
        description: String::new(),
    }
}

/// Replays queued results in order and records every request.
/// An exhausted queue answers `Empty`.
#[derive(Default)]
pub struct ScriptedGenerator {
    batches: Mutex<VecDeque<Result<Vec<RecommendedSkill>, GenerationError>>>,
    descriptions: Mutex<VecDeque<Result<String, GenerationError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    describe_requests: Mutex<Vec<DescribeRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_batch(&self, batch: Vec<RecommendedSkill>) {
        self.batches.lock().unwrap().push_back(Ok(batch));
    }

    pub fn push_error(&self, error: GenerationError) {
        self.batches.lock().unwrap().push_back(Err(error));
    }

    pub fn push_description(&self, result: Result<String, GenerationError>) {
        self.descriptions.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn describe_requests(&self) -> Vec<DescribeRequest> {
        self.describe_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SkillGenerator for ScriptedGenerator {
    async fn recommend(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RecommendedSkill>, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::Empty))
    }

    async fn describe(&self, request: &DescribeRequest) -> Result<String, GenerationError> {
        self.describe_requests.lock().unwrap().push(request.clone());
        self.descriptions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::Empty))
    }
}

/// Holds every `recommend` call until `release` is called, so tests can act
/// while a request is in flight.
pub struct GatedGenerator {
    batch: Vec<RecommendedSkill>,
    started: Notify,
    gate: Notify,
}

impl GatedGenerator {
    pub fn new(batch: Vec<RecommendedSkill>) -> Self {
        Self {
            batch,
            started: Notify::new(),
            gate: Notify::new(),
        }
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl SkillGenerator for GatedGenerator {
    async fn recommend(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<RecommendedSkill>, GenerationError> {
        self.started.notify_one();
        self.gate.notified().await;
        Ok(self.batch.clone())
    }

    async fn describe(&self, _request: &DescribeRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Empty)
    }
}

/// A store whose every call fails.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Redis(redis::RedisError::from((
        redis::ErrorKind::IoError,
        "store unavailable",
    )))
}

#[async_trait]
impl PersistenceAdapter for FailingStore {
    async fn write(&self, _key: &str, _value: &Value) -> Result<(), StoreError> {
        Err(unavailable())
    }

    async fn read(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(unavailable())
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
