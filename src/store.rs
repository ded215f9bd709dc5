//! 시나리오와 리드(보고서 요청 연락처)를 JSON 파일에 저장한다.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::roi::{ScenarioInputs, ScenarioResult};

/// 저장된 시나리오 전체. 결과는 저장 시점의 스냅샷이다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: String,
    pub name: String,
    pub inputs: ScenarioInputs,
    pub results: ScenarioResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 목록 조회용 요약.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ScenarioRecord> for ScenarioSummary {
    fn from(value: &ScenarioRecord) -> Self {
        Self {
            id: value.id.clone(),
            name: value.name.clone(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// 보고서 생성 시 남기는 연락처 기록.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub email: String,
    /// 저장된 시나리오로 생성한 경우 그 식별자. 임시 계산이면 `None`.
    pub scenario_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 저장소 작업 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 식별자에 해당하는 시나리오 없음
    #[error("시나리오를 찾을 수 없음: {0}")]
    NotFound(String),
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// inf/NaN이 포함된 결과
    #[error("유한하지 않은 결과는 저장할 수 없음: {0}")]
    NonFinite(String),
    /// JSON 직렬화/역직렬화 오류
    #[error("저장 파일 형식 오류: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    scenarios: Vec<ScenarioRecord>,
    #[serde(default)]
    leads: Vec<LeadRecord>,
}

/// 이름을 고유 키로 쓰는 시나리오 저장소.
///
/// 파일 경로가 있으면 변경 때마다 전체 문서를 다시 쓴다.
#[derive(Debug)]
pub struct ScenarioStore {
    path: Option<PathBuf>,
    data: StoreData,
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

impl ScenarioStore {
    /// 파일에서 저장소를 연다. 파일이 없으면 빈 저장소로 시작한다.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                StoreData::default()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            StoreData::default()
        };
        debug!(
            path = %path.display(),
            scenarios = data.scenarios.len(),
            "scenario store opened"
        );
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// 파일 없이 메모리에만 유지하는 저장소를 만든다.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoreData::default(),
        }
    }

    /// 이름 기준으로 저장하거나 덮어쓴다. 기존 이름이면 식별자와 생성 시각을 유지한다.
    pub fn save(
        &mut self,
        name: &str,
        inputs: ScenarioInputs,
        results: ScenarioResult,
    ) -> Result<ScenarioRecord, StoreError> {
        let bad = results.non_finite_fields();
        if !bad.is_empty() {
            return Err(StoreError::NonFinite(bad.join(", ")));
        }
        let now = Utc::now();
        let mut next = self.data.clone();
        let record = match next.scenarios.iter_mut().find(|r| r.name == name) {
            Some(existing) => {
                existing.inputs = inputs;
                existing.results = results;
                // updated_at은 감소하지 않는다.
                existing.updated_at = now.max(existing.updated_at);
                existing.clone()
            }
            None => {
                let record = ScenarioRecord {
                    id: new_id(),
                    name: name.to_string(),
                    inputs,
                    results,
                    created_at: now,
                    updated_at: now,
                };
                next.scenarios.push(record.clone());
                record
            }
        };
        self.commit(next)?;
        info!(id = %record.id, name = %record.name, "scenario saved");
        Ok(record)
    }

    /// 최근 수정 순으로 요약 목록을 돌려준다.
    pub fn list(&self) -> Vec<ScenarioSummary> {
        let mut rows: Vec<ScenarioSummary> =
            self.data.scenarios.iter().map(ScenarioSummary::from).collect();
        rows.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        rows
    }

    /// 식별자로 시나리오를 조회한다.
    pub fn get(&self, id: &str) -> Result<ScenarioRecord, StoreError> {
        self.data
            .scenarios
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// 식별자로 시나리오를 삭제한다.
    pub fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        let mut next = self.data.clone();
        next.scenarios.retain(|r| r.id != id);
        if next.scenarios.len() == self.data.scenarios.len() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.commit(next)?;
        info!(id, "scenario deleted");
        Ok(())
    }

    /// 보고서 요청 연락처를 기록한다.
    pub fn record_lead(
        &mut self,
        email: &str,
        scenario_id: Option<&str>,
    ) -> Result<LeadRecord, StoreError> {
        let lead = LeadRecord {
            id: new_id(),
            email: email.to_string(),
            scenario_id: scenario_id.map(str::to_string),
            created_at: Utc::now(),
        };
        let mut next = self.data.clone();
        next.leads.push(lead.clone());
        self.commit(next)?;
        info!(id = %lead.id, scenario_id = ?lead.scenario_id, "lead recorded");
        Ok(lead)
    }

    /// 기록된 연락처 목록.
    pub fn leads(&self) -> &[LeadRecord] {
        &self.data.leads
    }

    /// 변경된 문서를 먼저 기록하고, 성공한 경우에만 메모리 상태를 교체한다.
    fn commit(&mut self, next: StoreData) -> Result<(), StoreError> {
        self.flush(&next)?;
        self.data = next;
        Ok(())
    }

    fn flush(&self, data: &StoreData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
