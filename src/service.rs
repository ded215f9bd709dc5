//! 검증, 계산, 저장, 보고서 생성을 묶는 경계 계층.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::report::{build_report, ReportArtifact, ReportScenario};
use crate::roi::{compute, BiasConfig, ScenarioInputs, ScenarioResult};
use crate::store::{ScenarioRecord, ScenarioStore, ScenarioSummary, StoreError};
use crate::validation::{
    validate_email, validate_id, validate_inputs, validate_name, validate_result,
    RawScenarioInputs, ValidationError,
};

/// 임시 계산 보고서에 붙는 시나리오 이름.
pub const ADHOC_SCENARIO_NAME: &str = "Ad-hoc";

/// 호출자에게 노출되는 오류 분류.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 입력 검증 실패
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 식별자에 해당하는 레코드 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),
    /// 저장/렌더링 등 외부 요인 실패. 내부 상세는 로그에만 남긴다.
    #[error("{0}")]
    Upstream(&'static str),
}

impl ServiceError {
    fn upstream(context: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ServiceError::NotFound(id),
            other => {
                error!(error = %other, "{context}");
                ServiceError::Upstream(context)
            }
        }
    }
}

/// 계산 요청의 응답.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    pub inputs: ScenarioInputs,
    pub results: ScenarioResult,
}

/// 보고서 생성 요청. 저장된 시나리오 식별자 또는 임시 입력 중 하나가 필요하다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    pub email: String,
    #[serde(default, rename = "scenarioId", alias = "scenario_id")]
    pub scenario_id: Option<String>,
    #[serde(default)]
    pub inputs: Option<RawScenarioInputs>,
}

/// 바이어스 설정과 저장소를 가지고 요청을 처리한다.
#[derive(Debug)]
pub struct RoiService {
    bias: BiasConfig,
    store: ScenarioStore,
}

impl RoiService {
    pub fn new(bias: BiasConfig, store: ScenarioStore) -> Self {
        Self { bias, store }
    }

    pub fn bias(&self) -> &BiasConfig {
        &self.bias
    }

    pub fn store(&self) -> &ScenarioStore {
        &self.store
    }

    /// 입력을 검증하고 ROI를 계산한다. 저장하지 않는다.
    pub fn simulate(&self, raw: &RawScenarioInputs) -> Result<Simulation, ServiceError> {
        let inputs = validate_inputs(raw)?;
        let results = compute(&inputs, &self.bias);
        validate_result(&results)?;
        Ok(Simulation { inputs, results })
    }

    /// 계산 결과와 함께 이름으로 시나리오를 저장한다.
    pub fn save_scenario(
        &mut self,
        name: &str,
        raw: &RawScenarioInputs,
    ) -> Result<ScenarioRecord, ServiceError> {
        let name = validate_name(name)?;
        let Simulation { inputs, results } = self.simulate(raw)?;
        self.store
            .save(&name, inputs, results)
            .map_err(|e| ServiceError::upstream("save scenario failed", e))
    }

    pub fn list_scenarios(&self) -> Vec<ScenarioSummary> {
        self.store.list()
    }

    pub fn get_scenario(&self, id: &str) -> Result<ScenarioRecord, ServiceError> {
        let id = validate_id(id)?;
        self.store
            .get(id)
            .map_err(|e| ServiceError::upstream("get scenario failed", e))
    }

    pub fn delete_scenario(&mut self, id: &str) -> Result<(), ServiceError> {
        let id = validate_id(id)?;
        self.store
            .delete(id)
            .map_err(|e| ServiceError::upstream("delete scenario failed", e))
    }

    /// 연락처를 기록하고 보고서를 만든다.
    pub fn generate_report(&mut self, req: &ReportRequest) -> Result<ReportArtifact, ServiceError> {
        let email = validate_email(req.email.trim())?;

        let (scenario_id, name, inputs, results) = match (&req.scenario_id, &req.inputs) {
            (Some(id), _) => {
                let record = self.get_scenario(id)?;
                (Some(record.id), record.name, record.inputs, record.results)
            }
            (None, Some(raw)) => {
                let Simulation { inputs, results } = self.simulate(raw)?;
                (None, ADHOC_SCENARIO_NAME.to_string(), inputs, results)
            }
            (None, None) => {
                return Err(ValidationError::single(
                    "scenarioId",
                    "scenarioId 또는 inputs가 필요함",
                )
                .into())
            }
        };

        self.store
            .record_lead(email, scenario_id.as_deref())
            .map_err(|e| ServiceError::upstream("report generation failed", e))?;

        let artifact = build_report(&ReportScenario {
            name: &name,
            inputs: &inputs,
            results: &results,
        });
        debug!(file = %artifact.file_name, bytes = artifact.body.len(), "report rendered");
        Ok(artifact)
    }
}
