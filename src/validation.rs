//! 외부 요청 값을 검증해 계산 입력으로 바꾸는 경계.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roi::{ScenarioInputs, ScenarioResult};

/// 시나리오 이름 최대 길이(문자 수).
pub const MAX_NAME_LEN: usize = 191;
/// 식별자 최대 길이.
pub const MAX_ID_LEN: usize = 64;

/// 검증 전 요청 값. 모든 필드가 선택적이며 숫자는 JSON 숫자 그대로 받는다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawScenarioInputs {
    pub monthly_invoice_volume: Option<f64>,
    pub avg_hours_per_invoice: Option<f64>,
    pub hourly_wage: Option<f64>,
    pub error_rate_manual: Option<f64>,
    pub error_cost: Option<f64>,
    pub time_horizon_months: Option<f64>,
    pub one_time_implementation_cost: Option<f64>,
}

impl From<&ScenarioInputs> for RawScenarioInputs {
    fn from(value: &ScenarioInputs) -> Self {
        Self {
            monthly_invoice_volume: Some(f64::from(value.monthly_invoice_volume)),
            avg_hours_per_invoice: Some(value.avg_hours_per_invoice),
            hourly_wage: Some(value.hourly_wage),
            error_rate_manual: Some(value.error_rate_manual),
            error_cost: Some(value.error_cost),
            time_horizon_months: Some(f64::from(value.time_horizon_months)),
            one_time_implementation_cost: Some(value.one_time_implementation_cost),
        }
    }
}

/// 필드 하나에 대한 검증 실패.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

/// 요청 값이 제약 조건을 만족하지 않을 때의 오류. 위반 항목을 모두 담는다.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("입력값 오류: {}", describe(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.field, i.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// 단일 필드 오류를 만든다.
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            issues: vec![FieldIssue {
                field,
                message: message.into(),
            }],
        }
    }

    /// 해당 필드에 대한 오류가 있는지 확인한다.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Positive,
    NonNegative,
}

#[derive(Default)]
struct Collector {
    issues: Vec<FieldIssue>,
}

impl Collector {
    fn push(&mut self, field: &'static str, message: &str) {
        self.issues.push(FieldIssue {
            field,
            message: message.to_string(),
        });
    }

    fn real(&mut self, field: &'static str, value: Option<f64>, bound: Bound) -> Option<f64> {
        let Some(v) = value else {
            self.push(field, "필수 항목");
            return None;
        };
        if !v.is_finite() {
            self.push(field, "유한한 숫자여야 함");
            return None;
        }
        match bound {
            Bound::Positive if v <= 0.0 => {
                self.push(field, "0보다 커야 함");
                None
            }
            Bound::NonNegative if v < 0.0 => {
                self.push(field, "0 이상이어야 함");
                None
            }
            _ => Some(v),
        }
    }

    fn positive_int(&mut self, field: &'static str, value: Option<f64>) -> Option<u32> {
        let v = self.real(field, value, Bound::Positive)?;
        if v.fract() != 0.0 {
            self.push(field, "정수여야 함");
            return None;
        }
        if v > f64::from(u32::MAX) {
            self.push(field, "값이 너무 큼");
            return None;
        }
        Some(v as u32)
    }
}

/// 요청 값을 검증하고 계산 입력으로 변환한다.
pub fn validate_inputs(raw: &RawScenarioInputs) -> Result<ScenarioInputs, ValidationError> {
    let mut c = Collector::default();
    let volume = c.positive_int("monthly_invoice_volume", raw.monthly_invoice_volume);
    let hours = c.real(
        "avg_hours_per_invoice",
        raw.avg_hours_per_invoice,
        Bound::Positive,
    );
    let wage = c.real("hourly_wage", raw.hourly_wage, Bound::NonNegative);
    let err_manual = c.real(
        "error_rate_manual",
        raw.error_rate_manual,
        Bound::NonNegative,
    );
    let err_cost = c.real("error_cost", raw.error_cost, Bound::NonNegative);
    let horizon = c.positive_int("time_horizon_months", raw.time_horizon_months);
    let implementation = c.real(
        "one_time_implementation_cost",
        Some(raw.one_time_implementation_cost.unwrap_or(0.0)),
        Bound::NonNegative,
    );

    match (volume, hours, wage, err_manual, err_cost, horizon, implementation) {
        (Some(v), Some(h), Some(w), Some(em), Some(ec), Some(t), Some(i)) if c.issues.is_empty() => {
            Ok(ScenarioInputs {
                monthly_invoice_volume: v,
                avg_hours_per_invoice: h,
                hourly_wage: w,
                error_rate_manual: em,
                error_cost: ec,
                time_horizon_months: t,
                one_time_implementation_cost: i,
            })
        }
        _ => Err(ValidationError { issues: c.issues }),
    }
}

/// 계산 결과가 모두 유한한지 확인한다. 입력 크기가 너무 커 넘친 경우를 걸러낸다.
pub fn validate_result(result: &ScenarioResult) -> Result<(), ValidationError> {
    let issues: Vec<FieldIssue> = result
        .non_finite_fields()
        .into_iter()
        .map(|field| FieldIssue {
            field,
            message: "계산 결과가 표현 범위를 벗어남".to_string(),
        })
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

/// 시나리오 이름을 검증하고 앞뒤 공백을 제거한 값을 돌려준다.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(ValidationError::single("name", "비어 있음"));
    }
    if len > MAX_NAME_LEN {
        return Err(ValidationError::single(
            "name",
            format!("{MAX_NAME_LEN}자 이하여야 함"),
        ));
    }
    Ok(trimmed.to_string())
}

/// 식별자 형식을 검증한다.
pub fn validate_id(id: &str) -> Result<&str, ValidationError> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return Err(ValidationError::single(
            "id",
            format!("1~{MAX_ID_LEN}자여야 함"),
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::single("id", "허용되지 않는 문자"));
    }
    Ok(id)
}

/// 이메일 형태의 연락처인지 확인한다.
pub fn validate_email(email: &str) -> Result<&str, ValidationError> {
    let invalid = || ValidationError::single("email", "이메일 형식이 아님");
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(invalid());
    }
    if domain.split('.').any(str::is_empty) {
        return Err(invalid());
    }
    Ok(email)
}
