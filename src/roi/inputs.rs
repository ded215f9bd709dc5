use serde::{Deserialize, Serialize};

/// ROI 계산 입력. 검증을 통과한 값만 담는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    /// 월간 송장 처리 건수 [건/월]
    pub monthly_invoice_volume: u32,
    /// 송장 1건당 평균 처리 시간 [h]
    pub avg_hours_per_invoice: f64,
    /// 시간당 인건비 [통화/h]
    pub hourly_wage: f64,
    /// 수작업 오류율 [%p] (0.5 = 0.5%)
    pub error_rate_manual: f64,
    /// 오류 1건당 비용 [통화]
    pub error_cost: f64,
    /// 분석 기간 [월]
    pub time_horizon_months: u32,
    /// 1회성 도입 비용 [통화]. 입력에 없으면 0.
    #[serde(default)]
    pub one_time_implementation_cost: f64,
}
