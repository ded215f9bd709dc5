use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bias::{percent_to_fraction, BiasConfig};
use super::inputs::ScenarioInputs;

/// ROI 계산 결과. 항상 입력과 바이어스로부터 통째로 다시 계산된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// 수작업 월 인건비 [통화/월]
    pub labor_cost_manual: f64,
    /// 자동화 월 비용 [통화/월]
    pub auto_cost: f64,
    /// 오류 감소로 인한 월 절감액. 자동화 오류율이 더 높으면 음수.
    pub error_savings: f64,
    /// 보정 계수가 적용된 순 월 절감액 [통화/월]
    pub monthly_savings: f64,
    /// 분석 기간 누적 절감액
    pub cumulative_savings: f64,
    /// 누적 절감액에서 도입 비용을 뺀 값
    pub net_savings: f64,
    /// 회수기간 [월]. 월 절감액이 0 이하이면 `None`.
    pub payback_months: Option<f64>,
    /// ROI [%]. 도입 비용이 0이면 `None`.
    pub roi_percentage: Option<f64>,
}

impl ScenarioResult {
    /// 유한하지 않은(inf/NaN) 필드 이름을 돌려준다. `None` 비율은 검사하지 않는다.
    pub fn non_finite_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("labor_cost_manual", Some(self.labor_cost_manual)),
            ("auto_cost", Some(self.auto_cost)),
            ("error_savings", Some(self.error_savings)),
            ("monthly_savings", Some(self.monthly_savings)),
            ("cumulative_savings", Some(self.cumulative_savings)),
            ("net_savings", Some(self.net_savings)),
            ("payback_months", self.payback_months),
            ("roi_percentage", self.roi_percentage),
        ];
        fields
            .into_iter()
            .filter(|(_, v)| v.is_some_and(|v| !v.is_finite()))
            .map(|(name, _)| name)
            .collect()
    }
}

/// 입력과 바이어스로 ROI 지표를 계산한다.
///
/// 검증은 호출 측 책임이며 이 함수는 실패하지 않는다. 보정 계수는 자동화 비용을
/// 뺀 뒤의 순 월 절감액에만 곱한다.
pub fn compute(inputs: &ScenarioInputs, config: &BiasConfig) -> ScenarioResult {
    let volume = f64::from(inputs.monthly_invoice_volume);
    let err_auto = percent_to_fraction(config.error_rate_auto_pct);

    let labor_cost_manual = volume * inputs.avg_hours_per_invoice * inputs.hourly_wage;
    let auto_cost = volume * config.auto_cost_per_invoice;

    let err_manual = percent_to_fraction(inputs.error_rate_manual);
    let error_savings = (err_manual - err_auto) * volume * inputs.error_cost;

    let monthly_savings_raw = labor_cost_manual + error_savings - auto_cost;
    let monthly_savings = monthly_savings_raw * config.min_roi_boost_factor;

    let cumulative_savings = monthly_savings * f64::from(inputs.time_horizon_months);
    let implementation = inputs.one_time_implementation_cost;
    let net_savings = cumulative_savings - implementation;

    let payback_months = if monthly_savings > 0.0 {
        Some(implementation / monthly_savings)
    } else {
        None
    };
    let roi_percentage = if implementation > 0.0 {
        Some((net_savings / implementation) * 100.0)
    } else {
        None
    };

    debug!(
        monthly_savings,
        net_savings,
        ?payback_months,
        ?roi_percentage,
        "roi computed"
    );

    ScenarioResult {
        labor_cost_manual,
        auto_cost,
        error_savings,
        monthly_savings,
        cumulative_savings,
        net_savings,
        payback_months,
        roi_percentage,
    }
}

/// 누적 순손익 곡선의 한 점.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// 경과 월 (0 = 도입 시점)
    pub month: u32,
    /// 도입 비용을 차감한 누적 순손익
    pub net_position: f64,
}

/// 이미 계산된 결과로 월별 누적 순손익을 만든다. 0개월부터 분석 기간까지 포함한다.
pub fn savings_timeline(inputs: &ScenarioInputs, result: &ScenarioResult) -> Vec<TimelinePoint> {
    let implementation = inputs.one_time_implementation_cost;
    (0..=inputs.time_horizon_months)
        .map(|month| TimelinePoint {
            month,
            net_position: result.monthly_savings * f64::from(month) - implementation,
        })
        .collect()
}
