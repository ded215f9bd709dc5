use serde::{Deserialize, Serialize};
use tracing::warn;

/// 자동화 건당 비용을 읽는 환경 변수.
pub const ENV_AUTO_COST_PER_INVOICE: &str = "AUTO_COST_PER_INVOICE";
/// 자동화 오류율(%p)을 읽는 환경 변수.
pub const ENV_ERROR_RATE_AUTO_PCT: &str = "ERROR_RATE_AUTO_PCT";
/// 월 절감액 보정 계수를 읽는 환경 변수.
pub const ENV_MIN_ROI_BOOST_FACTOR: &str = "MIN_ROI_BOOST_FACTOR";

/// 프로세스 시작 시 한 번 구성되는 바이어스 파라미터.
///
/// 구성 이후에는 읽기 전용이며 계산 함수에 명시적으로 전달된다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasConfig {
    /// 자동화 시 송장 1건당 비용 [통화]
    pub auto_cost_per_invoice: f64,
    /// 자동화 오류율 [%p]
    pub error_rate_auto_pct: f64,
    /// 순 월 절감액에 곱하는 보정 계수
    pub min_roi_boost_factor: f64,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            auto_cost_per_invoice: 0.20,
            error_rate_auto_pct: 0.1,
            min_roi_boost_factor: 1.1,
        }
    }
}

impl BiasConfig {
    /// 프로세스 환경 변수에서 바이어스 값을 읽는다. 없거나 잘못된 값은 기본값을 쓴다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 주어진 조회 함수로 바이어스 값을 구성한다.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            auto_cost_per_invoice: read_or_default(
                &lookup,
                ENV_AUTO_COST_PER_INVOICE,
                defaults.auto_cost_per_invoice,
            ),
            error_rate_auto_pct: read_or_default(
                &lookup,
                ENV_ERROR_RATE_AUTO_PCT,
                defaults.error_rate_auto_pct,
            ),
            min_roi_boost_factor: read_or_default(
                &lookup,
                ENV_MIN_ROI_BOOST_FACTOR,
                defaults.min_roi_boost_factor,
            ),
        }
    }
}

fn read_or_default<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            warn!(key, value = %raw, default, "invalid bias value, using default");
            default
        }
    }
}

/// 퍼센트포인트 값을 비율로 바꾼다. (0.5 → 0.005)
pub fn percent_to_fraction(pct: f64) -> f64 {
    pct / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn absent_values_use_defaults() {
        let cfg = BiasConfig::from_lookup(|_| None);
        assert_eq!(cfg, BiasConfig::default());
    }

    #[test]
    fn valid_values_override_defaults() {
        let cfg = BiasConfig::from_lookup(lookup_from(&[
            (ENV_AUTO_COST_PER_INVOICE, "0.35"),
            (ENV_ERROR_RATE_AUTO_PCT, " 0.05 "),
            (ENV_MIN_ROI_BOOST_FACTOR, "1"),
        ]));
        assert_eq!(cfg.auto_cost_per_invoice, 0.35);
        assert_eq!(cfg.error_rate_auto_pct, 0.05);
        assert_eq!(cfg.min_roi_boost_factor, 1.0);
    }

    #[test]
    fn malformed_values_fall_back_per_field() {
        let cfg = BiasConfig::from_lookup(lookup_from(&[
            (ENV_AUTO_COST_PER_INVOICE, "cheap"),
            (ENV_ERROR_RATE_AUTO_PCT, "NaN"),
            (ENV_MIN_ROI_BOOST_FACTOR, "1.25"),
        ]));
        assert_eq!(cfg.auto_cost_per_invoice, 0.20);
        assert_eq!(cfg.error_rate_auto_pct, 0.1);
        assert_eq!(cfg.min_roi_boost_factor, 1.25);
    }

    #[test]
    fn percent_points_convert_to_fraction() {
        assert_eq!(percent_to_fraction(0.5), 0.005);
        assert_eq!(percent_to_fraction(0.0), 0.0);
    }
}
