//! 시나리오를 내려받을 수 있는 단일 HTML 보고서로 렌더링한다.

use html_escape::encode_text;
use serde::Serialize;

use crate::roi::{savings_timeline, ScenarioInputs, ScenarioResult};

/// 보고서 MIME 타입.
pub const REPORT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// 보고서에 들어가는 이름 붙은 시나리오.
#[derive(Debug, Clone)]
pub struct ReportScenario<'a> {
    pub name: &'a str,
    pub inputs: &'a ScenarioInputs,
    pub results: &'a ScenarioResult,
}

/// 생성된 보고서 파일.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportArtifact {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

/// 천 단위 구분 기호와 소수 둘째 자리까지로 숫자를 표시한다. 끝자리 0은 생략한다.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// 값이 없으면 `n/a`로 표시한다.
pub fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), format_number)
}

/// 다운로드 파일 이름. 영숫자, `-`, `_` 이외의 문자 구간은 `-` 하나로 바꾼다.
///
/// 경로 구분자나 `..`가 남지 않으므로 결과는 항상 보고서 디렉터리 안의 파일 이름이다.
pub fn report_file_name(name: &str) -> String {
    let slug = name
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "roi-report-scenario.html".to_string()
    } else {
        format!("roi-report-{slug}.html")
    }
}

/// 보고서 파일을 만든다.
pub fn build_report(scenario: &ReportScenario<'_>) -> ReportArtifact {
    ReportArtifact {
        file_name: report_file_name(scenario.name),
        content_type: REPORT_CONTENT_TYPE,
        body: render_report_html(scenario),
    }
}

const STYLE: &str = "\
  body{font-family:system-ui,-apple-system,Segoe UI,Roboto,Ubuntu;max-width:900px;margin:40px auto;padding:0 16px;color:#0f172a}
  h1{font-size:28px;margin-bottom:8px}
  h2{margin-top:28px}
  .grid{display:grid;grid-template-columns:1fr 1fr;gap:12px}
  .card{border:1px solid #e2e8f0;border-radius:12px;padding:14px;background:#fff}
  table{width:100%;border-collapse:collapse}
  td,th{padding:6px 4px;border-bottom:1px solid #e2e8f0;text-align:left}
  .neg{color:#b91c1c}
  .note{margin-top:24px;color:#64748b}";

/// 입력과 결과를 담은 독립 실행형 HTML 문서를 만든다.
pub fn render_report_html(scenario: &ReportScenario<'_>) -> String {
    let name = encode_text(scenario.name);
    let inputs = scenario.inputs;
    let results = scenario.results;

    let mut html = String::with_capacity(8 * 1024);
    html.push_str(&format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<title>ROI Report - {name}</title>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<style>
{STYLE}
</style>
</head>
<body>
  <h1>Invoicing ROI Report</h1>
  <p><strong>Scenario:</strong> {name}</p>
"#
    ));

    html.push_str("\n  <h2>Inputs</h2>\n  <div class=\"card\">\n  <table>\n");
    let rows = [
        (
            "Invoice volume / month",
            format_number(f64::from(inputs.monthly_invoice_volume)),
        ),
        (
            "Avg hours / invoice",
            format_number(inputs.avg_hours_per_invoice),
        ),
        ("Hourly wage", format!("${}", format_number(inputs.hourly_wage))),
        (
            "Manual error rate",
            format!("{}%", format_number(inputs.error_rate_manual)),
        ),
        ("Error cost", format!("${}", format_number(inputs.error_cost))),
        (
            "Time horizon (months)",
            format_number(f64::from(inputs.time_horizon_months)),
        ),
        (
            "One-time implementation",
            format!("${}", format_number(inputs.one_time_implementation_cost)),
        ),
    ];
    for (label, value) in rows {
        html.push_str(&format!(
            "   <tr><td>{label}</td><td>{value}</td></tr>\n"
        ));
    }
    html.push_str("  </table>\n  </div>\n");

    html.push_str("\n  <h2>Results</h2>\n  <div class=\"grid\">\n");
    let cards = [
        (
            "Monthly Savings",
            format!("${}", format_number(results.monthly_savings)),
        ),
        ("Payback (months)", format_optional(results.payback_months)),
        ("ROI (%)", format_optional(results.roi_percentage)),
        (
            "Cumulative Savings",
            format!("${}", format_number(results.cumulative_savings)),
        ),
        (
            "Net Savings",
            format!("${}", format_number(results.net_savings)),
        ),
        (
            "Error Savings / month",
            format!("${}", format_number(results.error_savings)),
        ),
    ];
    for (label, value) in cards {
        html.push_str(&format!(
            "    <div class=\"card\"><strong>{label}</strong><br/>{value}</div>\n"
        ));
    }
    html.push_str("  </div>\n");

    html.push_str(
        "\n  <h2>Cumulative Position</h2>\n  <table>\n   <tr><th>Month</th><th>Net position</th></tr>\n",
    );
    for point in savings_timeline(inputs, results) {
        let class = if point.net_position < 0.0 {
            " class=\"neg\""
        } else {
            ""
        };
        html.push_str(&format!(
            "   <tr><td>{}</td><td{class}>${}</td></tr>\n",
            point.month,
            format_number(point.net_position)
        ));
    }
    html.push_str("  </table>\n");

    html.push_str(
        "\n  <p class=\"note\">Note: Results are modeled and include a conservative bias in favor of automation.</p>\n</body>\n</html>\n",
    );
    html
}
