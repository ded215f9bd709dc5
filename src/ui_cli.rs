use std::fs;
use std::io::{self, Write};

use crate::app::AppError;
use crate::config::Config;
use crate::report::{format_number, format_optional};
use crate::roi::{savings_timeline, BiasConfig, ScenarioInputs, ScenarioResult};
use crate::service::{ReportRequest, RoiService};
use crate::store::{ScenarioRecord, ScenarioSummary};
use crate::validation::RawScenarioInputs;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Simulate,
    SaveScenario,
    ListScenarios,
    ShowScenario,
    DeleteScenario,
    Report,
    BiasSettings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu() -> Result<MenuChoice, AppError> {
    println!("\n=== Invoice ROI Toolbox ===");
    println!("1) ROI 계산");
    println!("2) 시나리오 저장");
    println!("3) 시나리오 목록");
    println!("4) 시나리오 조회");
    println!("5) 시나리오 삭제");
    println!("6) 보고서 생성");
    println!("7) 바이어스 설정 보기");
    println!("0) 종료");
    loop {
        let sel = read_line("메뉴 선택: ")?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Simulate),
            "2" => return Ok(MenuChoice::SaveScenario),
            "3" => return Ok(MenuChoice::ListScenarios),
            "4" => return Ok(MenuChoice::ShowScenario),
            "5" => return Ok(MenuChoice::DeleteScenario),
            "6" => return Ok(MenuChoice::Report),
            "7" => return Ok(MenuChoice::BiasSettings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("잘못된 입력입니다. 다시 선택하세요."),
        }
    }
}

/// ROI 계산 메뉴를 처리한다.
pub fn handle_simulate(service: &RoiService) -> Result<(), AppError> {
    println!("\n-- ROI 계산 --");
    let raw = read_inputs()?;
    let sim = service.simulate(&raw)?;
    print_result(&sim.inputs, &sim.results);
    Ok(())
}

/// 시나리오 저장 메뉴를 처리한다. 같은 이름이 있으면 덮어쓴다.
pub fn handle_save(service: &mut RoiService) -> Result<(), AppError> {
    println!("\n-- 시나리오 저장 --");
    let name = read_line("시나리오 이름: ")?;
    let raw = read_inputs()?;
    let record = service.save_scenario(&name, &raw)?;
    println!("저장됨: {} (id={})", record.name, record.id);
    print_result(&record.inputs, &record.results);
    Ok(())
}

/// 저장된 시나리오 목록을 표시한다.
pub fn handle_list(service: &RoiService) {
    println!("\n-- 시나리오 목록 --");
    print_summaries(&service.list_scenarios());
}

/// 시나리오 조회 메뉴를 처리한다.
pub fn handle_show(service: &RoiService) -> Result<(), AppError> {
    let id = read_line("시나리오 id: ")?;
    let record = service.get_scenario(id.trim())?;
    print_record(&record);
    Ok(())
}

/// 시나리오 삭제 메뉴를 처리한다.
pub fn handle_delete(service: &mut RoiService) -> Result<(), AppError> {
    let id = read_line("삭제할 시나리오 id: ")?;
    service.delete_scenario(id.trim())?;
    println!("삭제되었습니다.");
    Ok(())
}

/// 보고서 생성 메뉴를 처리한다. id를 비우면 새 입력으로 임시 보고서를 만든다.
pub fn handle_report(config: &Config, service: &mut RoiService) -> Result<(), AppError> {
    println!("\n-- 보고서 생성 --");
    let email = read_line("이메일: ")?;
    let id = read_line("시나리오 id (임시 계산이면 엔터): ")?;
    let req = if id.trim().is_empty() {
        ReportRequest {
            email: email.trim().to_string(),
            scenario_id: None,
            inputs: Some(read_inputs()?),
        }
    } else {
        ReportRequest {
            email: email.trim().to_string(),
            scenario_id: Some(id.trim().to_string()),
            inputs: None,
        }
    };
    let artifact = service.generate_report(&req)?;
    fs::create_dir_all(&config.report_dir)?;
    let path = config.report_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.body)?;
    println!("보고서 저장: {}", path.display());
    Ok(())
}

/// 현재 바이어스 값을 표시한다.
pub fn print_bias(bias: &BiasConfig) {
    println!("\n-- 바이어스 설정 (환경 변수) --");
    println!("AUTO_COST_PER_INVOICE : {}", bias.auto_cost_per_invoice);
    println!("ERROR_RATE_AUTO_PCT   : {} %", bias.error_rate_auto_pct);
    println!("MIN_ROI_BOOST_FACTOR  : {}", bias.min_roi_boost_factor);
}

/// 계산 결과를 표 형태로 출력한다.
pub fn print_result(inputs: &ScenarioInputs, results: &ScenarioResult) {
    println!("수작업 인건비/월 : ${}", format_number(results.labor_cost_manual));
    println!("자동화 비용/월   : ${}", format_number(results.auto_cost));
    println!("오류 절감액/월   : ${}", format_number(results.error_savings));
    println!("월 절감액        : ${}", format_number(results.monthly_savings));
    println!(
        "누적 절감액      : ${} ({}개월)",
        format_number(results.cumulative_savings),
        inputs.time_horizon_months
    );
    println!("순 절감액        : ${}", format_number(results.net_savings));
    println!("회수기간 [월]    : {}", format_optional(results.payback_months));
    println!("ROI [%]          : {}", format_optional(results.roi_percentage));

    let timeline = savings_timeline(inputs, results);
    if let Some(breakeven) = timeline.iter().find(|p| p.net_position >= 0.0) {
        println!("손익분기 도달    : {}개월차", breakeven.month);
    } else {
        println!("손익분기 도달    : 분석 기간 내 없음");
    }
}

/// 저장된 시나리오 전체를 출력한다.
pub fn print_record(record: &ScenarioRecord) {
    println!("\n[{}] {}", record.id, record.name);
    println!(
        "생성: {}  수정: {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S"),
        record.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
    print_result(&record.inputs, &record.results);
}

/// 요약 목록을 출력한다.
pub fn print_summaries(rows: &[ScenarioSummary]) {
    if rows.is_empty() {
        println!("저장된 시나리오가 없습니다.");
        return;
    }
    for row in rows {
        println!(
            "{}  {}  (수정 {})",
            row.id,
            row.name,
            row.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn read_inputs() -> Result<RawScenarioInputs, AppError> {
    Ok(RawScenarioInputs {
        monthly_invoice_volume: Some(read_f64("월 송장 건수: ")?),
        avg_hours_per_invoice: Some(read_f64("건당 처리 시간 [h] (10분 = 0.17): ")?),
        hourly_wage: Some(read_f64("시간당 인건비: ")?),
        error_rate_manual: Some(read_f64("수작업 오류율 [%] (0.5 = 0.5%): ")?),
        error_cost: Some(read_f64("오류 1건당 비용: ")?),
        time_horizon_months: Some(read_f64("분석 기간 [월]: ")?),
        one_time_implementation_cost: read_optional_f64("도입 비용 (없으면 엔터): ")?,
    })
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(buf)
}

fn read_f64(prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

fn read_optional_f64(prompt: &str) -> Result<Option<f64>, AppError> {
    loop {
        let s = read_line(prompt)?;
        if s.trim().is_empty() {
            return Ok(None);
        }
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}
