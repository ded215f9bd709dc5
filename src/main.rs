use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use invoice_roi_toolbox::app::{self, AppError};
use invoice_roi_toolbox::roi::BiasConfig;
use invoice_roi_toolbox::service::{ReportRequest, RoiService};
use invoice_roi_toolbox::validation::RawScenarioInputs;
use invoice_roi_toolbox::{config, logging, ui_cli};

/// 송장 처리 자동화 ROI 계산기.
#[derive(Debug, Parser)]
#[command(name = "invoice_roi_toolbox", version, about)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// 디버그 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 입력값으로 ROI를 계산한다
    Simulate {
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        json: bool,
    },
    /// 계산 결과와 함께 시나리오를 저장한다 (같은 이름이면 덮어쓴다)
    Save {
        #[arg(long)]
        name: String,
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        json: bool,
    },
    /// 저장된 시나리오 목록
    List {
        #[arg(long)]
        json: bool,
    },
    /// 저장된 시나리오 조회
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// 저장된 시나리오 삭제
    Delete { id: String },
    /// HTML 보고서를 생성한다
    Report {
        #[arg(long)]
        email: String,
        /// 저장된 시나리오 id. 없으면 입력값으로 임시 계산한다
        #[arg(long)]
        id: Option<String>,
        #[command(flatten)]
        inputs: InputArgs,
        /// 출력 디렉터리 (기본: 설정의 report_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON 입력 파일. 개별 옵션이 파일 값을 덮어쓴다
    #[arg(long)]
    input: Option<PathBuf>,
    /// 월 송장 건수
    #[arg(long)]
    volume: Option<f64>,
    /// 건당 처리 시간 [h]
    #[arg(long)]
    hours: Option<f64>,
    /// 시간당 인건비
    #[arg(long)]
    wage: Option<f64>,
    /// 수작업 오류율 [%]
    #[arg(long)]
    error_rate: Option<f64>,
    /// 오류 1건당 비용
    #[arg(long)]
    error_cost: Option<f64>,
    /// 분석 기간 [월]
    #[arg(long)]
    months: Option<f64>,
    /// 1회성 도입 비용
    #[arg(long)]
    implementation_cost: Option<f64>,
}

impl InputArgs {
    fn is_empty(&self) -> bool {
        self.input.is_none()
            && self.volume.is_none()
            && self.hours.is_none()
            && self.wage.is_none()
            && self.error_rate.is_none()
            && self.error_cost.is_none()
            && self.months.is_none()
            && self.implementation_cost.is_none()
    }

    fn resolve(&self) -> Result<RawScenarioInputs, AppError> {
        let base = match &self.input {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => RawScenarioInputs::default(),
        };
        Ok(RawScenarioInputs {
            monthly_invoice_volume: self.volume.or(base.monthly_invoice_volume),
            avg_hours_per_invoice: self.hours.or(base.avg_hours_per_invoice),
            hourly_wage: self.wage.or(base.hourly_wage),
            error_rate_manual: self.error_rate.or(base.error_rate_manual),
            error_cost: self.error_cost.or(base.error_cost),
            time_horizon_months: self.months.or(base.time_horizon_months),
            one_time_implementation_cost: self
                .implementation_cost
                .or(base.one_time_implementation_cost),
        })
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = try_run(cli) {
        eprintln!("오류: {err}");
        std::process::exit(1);
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let cfg = config::load_or_default(&cli.config)?;
    let bias = BiasConfig::from_env();
    let mut service = app::open_service(&cfg, bias)?;

    let Some(command) = cli.command else {
        return app::run(&cfg, &mut service);
    };
    match command {
        Command::Simulate { inputs, json } => {
            let sim = service.simulate(&inputs.resolve()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sim)?);
            } else {
                ui_cli::print_result(&sim.inputs, &sim.results);
            }
        }
        Command::Save { name, inputs, json } => {
            let record = service.save_scenario(&name, &inputs.resolve()?)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                ui_cli::print_record(&record);
            }
        }
        Command::List { json } => {
            let rows = service.list_scenarios();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                ui_cli::print_summaries(&rows);
            }
        }
        Command::Show { id, json } => {
            let record = service.get_scenario(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                ui_cli::print_record(&record);
            }
        }
        Command::Delete { id } => {
            service.delete_scenario(&id)?;
            println!("삭제되었습니다: {id}");
        }
        Command::Report {
            email,
            id,
            inputs,
            out,
        } => {
            let req = ReportRequest {
                email,
                inputs: if id.is_none() && !inputs.is_empty() {
                    Some(inputs.resolve()?)
                } else {
                    None
                },
                scenario_id: id,
            };
            write_report(&mut service, &req, out.unwrap_or(cfg.report_dir))?;
        }
    }
    Ok(())
}

fn write_report(
    service: &mut RoiService,
    req: &ReportRequest,
    dir: PathBuf,
) -> Result<(), AppError> {
    let artifact = service.generate_report(req)?;
    fs::create_dir_all(&dir)?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.body)?;
    println!("보고서 저장: {}", path.display());
    Ok(())
}
