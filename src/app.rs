use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::roi::BiasConfig;
use crate::service::{RoiService, ServiceError};
use crate::store::{ScenarioStore, StoreError};
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 저장소 열기 오류
    #[error("저장소 오류: {0}")]
    Store(#[from] StoreError),
    /// 요청 처리 오류
    #[error("{0}")]
    Service(#[from] ServiceError),
    /// JSON 입력/출력 오류
    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 설정에 적힌 저장소를 열어 서비스를 구성한다.
pub fn open_service(config: &Config, bias: BiasConfig) -> Result<RoiService, AppError> {
    let store = ScenarioStore::open(&config.store_path)?;
    Ok(RoiService::new(bias, store))
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &Config, service: &mut RoiService) -> Result<(), AppError> {
    loop {
        let outcome = match ui_cli::main_menu()? {
            MenuChoice::Simulate => ui_cli::handle_simulate(service),
            MenuChoice::SaveScenario => ui_cli::handle_save(service),
            MenuChoice::ListScenarios => {
                ui_cli::handle_list(service);
                Ok(())
            }
            MenuChoice::ShowScenario => ui_cli::handle_show(service),
            MenuChoice::DeleteScenario => ui_cli::handle_delete(service),
            MenuChoice::Report => ui_cli::handle_report(config, service),
            MenuChoice::BiasSettings => {
                ui_cli::print_bias(service.bias());
                Ok(())
            }
            MenuChoice::Exit => {
                println!("프로그램을 종료합니다.");
                break;
            }
        };
        // 요청 단위 오류는 메뉴로 돌아가고, 입출력 오류만 루프를 끝낸다.
        match outcome {
            Ok(()) => {}
            Err(AppError::Service(e)) => println!("오류: {e}"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
