//! ROI 계산 로직을 라이브러리로 분리하여 CLI 외의 경계(HTTP 등)에서도 재사용할 수 있게 한다.

pub mod app;
pub mod config;
pub mod logging;
pub mod report;
pub mod roi;
pub mod service;
pub mod store;
pub mod ui_cli;
pub mod validation;
