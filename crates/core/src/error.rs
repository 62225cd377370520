//! 에러 타입 — 도메인별 에러 정의

/// HealthSwap 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum HealthswapError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 카탈로그 검색 에러
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// 입력 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 카탈로그 검색 에러
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 요청 실패 (연결, TLS 등)
    #[error("request failed: {0}")]
    Request(String),

    /// 타임아웃
    #[error("request timed out: {0}")]
    Timeout(String),

    /// 2xx가 아닌 응답
    #[error("unexpected status: {0}")]
    Status(String),

    /// 응답 본문 디코딩 실패
    #[error("decode failed: {0}")]
    Decode(String),
}

/// 입력 파싱 에러
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 제품 레코드 형식 오류
    #[error("invalid product record: {0}")]
    ProductRecord(String),

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge { size: usize, max: usize },
}
