//! HealthSwap 공통 크레이트
//!
//! 모든 계층이 공유하는 도메인 타입, 에러, 설정, 메트릭 이름을 정의합니다.

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{CatalogError, ConfigError, HealthswapError, ParseError};

// 설정
pub use config::{CatalogConfig, GeneralConfig, HealthswapConfig, RankingConfig};

// 도메인 타입
pub use types::{
    CatalogKind, HealthRating, HealthScore, NovaGroup, NutriScoreGrade, ProductHealthProfile,
    ProductRecord,
};
