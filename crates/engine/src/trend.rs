//! 스캔 기록 추세 분석
//!
//! 기록된 스캔의 건강 점수를 같은 점수 함수로 다시 계산해 평균, 최고, 최저,
//! 추세 방향을 요약합니다. 기록에는 보통 성분 데이터가 없으므로
//! 프로필의 건강 등급 힌트가 점수에 반영됩니다.

use serde::{Deserialize, Serialize};

use healthswap_core::types::{HealthScore, ProductHealthProfile};

use crate::score::health_score;

/// 스캔 기록 한 건
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanHistoryEntry {
    /// 스캔 시각 (Unix epoch 초)
    pub scanned_at: u64,
    /// 스캔 시점의 프로필
    pub profile: ProductHealthProfile,
}

/// 특정 시점의 점수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// 스캔 시각
    pub scanned_at: u64,
    /// 점수
    pub score: HealthScore,
}

/// 추세 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// 최근 절반의 평균이 무승부 점수 차 이상 높음
    Improving,
    /// 최근 절반의 평균이 무승부 점수 차 이상 낮음
    Declining,
    /// 그 외
    Stable,
}

/// 추세 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// 스캔 수
    pub count: usize,
    /// 평균 점수
    pub average_score: f64,
    /// 최고 점수 (동점이면 가장 이른 스캔)
    pub best: TrendPoint,
    /// 최저 점수 (동점이면 가장 이른 스캔)
    pub worst: TrendPoint,
    /// 추세 방향
    pub direction: TrendDirection,
}

/// 스캔 기록을 요약합니다. 기록이 없으면 `None`입니다.
///
/// 방향은 시간순으로 정렬한 기록의 앞 절반과 뒤 절반 평균을 비교합니다.
/// 홀수 개면 가운데 기록은 어느 쪽에도 넣지 않습니다.
pub fn summarize(entries: &[ScanHistoryEntry], score_tie_margin: u8) -> Option<TrendSummary> {
    let mut points: Vec<TrendPoint> = entries
        .iter()
        .map(|e| TrendPoint {
            scanned_at: e.scanned_at,
            score: health_score(&e.profile),
        })
        .collect();
    points.sort_by_key(|p| p.scanned_at);

    let first = *points.first()?;
    let mut best = first;
    let mut worst = first;
    for point in &points[1..] {
        if point.score > best.score {
            best = *point;
        }
        if point.score < worst.score {
            worst = *point;
        }
    }

    let half = points.len() / 2;
    let direction = if half == 0 {
        TrendDirection::Stable
    } else {
        let older = average(&points[..half]);
        let newer = average(&points[points.len() - half..]);
        let diff = newer - older;
        let margin = f64::from(score_tie_margin);
        if diff > 0.0 && diff >= margin {
            TrendDirection::Improving
        } else if diff < 0.0 && -diff >= margin {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        }
    };

    Some(TrendSummary {
        count: points.len(),
        average_score: average(&points),
        best,
        worst,
        direction,
    })
}

fn average(points: &[TrendPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let total: f64 = points.iter().map(|p| f64::from(p.score.value())).sum();
    total / points.len() as f64
}
