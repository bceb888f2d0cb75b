//! 加权分摊引擎：把整数总额按权重分给参与者，取整后通过差额分配
//! 保证各份额之和恰好等于总额。纯计算，无共享状态。

pub mod distribute;
pub mod rounding;
pub mod types;

pub use distribute::{ShareRecord, distribute};
pub use rounding::{apply_round, raw_share};
pub use types::*;

use rand::Rng;

/// 使用线程本地随机源计算分摊结果
pub fn allocate(request: &AllocationRequest) -> Vec<AllocationResult> {
    allocate_with_rng(request, &mut rand::thread_rng())
}

/// 与 [`allocate`] 相同，但 `random` 分配方式使用调用方提供的随机源
pub fn allocate_with_rng<R: Rng + ?Sized>(
    request: &AllocationRequest,
    rng: &mut R,
) -> Vec<AllocationResult> {
    if request.participants.is_empty() {
        return Vec::new();
    }

    let total_weight = request.total_weight();
    if request.total <= 0 || total_weight == 0.0 {
        return zero_results(request);
    }

    let records: Vec<ShareRecord> = request
        .participants
        .iter()
        .map(|participant| {
            let raw = raw_share(request.total, participant, total_weight);
            let base = apply_round(raw, request.round_unit, request.round_mode);
            ShareRecord {
                participant_id: participant.id.clone(),
                base_amount: base.round() as i64,
                remainder: raw - base,
            }
        })
        .collect();

    // 份额在 f64 中计算，极大总额下各份额之和可能超出 i64
    let base_total: i128 = records.iter().map(|r| i128::from(r.base_amount)).sum();
    let diff = saturate(i128::from(request.total) - base_total);

    if diff == 0 {
        return records
            .into_iter()
            .map(|r| AllocationResult {
                participant_id: r.participant_id,
                amount: r.base_amount,
            })
            .collect();
    }

    distribute(
        &records,
        diff,
        request.round_unit.value(),
        request.remainder_mode,
        rng,
    )
}

fn zero_results(request: &AllocationRequest) -> Vec<AllocationResult> {
    request
        .participants
        .iter()
        .map(|p| AllocationResult {
            participant_id: p.id.clone(),
            amount: 0,
        })
        .collect()
}

/// 每位参与者的中间计算值（不做差额分配），用于展示与排查
pub fn details(request: &AllocationRequest) -> Vec<CalculationDetail> {
    let total_weight = request.total_weight();

    request
        .participants
        .iter()
        .map(|participant| {
            let raw_amount = raw_share(request.total, participant, total_weight);
            let base_amount = apply_round(raw_amount, request.round_unit, request.round_mode);
            CalculationDetail {
                participant: participant.clone(),
                raw_amount,
                base_amount,
                remainder: raw_amount - base_amount,
                weight_ratio: if total_weight > 0.0 {
                    participant.weight / total_weight
                } else {
                    0.0
                },
            }
        })
        .collect()
}

pub fn validate(results: &[AllocationResult], expected_total: i64) -> ValidationReport {
    let actual_total: i128 = results.iter().map(|r| i128::from(r.amount)).sum();
    let difference = i128::from(expected_total) - actual_total;

    ValidationReport {
        is_valid: difference == 0,
        actual_total: saturate(actual_total),
        difference: saturate(difference),
    }
}

/// 收窄到 i64，对称截断以便后续取绝对值不溢出
fn saturate(value: i128) -> i64 {
    value.clamp(-i128::from(i64::MAX), i128::from(i64::MAX)) as i64
}
