use rand::Rng;
use rand::seq::SliceRandom;

use super::types::{AllocationResult, RemainderMode};

/// 取整后的中间结果，供差额分配使用
#[derive(Debug, Clone, PartialEq)]
pub struct ShareRecord {
    pub participant_id: String,
    pub base_amount: i64,
    pub remainder: f64,
}

/// 按 `mode` 决定的顺序，把 `diff` 以 `unit` 为步长分配给参与者。
///
/// 前 `|diff| / unit` 位各调整一个单位；不足一个单位的零头，以及因
/// 金额不能为负而未能扣减的部分，继续沿同一顺序顺延，直到合计与总额一致。
pub fn distribute<R: Rng + ?Sized>(
    records: &[ShareRecord],
    diff: i64,
    unit: i64,
    mode: RemainderMode,
    rng: &mut R,
) -> Vec<AllocationResult> {
    let order = match mode {
        RemainderMode::LargestRemainder => largest_remainder_order(records),
        RemainderMode::Order => input_order(records),
        RemainderMode::Random => shuffled_order(records, rng),
    };
    let amounts = settle(records, &order, diff, unit);

    records
        .iter()
        .zip(amounts)
        .map(|(record, amount)| AllocationResult {
            participant_id: record.participant_id.clone(),
            amount,
        })
        .collect()
}

/// 按剩余量从大到小排序；稳定排序保证并列时保持输入顺序
pub fn largest_remainder_order(records: &[ShareRecord]) -> Vec<usize> {
    let mut order = input_order(records);
    order.sort_by(|&a, &b| {
        records[b]
            .remainder
            .partial_cmp(&records[a].remainder)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

pub fn input_order(records: &[ShareRecord]) -> Vec<usize> {
    (0..records.len()).collect()
}

/// Fisher-Yates 洗牌后的下标顺序
pub fn shuffled_order<R: Rng + ?Sized>(records: &[ShareRecord], rng: &mut R) -> Vec<usize> {
    let mut order = input_order(records);
    order.shuffle(rng);
    order
}

fn settle(records: &[ShareRecord], order: &[usize], diff: i64, unit: i64) -> Vec<i64> {
    let mut amounts: Vec<i64> = records.iter().map(|r| r.base_amount.max(0)).collect();
    if order.is_empty() || diff == 0 {
        return amounts;
    }

    let step = diff.signum() * unit;
    let adjustment_count = ((diff.abs() / unit) as usize).min(order.len());
    let mut outstanding = diff;

    for &idx in order.iter().take(adjustment_count) {
        outstanding -= adjust(&mut amounts[idx], step);
    }

    let mut cursor = adjustment_count;
    let mut idle = 0;
    while outstanding != 0 && idle < order.len() {
        let idx = order[cursor % order.len()];
        let applied = adjust(&mut amounts[idx], outstanding.clamp(-unit, unit));
        if applied == 0 {
            idle += 1;
        } else {
            idle = 0;
            outstanding -= applied;
        }
        cursor += 1;
    }

    if outstanding != 0 {
        log::warn!("Unable to settle allocation difference of {outstanding}");
    }
    amounts
}

/// 调整金额并保证不小于 0，返回实际调整量
fn adjust(amount: &mut i64, delta: i64) -> i64 {
    let next = amount.saturating_add(delta).max(0);
    let applied = next - *amount;
    *amount = next;
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn record(id: &str, base_amount: i64, remainder: f64) -> ShareRecord {
        ShareRecord {
            participant_id: id.to_string(),
            base_amount,
            remainder,
        }
    }

    fn amounts(results: &[AllocationResult]) -> Vec<i64> {
        results.iter().map(|r| r.amount).collect()
    }

    #[test]
    fn test_largest_remainder_order_is_stable() {
        let records = vec![
            record("a", 33, 0.2),
            record("b", 33, 0.5),
            record("c", 33, 0.2),
            record("d", 33, 0.5),
        ];
        assert_eq!(largest_remainder_order(&records), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_largest_remainder_gives_unit_to_biggest_remainders() {
        let records = vec![
            record("a", 10, 0.1),
            record("b", 10, 0.45),
            record("c", 10, 0.45),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let results = distribute(&records, 2, 1, RemainderMode::LargestRemainder, &mut rng);
        assert_eq!(amounts(&results), vec![10, 11, 11]);
        assert_eq!(results[1].participant_id, "b");
    }

    #[test]
    fn test_order_mode_ignores_remainders() {
        let records = vec![
            record("a", 10, 0.1),
            record("b", 10, 0.45),
            record("c", 10, 0.45),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        let results = distribute(&records, 2, 1, RemainderMode::Order, &mut rng);
        assert_eq!(amounts(&results), vec![11, 11, 10]);
    }

    #[test]
    fn test_negative_diff_subtracts_units() {
        let records = vec![record("a", 40, -7.0), record("b", 40, -7.0), record("c", 40, -7.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let results = distribute(&records, -20, 10, RemainderMode::Order, &mut rng);
        assert_eq!(amounts(&results), vec![30, 30, 40]);
    }

    #[test]
    fn test_sub_unit_residue_is_carried_to_next_participant() {
        let records = vec![record("a", 40, -7.0), record("b", 40, -7.0), record("c", 40, -7.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let results = distribute(&records, -21, 10, RemainderMode::LargestRemainder, &mut rng);
        assert_eq!(amounts(&results), vec![30, 30, 39]);
    }

    #[test]
    fn test_clamped_subtraction_is_carried_forward() {
        let records = vec![record("a", 0, -0.4), record("b", 10, -3.0), record("c", 10, -3.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let results = distribute(&records, -10, 10, RemainderMode::Order, &mut rng);
        assert!(results.iter().all(|r| r.amount >= 0));
        assert_eq!(amounts(&results).iter().sum::<i64>(), 10);
        assert_eq!(amounts(&results), vec![0, 0, 10]);
    }

    #[test]
    fn test_random_mode_is_reproducible_with_seed() {
        let records: Vec<ShareRecord> = (0..6)
            .map(|i| record(&format!("p{i}"), 16, 0.66))
            .collect();
        let first = distribute(
            &records,
            4,
            1,
            RemainderMode::Random,
            &mut StdRng::seed_from_u64(42),
        );
        let second = distribute(
            &records,
            4,
            1,
            RemainderMode::Random,
            &mut StdRng::seed_from_u64(42),
        );
        assert_eq!(first, second);
        assert_eq!(amounts(&first).iter().sum::<i64>(), 16 * 6 + 4);
        assert_eq!(first.iter().filter(|r| r.amount == 17).count(), 4);
    }

    #[test]
    fn test_shuffled_order_is_a_permutation() {
        let records: Vec<ShareRecord> = (0..10).map(|i| record(&i.to_string(), 1, 0.0)).collect();
        let mut order = shuffled_order(&records, &mut StdRng::seed_from_u64(7));
        order.sort_unstable();
        assert_eq!(order, (0..10).collect::<Vec<_>>());
    }
}
