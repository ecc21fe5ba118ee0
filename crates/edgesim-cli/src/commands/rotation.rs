//! `edgesim rotation`: print the index to data type rotation with value rules.

use edgesim_core::generator::random_value;
use edgesim_core::{
    DEVICE_METRIC_PREFIX, MetricDataType, NODE_METRIC_PREFIX, ROTATION_LEN, ValueRanges,
    data_type_for_index, metric_name, rng,
};

use super::{SimOptions, load_config};

/// Value rule of `data_type` under `ranges`.
fn value_rule(data_type: MetricDataType, ranges: ValueRanges) -> &'static str {
    let legacy = ranges == ValueRanges::Legacy;
    match data_type {
        MetricDataType::Int8 => "any i8",
        MetricDataType::Int16 if legacy => "0..=32767",
        MetricDataType::Int16 => "any i16",
        MetricDataType::Int32 => "any i32",
        MetricDataType::Int64 => "any i64",
        MetricDataType::UInt8 if legacy => "0..=32767",
        MetricDataType::UInt8 => "any u8",
        MetricDataType::UInt16 if legacy => "any i32",
        MetricDataType::UInt16 => "any u16",
        MetricDataType::UInt32 if legacy => "any i64",
        MetricDataType::UInt32 => "any u32",
        MetricDataType::UInt64 => "any u64",
        MetricDataType::Float | MetricDataType::Double => "[0, 1)",
        MetricDataType::String | MetricDataType::Text => "8 uppercase alphanumerics",
        MetricDataType::DateTime => "any i64 ms since epoch",
    }
}

pub fn run(options: &SimOptions<'_>) {
    let config = load_config(options).unwrap_or_else(|e| super::fail(e));
    let ranges = config.value_ranges;
    let mut rng = rng::from_seed(config.seed);

    println!("Metric type rotation (index % {ROTATION_LEN}, ranges: {ranges})");
    println!();
    println!(
        "  {:>3} {:<8} {:<7} {:<7} {:<26} Sample",
        "r", "Type", "Node", "Device", "Values"
    );
    println!("  {}", "-".repeat(72));
    for index in 0..ROTATION_LEN {
        let data_type = data_type_for_index(index);
        let sample = random_value(&mut *rng, data_type, ranges);
        println!(
            "  {:>3} {:<8} {:<7} {:<7} {:<26} {sample}",
            index,
            data_type.to_string(),
            metric_name(NODE_METRIC_PREFIX, index),
            metric_name(DEVICE_METRIC_PREFIX, index),
            value_rule(data_type, ranges),
        );
    }
    println!();
    println!("Index {ROTATION_LEN} starts the cycle again at Int8.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_rule_differs_only_for_legacy_kinds() {
        let differing: Vec<MetricDataType> = MetricDataType::ALL
            .iter()
            .copied()
            .filter(|t| value_rule(*t, ValueRanges::Legacy) != value_rule(*t, ValueRanges::Nominal))
            .collect();
        assert_eq!(
            differing,
            vec![
                MetricDataType::Int16,
                MetricDataType::UInt8,
                MetricDataType::UInt16,
                MetricDataType::UInt32,
            ]
        );
    }
}
