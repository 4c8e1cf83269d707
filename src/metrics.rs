//! Channel and region metric aggregation: CAC, LTV, and ARPU

use crate::data::CustomerRecord;
use std::collections::BTreeMap;

/// Aggregated unit economics for one acquisition channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelMetrics {
    pub channel: String,
    /// Customer acquisition cost: mean marketing spend per customer.
    pub cac: f64,
    /// Mean projected lifetime value per customer.
    pub avg_ltv: f64,
    /// avg_ltv / cac. Unguarded: a zero CAC propagates as infinity.
    pub ltv_cac_ratio: f64,
}

/// Mean ARPU for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionArpu {
    pub region: String,
    pub avg_arpu: f64,
}

/// Compute CAC, average LTV, and the LTV:CAC ratio per acquisition channel.
///
/// One row per distinct channel present in the data, ordered
/// lexicographically by channel name.
pub fn channel_metrics(records: &[CustomerRecord]) -> Vec<ChannelMetrics> {
    let mut sums: BTreeMap<&str, (f64, f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry(&r.acquisition_channel).or_insert((0.0, 0.0, 0));
        entry.0 += r.marketing_spend;
        entry.1 += r.ltv();
        entry.2 += 1;
    }

    sums.into_iter()
        .map(|(channel, (spend_sum, ltv_sum, n))| {
            let cac = spend_sum / n as f64;
            let avg_ltv = ltv_sum / n as f64;
            ChannelMetrics {
                channel: channel.to_string(),
                cac,
                avg_ltv,
                ltv_cac_ratio: avg_ltv / cac,
            }
        })
        .collect()
}

/// Mean ARPU per region, ordered lexicographically by region name.
pub fn arpu_by_region(records: &[CustomerRecord]) -> Vec<RegionArpu> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = sums.entry(&r.region).or_insert((0.0, 0));
        entry.0 += r.arpu;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(region, (arpu_sum, n))| RegionArpu {
            region: region.to_string(),
            avg_arpu: arpu_sum / n as f64,
        })
        .collect()
}

/// Mean projected LTV over the whole customer table.
pub fn average_ltv(records: &[CustomerRecord]) -> f64 {
    let total: f64 = records.iter().map(CustomerRecord::ltv).sum();
    total / records.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CHURN_RATE_FLOOR;

    fn record(channel: &str, region: &str, arpu: f64, margin: f64, churn: f64, spend: f64) -> CustomerRecord {
        CustomerRecord {
            customer_id: 1,
            acquisition_channel: channel.to_string(),
            signup_source: "website".to_string(),
            region: region.to_string(),
            customer_tier: "pro".to_string(),
            contract_length_months: 12,
            arpu,
            gross_margin: margin,
            churn_rate: churn,
            marketing_spend: spend,
            year: 2023,
            month: 1,
        }
    }

    #[test]
    fn test_ratio_is_exact_division() {
        // (174 * 0.5) / 0.01 = 8700 LTV against 100 CAC
        let records = vec![record("Organic Search", "NA", 174.0, 0.5, 0.01, 100.0)];
        let metrics = channel_metrics(&records);

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].avg_ltv, 8700.0);
        assert_eq!(metrics[0].cac, 100.0);
        assert_eq!(metrics[0].ltv_cac_ratio, 87.0);
        assert_eq!(metrics[0].ltv_cac_ratio, metrics[0].avg_ltv / metrics[0].cac);
    }

    #[test]
    fn test_zero_churn_matches_floor_churn() {
        let zero = record("Organic Search", "NA", 200.0, 0.8, 0.0, 50.0);
        let floored = record("Organic Search", "NA", 200.0, 0.8, CHURN_RATE_FLOOR, 50.0);
        assert_eq!(zero.ltv(), floored.ltv());
    }

    #[test]
    fn test_channel_means() {
        let records = vec![
            record("Google Ads", "NA", 100.0, 0.5, 0.1, 300.0),
            record("Google Ads", "NA", 100.0, 0.5, 0.1, 500.0),
            record("Meta Ads", "NA", 100.0, 0.5, 0.05, 200.0),
        ];
        let metrics = channel_metrics(&records);

        assert_eq!(metrics.len(), 2);
        // BTreeMap keys come out sorted
        assert_eq!(metrics[0].channel, "Google Ads");
        assert_eq!(metrics[1].channel, "Meta Ads");
        assert_eq!(metrics[0].cac, 400.0);
        assert_eq!(metrics[0].avg_ltv, 500.0);
        assert_eq!(metrics[1].avg_ltv, 1000.0);
    }

    #[test]
    fn test_arpu_by_region() {
        let records = vec![
            record("Organic Search", "Europe", 150.0, 0.5, 0.1, 100.0),
            record("Organic Search", "Europe", 170.0, 0.5, 0.1, 100.0),
            record("Organic Search", "APAC", 163.0, 0.5, 0.1, 100.0),
        ];
        let arpu = arpu_by_region(&records);

        assert_eq!(arpu.len(), 2);
        assert_eq!(arpu[0].region, "APAC");
        assert_eq!(arpu[0].avg_arpu, 163.0);
        assert_eq!(arpu[1].region, "Europe");
        assert_eq!(arpu[1].avg_arpu, 160.0);
    }

    #[test]
    fn test_average_ltv() {
        let records = vec![
            record("Organic Search", "NA", 100.0, 0.5, 0.1, 100.0), // ltv 500
            record("Organic Search", "NA", 100.0, 0.5, 0.05, 100.0), // ltv 1000
        ];
        assert_eq!(average_ltv(&records), 750.0);
    }
}
