//! Console summaries and chart rendering using Plotters

use crate::cohort::{retention_matrix, CohortGroup, CohortRetentionPoint};
use crate::data::CustomerRecord;
use crate::metrics::{ChannelMetrics, RegionArpu};
use ndarray::Array2;
use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Fixed artifact names, written into the output directory.
pub const COHORT_HEATMAP_FILE: &str = "plot1_cohort_heatmap.png";
pub const LTV_VS_CAC_FILE: &str = "plot2_ltv_vs_cac.png";
pub const LTV_CAC_RATIO_FILE: &str = "plot3_ltv_cac_ratio.png";
pub const ARPU_BY_REGION_FILE: &str = "plot4_arpu_by_region.png";

/// Color palette cycled across bar series
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
    RGBColor(128, 128, 128),
];

const LTV_BAR_COLOR: RGBColor = RGBColor(0, 128, 128);
const CAC_BAR_COLOR: RGBColor = RGBColor(255, 165, 0);

/// Render all four charts into `output_dir`.
pub fn generate_report(
    channel_metrics: &[ChannelMetrics],
    region_arpu: &[RegionArpu],
    retention: &[CohortRetentionPoint],
    output_dir: &Path,
) -> crate::Result<()> {
    std::fs::create_dir_all(output_dir)?;

    let (cohorts, matrix) = retention_matrix(retention);
    render_retention_heatmap(&cohorts, &matrix, &output_dir.join(COHORT_HEATMAP_FILE))?;
    render_ltv_vs_cac(channel_metrics, &output_dir.join(LTV_VS_CAC_FILE))?;
    render_ltv_cac_ratio(channel_metrics, &output_dir.join(LTV_CAC_RATIO_FILE))?;
    render_arpu_by_region(region_arpu, &output_dir.join(ARPU_BY_REGION_FILE))?;

    Ok(())
}

/// Cohort × month retention heatmap with per-cell counts.
pub fn render_retention_heatmap(
    cohorts: &[String],
    matrix: &Array2<i64>,
    output_path: &Path,
) -> crate::Result<()> {
    let n_cohorts = matrix.nrows();
    let n_months = matrix.ncols();
    let max_count = matrix.iter().copied().max().unwrap_or(1).max(1) as f64;

    let height = 120 + 40 * n_cohorts as u32;
    let root = BitMapBackend::new(output_path, (1100, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Customer Retention by Cohort Month", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..n_months as f64, 0f64..n_cohorts as f64)?;

    let cohort_label = |y: &f64| -> String {
        let i = y.floor() as usize;
        cohorts.get(i).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Months Since Acquisition")
        .y_desc("Cohort Month")
        .x_labels(n_months)
        .y_labels(n_cohorts)
        .x_label_formatter(&|x| format!("{}", x.floor() as usize))
        .y_label_formatter(&cohort_label)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (row, cohort_row) in matrix.outer_iter().enumerate() {
        for (month, &count) in cohort_row.iter().enumerate() {
            let t = count as f64 / max_count;
            chart.draw_series(std::iter::once(Rectangle::new(
                [
                    (month as f64, row as f64),
                    (month as f64 + 1.0, row as f64 + 1.0),
                ],
                heat_color(t).filled(),
            )))?;

            let text_color = if t > 0.55 { WHITE } else { BLACK };
            chart.draw_series(std::iter::once(Text::new(
                format!("{count}"),
                (month as f64 + 0.35, row as f64 + 0.55),
                ("sans-serif", 13).into_font().color(&text_color),
            )))?;
        }
    }

    root.present()?;
    println!("Cohort heatmap saved to: {}", output_path.display());

    Ok(())
}

/// Grouped LTV / CAC bars per acquisition channel.
pub fn render_ltv_vs_cac(metrics: &[ChannelMetrics], output_path: &Path) -> crate::Result<()> {
    let n = metrics.len();
    let max_val = metrics
        .iter()
        .map(|m| m.avg_ltv.max(m.cac))
        .fold(0.0f64, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("LTV vs CAC by Acquisition Channel", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max_val * 1.15))?;

    let channel_label = |x: &f64| -> String {
        let i = x.round() as usize;
        if (x - i as f64).abs() < 0.01 && i < n {
            metrics[i].channel.clone()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Acquisition Channel")
        .y_desc("Amount ($)")
        .x_labels(n)
        .x_label_formatter(&channel_label)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    const BAR_WIDTH: f64 = 0.35;

    chart
        .draw_series(metrics.iter().enumerate().map(|(i, m)| {
            let x = i as f64;
            Rectangle::new([(x - BAR_WIDTH, 0.0), (x, m.avg_ltv)], LTV_BAR_COLOR.filled())
        }))?
        .label("LTV")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], LTV_BAR_COLOR.filled()));

    chart
        .draw_series(metrics.iter().enumerate().map(|(i, m)| {
            let x = i as f64;
            Rectangle::new([(x, 0.0), (x + BAR_WIDTH, m.cac)], CAC_BAR_COLOR.filled())
        }))?
        .label("CAC")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], CAC_BAR_COLOR.filled()));

    // Dollar labels above each bar
    let pad = max_val * 0.02;
    chart.draw_series(metrics.iter().enumerate().map(|(i, m)| {
        Text::new(
            format!("${:.0}", m.avg_ltv),
            (i as f64 - BAR_WIDTH, m.avg_ltv + pad),
            ("sans-serif", 12),
        )
    }))?;
    chart.draw_series(metrics.iter().enumerate().map(|(i, m)| {
        Text::new(
            format!("${:.0}", m.cac),
            (i as f64, m.cac + pad),
            ("sans-serif", 12),
        )
    }))?;

    chart.configure_series_labels().border_style(BLACK).draw()?;

    root.present()?;
    println!("LTV vs CAC chart saved to: {}", output_path.display());

    Ok(())
}

/// One LTV:CAC ratio bar per acquisition channel.
pub fn render_ltv_cac_ratio(metrics: &[ChannelMetrics], output_path: &Path) -> crate::Result<()> {
    let n = metrics.len();
    let max_ratio = metrics
        .iter()
        .map(|m| m.ltv_cac_ratio)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("LTV:CAC Ratio by Acquisition Channel", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max_ratio * 1.15))?;

    let channel_label = |x: &f64| -> String {
        let i = x.round() as usize;
        if (x - i as f64).abs() < 0.01 && i < n {
            metrics[i].channel.clone()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Acquisition Channel")
        .y_desc("LTV:CAC Ratio")
        .x_labels(n)
        .x_label_formatter(&channel_label)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, m) in metrics.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.4, 0.0), (x + 0.4, m.ltv_cac_ratio)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.1}x", m.ltv_cac_ratio),
            (x - 0.1, m.ltv_cac_ratio + max_ratio * 0.02),
            ("sans-serif", 13),
        )))?;
    }

    root.present()?;
    println!("LTV:CAC ratio chart saved to: {}", output_path.display());

    Ok(())
}

/// One mean-ARPU bar per region.
pub fn render_arpu_by_region(regions: &[RegionArpu], output_path: &Path) -> crate::Result<()> {
    let n = regions.len();
    let max_arpu = regions
        .iter()
        .map(|r| r.avg_arpu)
        .fold(0.0f64, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(output_path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average ARPU by Region", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..(max_arpu * 1.15))?;

    let region_label = |x: &f64| -> String {
        let i = x.round() as usize;
        if (x - i as f64).abs() < 0.01 && i < n {
            regions[i].region.clone()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Region")
        .y_desc("Average ARPU ($)")
        .x_labels(n)
        .x_label_formatter(&region_label)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, r) in regions.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let x = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x - 0.4, 0.0), (x + 0.4, r.avg_arpu)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("${:.0}", r.avg_arpu),
            (x - 0.1, r.avg_arpu + max_arpu * 0.02),
            ("sans-serif", 13),
        )))?;
    }

    root.present()?;
    println!("ARPU by region chart saved to: {}", output_path.display());

    Ok(())
}

/// Light-to-dark ramp scaled to the maximum cell value.
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t) as u8;
    RGBColor(lerp(237, 34), lerp(248, 94), lerp(177, 168))
}

/// Print dataset shape, categorical value counts, and numeric summaries.
pub fn print_dataset_summary(records: &[CustomerRecord]) {
    println!("\n=== Dataset Summary ===");
    println!("Rows: {}", records.len());

    let categorical: [(&str, fn(&CustomerRecord) -> String); 5] = [
        ("acquisition_channel", |r| r.acquisition_channel.clone()),
        ("signup_source", |r| r.signup_source.clone()),
        ("region", |r| r.region.clone()),
        ("customer_tier", |r| r.customer_tier.clone()),
        ("contract_length_months", |r| {
            r.contract_length_months.to_string()
        }),
    ];

    for (name, accessor) in categorical {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for r in records {
            *counts.entry(accessor(r)).or_insert(0) += 1;
        }
        let mut sorted: Vec<_> = counts.into_iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        println!("\nValue counts for {name}:");
        for (value, count) in sorted {
            println!("  {value:<24} {count}");
        }
    }

    let numeric: [(&str, fn(&CustomerRecord) -> f64); 4] = [
        ("arpu", |r| r.arpu),
        ("gross_margin", |r| r.gross_margin),
        ("churn_rate", |r| r.churn_rate),
        ("marketing_spend", |r| r.marketing_spend),
    ];

    println!("\nNumeric columns:");
    println!("  Column          |  Count |     Mean |      Std |      Min |      Max");
    println!("  ----------------|--------|----------|----------|----------|---------");
    for (name, accessor) in numeric {
        let values: Vec<f64> = records.iter().map(accessor).collect();
        let n = values.len();
        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("  {name:<16}| {n:>6} | {mean:>8.2} | {std:>8.2} | {min:>8.2} | {max:>8.2}");
    }
}

/// Print the per-channel economics table and the overall average LTV.
pub fn print_channel_table(metrics: &[ChannelMetrics], avg_ltv: f64) {
    println!("\n=== Channel Economics ===");
    println!("  Channel                  |      CAC |       LTV | LTV:CAC");
    println!("  -------------------------|----------|-----------|--------");
    for m in metrics {
        println!(
            "  {:<25}| {:>8.2} | {:>9.2} | {:>6.1}x",
            m.channel, m.cac, m.avg_ltv, m.ltv_cac_ratio
        );
    }
    println!("\nAverage LTV across all customers: ${avg_ltv:.2}");
}

/// Print cohort sizes and mean churn rates.
pub fn print_cohort_sizes(groups: &[CohortGroup]) {
    println!("\n=== Signup Cohorts ===");
    println!("  Cohort  | Customers | Avg Churn");
    println!("  --------|-----------|----------");
    for g in groups {
        println!(
            "  {:<8}| {:>9} | {:>8.3}",
            g.label, g.initial_customers, g.avg_churn
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cohort::simulate_retention;
    use crate::data::CustomerRecord;
    use std::path::Path;
    use tempfile::tempdir;

    fn sample_metrics() -> Vec<ChannelMetrics> {
        vec![
            ChannelMetrics {
                channel: "Google Ads".to_string(),
                cac: 320.0,
                avg_ltv: 4100.0,
                ltv_cac_ratio: 12.8,
            },
            ChannelMetrics {
                channel: "Organic Search".to_string(),
                cac: 100.0,
                avg_ltv: 8700.0,
                ltv_cac_ratio: 87.0,
            },
        ]
    }

    fn sample_regions() -> Vec<RegionArpu> {
        vec![
            RegionArpu {
                region: "Europe".to_string(),
                avg_arpu: 168.0,
            },
            RegionArpu {
                region: "North America".to_string(),
                avg_arpu: 176.0,
            },
        ]
    }

    fn sample_records() -> Vec<CustomerRecord> {
        (0..8)
            .map(|i| CustomerRecord {
                customer_id: i,
                acquisition_channel: "Organic Search".to_string(),
                signup_source: "website".to_string(),
                region: "Europe".to_string(),
                customer_tier: "pro".to_string(),
                contract_length_months: 12,
                arpu: 150.0,
                gross_margin: 0.7,
                churn_rate: 0.1,
                marketing_spend: 110.0,
                year: 2023,
                month: 1 + (i as u32 % 2),
            })
            .collect()
    }

    #[test]
    fn test_render_retention_heatmap() {
        let points = simulate_retention(&sample_records());
        let (cohorts, matrix) = retention_matrix(&points);
        let dir = tempdir().unwrap();
        let path = dir.path().join("heatmap.png");

        render_retention_heatmap(&cohorts, &matrix, &path).unwrap();
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_render_ltv_vs_cac() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ltv_cac.png");

        render_ltv_vs_cac(&sample_metrics(), &path).unwrap();
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_render_ltv_cac_ratio() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ratio.png");

        render_ltv_cac_ratio(&sample_metrics(), &path).unwrap();
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_render_arpu_by_region() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("arpu.png");

        render_arpu_by_region(&sample_regions(), &path).unwrap();
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_generate_report_writes_all_artifacts() {
        let records = sample_records();
        let points = simulate_retention(&records);
        let dir = tempdir().unwrap();

        generate_report(&sample_metrics(), &sample_regions(), &points, dir.path()).unwrap();

        for file in [
            COHORT_HEATMAP_FILE,
            LTV_VS_CAC_FILE,
            LTV_CAC_RATIO_FILE,
            ARPU_BY_REGION_FILE,
        ] {
            assert!(dir.path().join(file).exists(), "missing artifact {file}");
        }
    }
}
