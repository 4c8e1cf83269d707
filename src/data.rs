//! Customer CSV loading and typed record extraction using Polars

use polars::prelude::*;

/// Churn rates of exactly zero are replaced with this floor when dividing,
/// so the LTV projection never divides by zero.
pub const CHURN_RATE_FLOOR: f64 = 0.0001;

/// One customer row from the CSV export.
///
/// Records are immutable once loaded; adjusted churn, LTV, and the cohort
/// label are computed accessors rather than stored columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: i64,
    pub acquisition_channel: String,
    pub signup_source: String,
    pub region: String,
    pub customer_tier: String,
    pub contract_length_months: i64,
    pub arpu: f64,
    pub gross_margin: f64,
    pub churn_rate: f64,
    pub marketing_spend: f64,
    pub year: i32,
    pub month: u32,
}

impl CustomerRecord {
    /// Churn rate with the division-safe floor applied.
    ///
    /// Only a rate of exactly zero is substituted; out-of-range rates pass
    /// through untouched.
    pub fn adjusted_churn(&self) -> f64 {
        if self.churn_rate == 0.0 {
            CHURN_RATE_FLOOR
        } else {
            self.churn_rate
        }
    }

    /// Projected lifetime value: margin-adjusted ARPU over the adjusted churn rate.
    pub fn ltv(&self) -> f64 {
        (self.arpu * self.gross_margin) / self.adjusted_churn()
    }

    /// Signup cohort label, e.g. "2023-01".
    pub fn cohort_label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Load the customer CSV into typed records.
///
/// # Arguments
/// * `file_path` - Path to the CSV file
///
/// # Returns
/// * `Vec<CustomerRecord>`, one per CSV row, in file order
///
/// The load is all-or-nothing: an empty table or a modeled column with
/// missing values aborts with an error. Row values are not validated.
pub fn load_customers(file_path: &str) -> crate::Result<Vec<CustomerRecord>> {
    let df = LazyCsvReader::new(file_path)
        .finish()?
        .select([
            col("customer_id"),
            col("acquisition_channel"),
            col("signup_source"),
            col("region"),
            col("customer_tier"),
            col("contract_length_months"),
            col("arpu"),
            col("gross_margin"),
            col("churn_rate"),
            col("marketing_spend"),
            col("year"),
            col("month"),
        ])
        .collect()?;

    if df.height() == 0 {
        anyhow::bail!("No customer rows found in {file_path}");
    }

    extract_records(&df)
}

/// Convert the collected DataFrame into plain records.
fn extract_records(df: &DataFrame) -> crate::Result<Vec<CustomerRecord>> {
    let customer_id = int_column(df, "customer_id")?;
    let acquisition_channel = str_column(df, "acquisition_channel")?;
    let signup_source = str_column(df, "signup_source")?;
    let region = str_column(df, "region")?;
    let customer_tier = str_column(df, "customer_tier")?;
    let contract_length_months = int_column(df, "contract_length_months")?;
    let arpu = float_column(df, "arpu")?;
    let gross_margin = float_column(df, "gross_margin")?;
    let churn_rate = float_column(df, "churn_rate")?;
    let marketing_spend = float_column(df, "marketing_spend")?;
    let year = int_column(df, "year")?;
    let month = int_column(df, "month")?;

    let records: Vec<CustomerRecord> = (0..df.height())
        .map(|i| CustomerRecord {
            customer_id: customer_id[i],
            acquisition_channel: acquisition_channel[i].clone(),
            signup_source: signup_source[i].clone(),
            region: region[i].clone(),
            customer_tier: customer_tier[i].clone(),
            contract_length_months: contract_length_months[i],
            arpu: arpu[i],
            gross_margin: gross_margin[i],
            churn_rate: churn_rate[i],
            marketing_spend: marketing_spend[i],
            year: year[i] as i32,
            month: month[i] as u32,
        })
        .collect();

    log::debug!("loaded {} customer records", records.len());

    Ok(records)
}

/// Extract a numeric column as f64, casting integer-inferred columns first.
fn float_column(df: &DataFrame, name: &str) -> crate::Result<Vec<f64>> {
    let values: Vec<f64> = df
        .column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .into_no_null_iter()
        .collect();
    check_complete(df, name, values.len())?;
    Ok(values)
}

fn int_column(df: &DataFrame, name: &str) -> crate::Result<Vec<i64>> {
    let values: Vec<i64> = df
        .column(name)?
        .cast(&DataType::Int64)?
        .i64()?
        .into_no_null_iter()
        .collect();
    check_complete(df, name, values.len())?;
    Ok(values)
}

fn str_column(df: &DataFrame, name: &str) -> crate::Result<Vec<String>> {
    let values: Vec<String> = df
        .column(name)?
        .utf8()?
        .into_no_null_iter()
        .map(str::to_string)
        .collect();
    check_complete(df, name, values.len())?;
    Ok(values)
}

fn check_complete(df: &DataFrame, name: &str, len: usize) -> crate::Result<()> {
    if len != df.height() {
        anyhow::bail!(
            "Column '{name}' has {} missing values",
            df.height() - len
        );
    }
    Ok(())
}
