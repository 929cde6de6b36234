//! CSV Output
//!
//! One row per scenario metric and per distribution, spreadsheet-friendly.

use crate::report::Report;

/// Generate a CSV report
///
/// Columns: `scenario,status,kind,name,value,mean,std_dev,p05,p50,p95`.
/// Metric rows leave the distribution columns empty and vice versa.
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::from("scenario,status,kind,name,value,mean,std_dev,p05,p50,p95\n");

    for result in &report.results {
        let status = format!("{:?}", result.status).to_lowercase();

        for metric in &result.metrics {
            out.push_str(&format!(
                "{},{},metric,{},{},,,,,\n",
                escape(&result.id),
                status,
                escape(&metric.name),
                metric.value
            ));
        }

        for dist in &result.distributions {
            let s = &dist.summary;
            out.push_str(&format!(
                "{},{},distribution,{},,{},{},{},{},{}\n",
                escape(&result.id),
                status,
                escape(&dist.name),
                s.mean,
                s.std_dev,
                s.p05,
                s.p50,
                s.p95
            ));
        }

        if let Some(failure) = &result.failure {
            out.push_str(&format!(
                "{},{},failure,{},,,,,,\n",
                escape(&result.id),
                status,
                escape(&failure.message)
            ));
        }
    }

    out
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
