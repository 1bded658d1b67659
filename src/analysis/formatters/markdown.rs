use crate::analysis::report::FertilityReport;
use crate::analysis::summary::{DatasetSummary, FieldExtent};
use crate::model::ModelReport;

/// Markdown formatter for fertility reports
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format report as markdown
    pub fn format(report: &FertilityReport) -> String {
        let mut md = String::with_capacity(2048);
        let summary = &report.summary;

        md.push_str("# Soil Fertility Index Report\n\n");
        if let Some(source) = &report.source {
            md.push_str(&format!("**Source:** {}  \n", source));
        }
        md.push_str(&format!("**Generated:** {}  \n", report.generated_at));
        md.push_str(&format!("**Samples:** {}\n\n", summary.n_samples));

        Self::format_sfi(&mut md, summary);
        Self::format_classes(&mut md, summary);
        Self::format_nutrients(&mut md, summary);
        Self::format_trends(&mut md, summary);

        if let Some(field) = &summary.field {
            Self::format_field(&mut md, field);
        }

        match &report.model {
            Some(model) => Self::format_model(&mut md, model),
            None => md.push_str("## Model\n\nModel training was skipped.\n\n"),
        }

        md
    }

    fn format_sfi(md: &mut String, summary: &DatasetSummary) {
        let sfi = &summary.sfi;
        md.push_str("## SFI Statistics\n\n");
        md.push_str("| Statistic | Value |\n");
        md.push_str("|-----------|-------|\n");
        md.push_str(&format!("| Mean | {:.2} |\n", sfi.mean));
        md.push_str(&format!("| Median | {:.2} |\n", sfi.median));
        md.push_str(&format!("| Std Dev | {:.2} |\n", sfi.std_dev));
        md.push_str(&format!("| Min | {:.2} |\n", sfi.min));
        md.push_str(&format!("| Max | {:.2} |\n\n", sfi.max));
    }

    fn format_classes(md: &mut String, summary: &DatasetSummary) {
        md.push_str("## Fertility Classes\n\n");
        md.push_str("| Class | Samples | Share |\n");
        md.push_str("|-------|---------|-------|\n");
        for share in &summary.classes {
            md.push_str(&format!(
                "| {} | {} | {:.1}% |\n",
                share.label, share.count, share.percent
            ));
        }
        md.push('\n');
    }

    fn format_nutrients(md: &mut String, summary: &DatasetSummary) {
        let means = &summary.nutrient_means;
        md.push_str("## Average Nutrient Levels\n\n");
        md.push_str(&format!("- **N:** {:.2} kg/ha\n", means.n));
        md.push_str(&format!("- **P:** {:.2} kg/ha\n", means.p));
        md.push_str(&format!("- **K:** {:.2} kg/ha\n", means.k));
        md.push_str(&format!("- **OC:** {:.2} %\n", means.oc));
        md.push_str(&format!("- **pH:** {:.2}\n\n", means.ph));
    }

    fn format_trends(md: &mut String, summary: &DatasetSummary) {
        md.push_str("## Parameter Relationships with SFI\n\n");
        md.push_str("| Parameter | Correlation | Quadratic Trend |\n");
        md.push_str("|-----------|-------------|-----------------|\n");
        for trend in &summary.parameters {
            let correlation = trend
                .correlation
                .map(|r| format!("{:.3}", r))
                .unwrap_or_else(|| "n/a".to_string());
            let quadratic = trend
                .quadratic
                .map(|[a, b, c]| format!("{:.3e}·x² + {:.3e}·x + {:.3}", a, b, c))
                .unwrap_or_else(|| "n/a".to_string());
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                trend.label, correlation, quadratic
            ));
        }
        md.push('\n');
    }

    fn format_field(md: &mut String, field: &FieldExtent) {
        md.push_str("## Field Extent\n\n");
        md.push_str(&format!(
            "Latitude {:.6} to {:.6}, longitude {:.6} to {:.6}\n\n",
            field.lat_min, field.lat_max, field.lon_min, field.lon_max
        ));
    }

    fn format_model(md: &mut String, model: &ModelReport) {
        md.push_str("## Random Forest Model\n\n");
        md.push_str(&format!(
            "{} trees, {} training / {} test samples\n\n",
            model.n_estimators, model.n_train, model.n_test
        ));
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| R² (train) | {:.4} |\n", model.r2_train));
        md.push_str(&format!("| R² (test) | {:.4} |\n", model.r2_test));
        md.push_str(&format!("| RMSE (test) | {:.4} |\n\n", model.rmse_test));

        md.push_str("### Feature Importance\n\n");
        md.push_str("| Rank | Feature | Importance |\n");
        md.push_str("|------|---------|------------|\n");
        for (rank, entry) in model.feature_importances.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {:.4} |\n",
                rank + 1,
                entry.feature,
                entry.importance
            ));
        }
        md.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::formatters::tests::sample_report;

    #[test]
    fn test_format_markdown() {
        let md = MarkdownFormatter::format(&sample_report());

        assert!(md.contains("# Soil Fertility Index Report"));
        assert!(md.contains("**Source:** Soil_readings.csv"));
        assert!(md.contains("| Mean | 58.75 |"));
        assert!(md.contains("| Medium-High (60-80) | 1 | 25.0% |"));
        assert!(md.contains("| 1 | N | 0.6000 |"));
    }

    #[test]
    fn test_format_without_model() {
        let mut report = sample_report();
        report.model = None;
        let md = MarkdownFormatter::format(&report);

        assert!(md.contains("Model training was skipped."));
        assert!(!md.contains("Feature Importance"));
    }

    #[test]
    fn test_missing_trend_shown_as_na() {
        let md = MarkdownFormatter::format(&sample_report());
        assert!(md.contains("| pH | n/a | n/a |"));
    }
}
