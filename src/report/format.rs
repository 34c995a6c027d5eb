//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use chrono::Local;

use crate::domain::{RunConfig, StepRecord};
use crate::models::DiracMixture;

/// Format the result of an adaptive fit run.
pub fn format_fit_summary(
    config: &RunConfig,
    truth: &DiracMixture,
    fitted: &DiracMixture,
    distance: f64,
) -> String {
    let mut out = String::new();

    out.push_str("=== adm - Adaptive Dirac Mixture fit ===\n");
    out.push_str(&format!("Generated: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!(
        "Problem: rows={} | dims={} | seed={}\n",
        config.rows,
        truth.dim(),
        config.seed
    ));
    out.push_str(&format!(
        "Search: steps={} | new centers/step={} | sigma={} | nnls max iter={}\n",
        config.max_steps,
        config.new_centers_at_each_step,
        config.new_centers_sigma,
        config.solver_max_iter
    ));

    out.push_str("\nTruth:\n");
    out.push_str(&format_components(truth));

    out.push_str(&format!("\nFitted ({} components):\n", fitted.len()));
    out.push_str(&format_components(fitted));

    out.push_str(&format!("\nDistance to target: {distance:.6}\n"));
    out.push_str(&format!(
        "Weight mass: truth={:.4} fitted={:.4}\n",
        truth.weights().iter().sum::<f64>(),
        fitted.weights().iter().sum::<f64>()
    ));

    out
}

/// Format recovered vs. true weights for a fixed-location solve.
pub fn format_weight_recovery(truth: &DiracMixture, recovered: &[f64], distance: f64) -> String {
    let mut out = String::new();

    out.push_str("=== adm - weights for fixed locations ===\n");
    out.push_str(
        format!(
            "{:<32} {:>10} {:>10} {:>10}\n",
            "location", "true", "fitted", "error"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<32} {:-<10} {:-<10} {:-<10}\n", "", "", "", "").trim_end());
    out.push('\n');

    for ((w, row), r) in truth
        .weights()
        .iter()
        .zip(truth.locations().row_iter())
        .zip(recovered.iter())
    {
        let loc: Vec<f64> = row.iter().copied().collect();
        out.push_str(&format!(
            "{:<32} {:>10.4} {:>10.4} {:>10.2e}\n",
            truncate(&fmt_vec(&loc), 32),
            w,
            r,
            (r - w).abs()
        ));
    }

    out.push_str(&format!("\nDistance to target: {distance:.6}\n"));
    out
}

/// Format a recorded trajectory as a table.
pub fn format_trajectory(records: &[StepRecord]) -> String {
    let mut out = String::new();
    if records.is_empty() {
        return out;
    }

    out.push_str("Trajectory:\n");
    out.push_str(
        format!(
            "{:>8} {:>10} {:>12} {:>14}\n",
            "step", "components", "weight_sum", "residual"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:->8} {:->10} {:->12} {:->14}\n", "", "", "", "").trim_end());
    out.push('\n');

    for r in records {
        out.push_str(&format!(
            "{:>8} {:>10} {:>12.4} {:>14.6}\n",
            r.step, r.components, r.weight_sum, r.residual_norm
        ));
    }

    out
}

fn format_components(mixture: &DiracMixture) -> String {
    if mixture.is_empty() {
        return "  (none)\n".to_string();
    }

    let mut order: Vec<usize> = (0..mixture.len()).collect();
    order.sort_by(|&a, &b| {
        mixture.weights()[b]
            .partial_cmp(&mixture.weights()[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut out = String::new();
    for i in order {
        let loc: Vec<f64> = mixture.locations().row(i).iter().copied().collect();
        out.push_str(&format!("  {:>8.4} * Delta({})\n", mixture.weights()[i], fmt_vec(&loc)));
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.4}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn mixture() -> DiracMixture {
        let locations = DMatrix::from_row_slice(2, 2, &[1.5, 0.5, 0.5, 1.5]);
        DiracMixture::new(vec![0.2, 0.8], locations).unwrap()
    }

    #[test]
    fn components_are_listed_heaviest_first() {
        let text = format_components(&mixture());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("0.8000"), "{text}");
        assert!(lines[1].contains("[1.5000, 0.5000]"), "{text}");
    }

    #[test]
    fn summary_mentions_distance_and_counts() {
        let text = format_fit_summary(&RunConfig::default(), &mixture(), &mixture(), 0.00123);
        assert!(text.contains("Fitted (2 components)"));
        assert!(text.contains("Distance to target: 0.001230"));
    }

    #[test]
    fn recovery_table_has_one_row_per_location() {
        let text = format_weight_recovery(&mixture(), &[0.21, 0.79], 0.0);
        assert_eq!(text.lines().filter(|l| l.contains("Delta") || l.starts_with('[')).count(), 2);
        assert!(text.contains("1.00e-2"), "{text}");
    }

    #[test]
    fn trajectory_table_is_empty_without_records() {
        assert!(format_trajectory(&[]).is_empty());
        let text = format_trajectory(&[StepRecord {
            step: 9,
            components: 3,
            weight_sum: 1.0,
            residual_norm: 0.5,
        }]);
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
