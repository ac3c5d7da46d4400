use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::complexity::round1;

/// Aggregate complexity above which the validation report warns that
/// playback performance may suffer.
pub const HIGH_COMPLEXITY_THRESHOLD: f64 = 50.0;

/// Pre-flight check result for file-upload and sample-study flows.
/// Hard `errors` mean studies were dropped; `warnings` flag reduced
/// fidelity or heavy content without blocking the load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub study_count: usize,
    pub complexity: f64,
}

pub fn validate(input: &str) -> ValidationReport {
    let collection = Collection::parse(input);

    let mut errors: Vec<String> = collection
        .errors
        .iter()
        .map(|e| match e.line {
            Some(line) => format!("study {}: {} (line {})", e.study_index + 1, e.message, line),
            None => format!("study {}: {}", e.study_index + 1, e.message),
        })
        .collect();
    let study_count = collection.studies.len();
    if study_count == 0 && errors.is_empty() {
        errors.push("no studies found in input".to_string());
    }

    let complexity = round1(
        collection
            .studies
            .iter()
            .filter_map(|s| s.complexity.as_ref())
            .map(|c| c.complexity)
            .sum(),
    );

    let mut warnings = Vec::new();
    let fallback_count = collection.studies.iter().filter(|s| s.fallback).count();
    if fallback_count > 0 {
        warnings.push(format!(
            "{} of {} studies parsed with reduced fidelity (comments, variations and annotations were dropped)",
            fallback_count, study_count
        ));
    }
    if complexity > HIGH_COMPLEXITY_THRESHOLD {
        warnings.push(format!(
            "high aggregate complexity ({:.1}) may affect playback performance",
            complexity
        ));
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
        study_count,
        complexity,
    }
}
