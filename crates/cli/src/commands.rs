// CLI subcommands

pub mod analyze;
pub mod run;

use scalebench_harness::HarnessError;

/// Wrap a harness failure so the operator sees its failure kind first
pub(crate) fn failure(stage: &'static str) -> impl FnOnce(HarnessError) -> anyhow::Error {
    move |err| {
        let kind = err.kind();
        tracing::error!(stage, kind, error = %err, "Command failed");
        anyhow::Error::new(err).context(format!("{stage} failed: {kind}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalebench_harness::AnalysisError;

    #[test]
    fn test_failure_leads_with_kind() {
        let err = failure("analysis")(HarnessError::from(AnalysisError::NoSamples { key: Some(4) }));

        assert_eq!(err.to_string(), "analysis failed: NoSamplesFailure");
        assert!(format!("{err:#}").contains("4"));
    }
}
