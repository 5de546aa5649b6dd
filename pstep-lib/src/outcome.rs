use std::fmt;

/// Result of one build step, derived from the process exit code.
///
/// Success continues the pipeline, Unstable marks the build degraded but
/// continuing, Failure halts the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Success,
    Unstable,
    Failure,
}

impl fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExitOutcome::Success => "SUCCESS",
            ExitOutcome::Unstable => "UNSTABLE",
            ExitOutcome::Failure => "FAILURE",
        };
        f.write_str(name)
    }
}

/// Classify a process exit code against an optional unstable threshold.
///
/// Callers are expected to pass a normalized threshold (see
/// [`crate::ScriptConfig::unstable_return`]); a raw `Some(0)` is still
/// treated as disabled here so the 0-ambiguity cannot resurface.
pub fn classify(exit_code: i32, unstable_return: Option<i32>) -> ExitOutcome {
    if exit_code == 0 {
        return ExitOutcome::Success;
    }

    match unstable_return {
        Some(unstable) if unstable != 0 && unstable == exit_code => ExitOutcome::Unstable,
        _ => ExitOutcome::Failure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_success_regardless_of_threshold() {
        assert_eq!(classify(0, None), ExitOutcome::Success);
        assert_eq!(classify(0, Some(0)), ExitOutcome::Success);
        assert_eq!(classify(0, Some(3)), ExitOutcome::Success);
        assert_eq!(classify(0, Some(-1)), ExitOutcome::Success);
    }

    #[test]
    fn matching_nonzero_threshold_is_unstable() {
        assert_eq!(classify(3, Some(3)), ExitOutcome::Unstable);
        assert_eq!(classify(-1, Some(-1)), ExitOutcome::Unstable);
        assert_eq!(classify(255, Some(255)), ExitOutcome::Unstable);
    }

    #[test]
    fn mismatched_threshold_is_failure() {
        assert_eq!(classify(1, Some(3)), ExitOutcome::Failure);
        assert_eq!(classify(3, Some(1)), ExitOutcome::Failure);
    }

    #[test]
    fn absent_threshold_is_failure() {
        assert_eq!(classify(1, None), ExitOutcome::Failure);
        assert_eq!(classify(127, None), ExitOutcome::Failure);
    }

    #[test]
    fn zero_threshold_behaves_like_absent() {
        for exit_code in [-2, -1, 1, 2, 3, 127, 255] {
            assert_eq!(classify(exit_code, Some(0)), classify(exit_code, None));
        }
    }
}
