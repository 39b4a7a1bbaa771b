//! Maps run results to the process exit outcome.

use playlist_core::ExecutionReport;

use crate::ProcessExit;

/// Exit outcome from succeeded and failed item counts.
pub(crate) fn determine_exit_outcome(succeeded: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if succeeded > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

/// Exit outcome of an executed plan; interrupted runs always fail.
pub(crate) fn outcome_for_report(report: &ExecutionReport) -> ProcessExit {
    if report.interrupted {
        return ProcessExit::Failure;
    }
    determine_exit_outcome(
        report.fetched() + report.deleted() + report.skipped,
        report.failure_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_outcome_success_when_no_failures() {
        assert_eq!(determine_exit_outcome(3, 0), ProcessExit::Success);
        assert_eq!(determine_exit_outcome(0, 0), ProcessExit::Success);
    }

    #[test]
    fn test_exit_outcome_partial_when_mixed() {
        assert_eq!(determine_exit_outcome(2, 1), ProcessExit::Partial);
    }

    #[test]
    fn test_exit_outcome_failure_when_all_failed() {
        assert_eq!(determine_exit_outcome(0, 2), ProcessExit::Failure);
    }

    #[test]
    fn test_interrupted_report_fails() {
        let report = ExecutionReport {
            skipped: 4,
            interrupted: true,
            ..ExecutionReport::default()
        };
        assert_eq!(outcome_for_report(&report), ProcessExit::Failure);

        let report = ExecutionReport {
            skipped: 4,
            ..ExecutionReport::default()
        };
        assert_eq!(outcome_for_report(&report), ProcessExit::Success);
    }
}
