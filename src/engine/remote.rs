use crate::domain::error::ProbeError;
use crate::domain::report::{AssertionResult, ControlReport, ControlSpec};
use crate::engine::HostInspector;

/// Operating system the host under test must run.
pub const EXPECTED_OS_NAME: &str = "ubuntu";

pub const OS_NAME_CONTROL: ControlSpec = ControlSpec {
    id: "os-name",
    title: "Verify host operating system",
    impact: 0.8,
};

pub const TEST_FILE_CONTROL: ControlSpec = ControlSpec {
    id: "test-file",
    title: "Verify existence of test files",
    impact: 0.5,
};

const NO_FILES_EXPECTED: &str = "test case is not expected to create files through cloud-init";

pub fn check_os_name(host: &dyn HostInspector) -> Result<ControlReport, ProbeError> {
    let expectation = format!("should eq {EXPECTED_OS_NAME}");
    let result = match host.os_name() {
        Ok(name) => {
            tracing::debug!(os_name = %name, "host operating system");
            let outcome = if name == EXPECTED_OS_NAME {
                Ok(())
            } else {
                Err(format!("expected `{EXPECTED_OS_NAME}`, got `{name}`"))
            };
            AssertionResult::from_outcome("os.name", expectation, outcome)
        }
        Err(error) if error.is_fatal() => return Err(error),
        Err(error) => AssertionResult::failed("os.name", expectation, error.to_string()),
    };
    Ok(ControlReport::evaluated(&OS_NAME_CONTROL, vec![result]))
}

/// Asserts every path exists. An empty list marks the control not applicable
/// and emits no assertions.
pub fn check_files(
    paths: &[String],
    host: &dyn HostInspector,
) -> Result<ControlReport, ProbeError> {
    if paths.is_empty() {
        tracing::debug!("no verify files supplied; skipping file checks");
        return Ok(ControlReport::skipped(&TEST_FILE_CONTROL, NO_FILES_EXPECTED));
    }

    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let subject = format!("file {path}");
        let result = match host.file_exists(path) {
            Ok(true) => AssertionResult::passed(subject, "should exist"),
            Ok(false) => AssertionResult::failed(subject, "should exist", "file does not exist"),
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                tracing::warn!(path = %path, %error, "file probe failed");
                AssertionResult::failed(subject, "should exist", error.to_string())
            }
        };
        results.push(result);
    }
    Ok(ControlReport::evaluated(&TEST_FILE_CONTROL, results))
}
