use crate::domain::error::ProbeError;
use crate::domain::instance::RUNNING_STATUS;
use crate::domain::report::{AssertionResult, ControlReport, ControlSpec};
use crate::domain::self_link::{SELF_LINK_SHAPE, SelfLink};
use crate::engine::ComputeInventory;

pub const STATUS_CONTROL: ControlSpec = ControlSpec {
    id: "status",
    title: "Verify compute instances are running",
    impact: 1.0,
};

const EXPECT_SELF_LINK: &str = "self-link identifies an instance";
const EXPECT_EXISTS: &str = "should exist";

fn expect_status() -> String {
    format!("status should cmp {RUNNING_STATUS}")
}

/// Evaluates existence and `RUNNING` status for every self-link, in order.
/// Only a fatal probe error stops the evaluation.
pub fn check_instances(
    self_links: &[String],
    inventory: &dyn ComputeInventory,
) -> Result<ControlReport, ProbeError> {
    if self_links.is_empty() {
        return Ok(ControlReport::skipped(&STATUS_CONTROL, "no self-links supplied"));
    }

    let mut results = Vec::with_capacity(self_links.len() * 2);
    for raw in self_links {
        results.extend(check_instance(raw, inventory)?);
    }
    Ok(ControlReport::evaluated(&STATUS_CONTROL, results))
}

fn check_instance(
    raw: &str,
    inventory: &dyn ComputeInventory,
) -> Result<Vec<AssertionResult>, ProbeError> {
    let link = match SelfLink::parse(raw) {
        Ok(link) => link,
        Err(error) => {
            tracing::warn!(self_link = raw, %error, "malformed self-link");
            return Ok(vec![AssertionResult::failed(
                raw,
                EXPECT_SELF_LINK,
                format!("{error}; expected {SELF_LINK_SHAPE}"),
            )]);
        }
    };

    tracing::debug!(
        project = %link.project,
        zone = %link.zone,
        name = %link.name,
        "querying compute instance"
    );
    let subject = link.to_string();
    let results = match inventory.get_instance(&link) {
        Ok(Some(record)) => {
            let status = if record.is_running() {
                Ok(())
            } else {
                Err(format!(
                    "expected status `{RUNNING_STATUS}`, got `{}`",
                    record.status
                ))
            };
            vec![
                AssertionResult::passed(&subject, EXPECT_EXISTS),
                AssertionResult::from_outcome(&subject, expect_status(), status),
            ]
        }
        Ok(None) => vec![
            AssertionResult::failed(&subject, EXPECT_EXISTS, "instance not found"),
            AssertionResult::failed(&subject, expect_status(), "instance not found"),
        ],
        Err(error) if error.is_fatal() => return Err(error),
        Err(error) => {
            tracing::warn!(instance = %subject, %error, "compute instance lookup failed");
            let message = error.to_string();
            vec![
                AssertionResult::failed(&subject, EXPECT_EXISTS, message.clone()),
                AssertionResult::failed(&subject, expect_status(), message),
            ]
        }
    };
    Ok(results)
}
