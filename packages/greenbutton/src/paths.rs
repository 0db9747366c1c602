//! Resource path builders.
//!
//! Each builder maps the identifiers a caller supplied onto one of the path
//! layouts the data custodian serves. Combinations that have no layout are
//! rejected instead of producing a malformed path.

use crate::config::API_PREFIX;
use crate::error::{GreenButtonError, Result};
use crate::shapes::{
    APPLICATION_INFORMATION, ELECTRIC_POWER_QUALITY_SUMMARY, ELECTRIC_POWER_USAGE_SUMMARY,
    INTERVAL_BLOCK, LOCAL_TIME_PARAMETERS, METER_READING, READING_TYPE, USAGE_POINT,
};

const SUBSCRIPTION: &str = "Subscription";

/// Join path segments under the API prefix.
fn resource_path(segments: &[&str]) -> String {
    let mut path = API_PREFIX.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// `/{Resource}` or `/{Resource}/{id}`.
fn collection_or_item(resource: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => resource_path(&[resource, id]),
        None => resource_path(&[resource]),
    }
}

fn unsupported(resource: &'static str, given: &[(&'static str, bool)]) -> GreenButtonError {
    GreenButtonError::InvalidParameterCombination {
        resource,
        given: given
            .iter()
            .filter(|(_, present)| *present)
            .map(|(name, _)| *name)
            .collect(),
    }
}

/// # Examples
/// ```
/// use greenbutton::paths::application_information;
///
/// assert_eq!(application_information(None), "/espi/1_1/resource/ApplicationInformation");
/// assert_eq!(application_information(Some("1")), "/espi/1_1/resource/ApplicationInformation/1");
/// ```
#[must_use]
pub fn application_information(application_information_id: Option<&str>) -> String {
    collection_or_item(APPLICATION_INFORMATION, application_information_id)
}

/// Usage points, optionally scoped under a subscription. Every combination
/// is addressable.
#[must_use]
pub fn usage_point(usage_point_id: Option<&str>, subscription_id: Option<&str>) -> String {
    match (subscription_id, usage_point_id) {
        (Some(sub), Some(up)) => resource_path(&[SUBSCRIPTION, sub, USAGE_POINT, up]),
        (Some(sub), None) => resource_path(&[SUBSCRIPTION, sub, USAGE_POINT]),
        (None, up) => collection_or_item(USAGE_POINT, up),
    }
}

#[must_use]
pub fn reading_type(reading_type_id: Option<&str>) -> String {
    collection_or_item(READING_TYPE, reading_type_id)
}

#[must_use]
pub fn local_time_parameters(local_time_parameters_id: Option<&str>) -> String {
    collection_or_item(LOCAL_TIME_PARAMETERS, local_time_parameters_id)
}

/// Meter readings: unscoped, or scoped under subscription and usage point.
///
/// # Errors
/// A subscription without a usage point (or the reverse) has no layout.
pub fn meter_reading(
    meter_reading_id: Option<&str>,
    usage_point_id: Option<&str>,
    subscription_id: Option<&str>,
) -> Result<String> {
    match (subscription_id, usage_point_id, meter_reading_id) {
        (None, None, mr) => Ok(collection_or_item(METER_READING, mr)),
        (Some(sub), Some(up), None) => {
            Ok(resource_path(&[SUBSCRIPTION, sub, USAGE_POINT, up, METER_READING]))
        }
        (Some(sub), Some(up), Some(mr)) => Ok(resource_path(&[
            SUBSCRIPTION,
            sub,
            USAGE_POINT,
            up,
            METER_READING,
            mr,
        ])),
        (sub, up, mr) => Err(unsupported(
            METER_READING,
            &[
                ("meter_reading_id", mr.is_some()),
                ("usage_point_id", up.is_some()),
                ("subscription_id", sub.is_some()),
            ],
        )),
    }
}

/// Interval blocks: unscoped, or fully scoped under subscription, usage point
/// and meter reading.
///
/// # Errors
/// Partial scoping has no layout.
pub fn interval_block(
    subscription_id: Option<&str>,
    usage_point_id: Option<&str>,
    meter_reading_id: Option<&str>,
    interval_block_id: Option<&str>,
) -> Result<String> {
    match (subscription_id, usage_point_id, meter_reading_id, interval_block_id) {
        (None, None, None, ib) => Ok(collection_or_item(INTERVAL_BLOCK, ib)),
        (Some(sub), Some(up), Some(mr), None) => Ok(resource_path(&[
            SUBSCRIPTION,
            sub,
            USAGE_POINT,
            up,
            METER_READING,
            mr,
            INTERVAL_BLOCK,
        ])),
        (Some(sub), Some(up), Some(mr), Some(ib)) => Ok(resource_path(&[
            SUBSCRIPTION,
            sub,
            USAGE_POINT,
            up,
            METER_READING,
            mr,
            INTERVAL_BLOCK,
            ib,
        ])),
        (sub, up, mr, ib) => Err(unsupported(
            INTERVAL_BLOCK,
            &[
                ("subscription_id", sub.is_some()),
                ("usage_point_id", up.is_some()),
                ("meter_reading_id", mr.is_some()),
                ("interval_block_id", ib.is_some()),
            ],
        )),
    }
}

fn usage_point_scoped(
    resource: &str,
    subscription_id: &str,
    usage_point_id: &str,
    id: Option<&str>,
) -> String {
    let mut segments = vec![SUBSCRIPTION, subscription_id, USAGE_POINT, usage_point_id, resource];
    segments.extend(id);
    resource_path(&segments)
}

#[must_use]
pub fn electric_power_usage_summary(
    subscription_id: &str,
    usage_point_id: &str,
    electric_power_usage_summary_id: Option<&str>,
) -> String {
    usage_point_scoped(
        ELECTRIC_POWER_USAGE_SUMMARY,
        subscription_id,
        usage_point_id,
        electric_power_usage_summary_id,
    )
}

#[must_use]
pub fn electric_power_quality_summary(
    subscription_id: &str,
    usage_point_id: &str,
    electric_power_quality_summary_id: Option<&str>,
) -> String {
    usage_point_scoped(
        ELECTRIC_POWER_QUALITY_SUMMARY,
        subscription_id,
        usage_point_id,
        electric_power_quality_summary_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_usage_point_all_combinations() {
        assert_eq!(usage_point(None, None), "/espi/1_1/resource/UsagePoint");
        assert_eq!(usage_point(Some("1"), None), "/espi/1_1/resource/UsagePoint/1");
        assert_eq!(
            usage_point(None, Some("5")),
            "/espi/1_1/resource/Subscription/5/UsagePoint"
        );
        assert_eq!(
            usage_point(Some("1"), Some("5")),
            "/espi/1_1/resource/Subscription/5/UsagePoint/1"
        );
    }

    #[test]
    fn test_simple_collections() {
        assert_eq!(reading_type(None), "/espi/1_1/resource/ReadingType");
        assert_eq!(reading_type(Some("3")), "/espi/1_1/resource/ReadingType/3");
        assert_eq!(
            local_time_parameters(Some("01")),
            "/espi/1_1/resource/LocalTimeParameters/01"
        );
    }

    #[test]
    fn test_meter_reading_valid() {
        assert_eq!(
            meter_reading(None, None, None).unwrap(),
            "/espi/1_1/resource/MeterReading"
        );
        assert_eq!(
            meter_reading(Some("1"), None, None).unwrap(),
            "/espi/1_1/resource/MeterReading/1"
        );
        assert_eq!(
            meter_reading(None, Some("1"), Some("5")).unwrap(),
            "/espi/1_1/resource/Subscription/5/UsagePoint/1/MeterReading"
        );
        assert_eq!(
            meter_reading(Some("2"), Some("1"), Some("5")).unwrap(),
            "/espi/1_1/resource/Subscription/5/UsagePoint/1/MeterReading/2"
        );
    }

    #[test]
    fn test_meter_reading_invalid() {
        let err = meter_reading(None, None, Some("5")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported identifier combination for MeterReading: subscription_id"
        );
        assert!(meter_reading(Some("1"), Some("1"), None).is_err());
        assert!(meter_reading(None, Some("1"), None).is_err());
    }

    #[test]
    fn test_interval_block_valid() {
        assert_eq!(
            interval_block(None, None, None, None).unwrap(),
            "/espi/1_1/resource/IntervalBlock"
        );
        assert_eq!(
            interval_block(None, None, None, Some("1")).unwrap(),
            "/espi/1_1/resource/IntervalBlock/1"
        );
        assert_eq!(
            interval_block(Some("1"), Some("1"), Some("1"), None).unwrap(),
            "/espi/1_1/resource/Subscription/1/UsagePoint/1/MeterReading/1/IntervalBlock"
        );
        assert_eq!(
            interval_block(Some("1"), Some("2"), Some("3"), Some("4")).unwrap(),
            "/espi/1_1/resource/Subscription/1/UsagePoint/2/MeterReading/3/IntervalBlock/4"
        );
    }

    #[test]
    fn test_interval_block_partial_scope_rejected() {
        let err = interval_block(Some("1"), Some("1"), None, None).unwrap_err();
        match err {
            GreenButtonError::InvalidParameterCombination { resource, given } => {
                assert_eq!(resource, "IntervalBlock");
                assert_eq!(given, vec!["subscription_id", "usage_point_id"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(interval_block(Some("1"), None, None, None).is_err());
        assert!(interval_block(None, Some("1"), Some("1"), Some("1")).is_err());
    }

    #[test]
    fn test_summaries() {
        assert_eq!(
            electric_power_usage_summary("5", "1", None),
            "/espi/1_1/resource/Subscription/5/UsagePoint/1/ElectricPowerUsageSummary"
        );
        assert_eq!(
            electric_power_quality_summary("5", "1", Some("1")),
            "/espi/1_1/resource/Subscription/5/UsagePoint/1/ElectricPowerQualitySummary/1"
        );
    }
}
