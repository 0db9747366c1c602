//! Schema tables for the ESPI resources.
//!
//! Each function returns the table for one payload element. Tables are built
//! once when the `ShapeRegistry` is created and reused for every document.

use crate::schema::{decoders, FieldSpec, Schema};

pub const APPLICATION_INFORMATION: &str = "ApplicationInformation";
pub const USAGE_POINT: &str = "UsagePoint";
pub const METER_READING: &str = "MeterReading";
pub const READING_TYPE: &str = "ReadingType";
pub const INTERVAL_BLOCK: &str = "IntervalBlock";
pub const LOCAL_TIME_PARAMETERS: &str = "LocalTimeParameters";
pub const ELECTRIC_POWER_USAGE_SUMMARY: &str = "ElectricPowerUsageSummary";
pub const ELECTRIC_POWER_QUALITY_SUMMARY: &str = "ElectricPowerQualitySummary";

/// Every shape in dispatch order.
#[must_use]
pub fn all() -> Vec<Schema> {
    vec![
        application_information(),
        usage_point(),
        meter_reading(),
        reading_type(),
        interval_block(),
        local_time_parameters(),
        electric_power_usage_summary(),
        electric_power_quality_summary(),
    ]
}

#[must_use]
pub fn application_information() -> Schema {
    Schema::new(
        APPLICATION_INFORMATION,
        vec![
            FieldSpec::text("dataCustodianApplicationStatus"),
            FieldSpec::text("thirdPartyNotifyUri"),
            FieldSpec::text("dataCustodianBulkRequestURI"),
            FieldSpec::text("dataCustodianResourceEndpoint"),
            FieldSpec::text("client_secret"),
            FieldSpec::text("contacts"),
            FieldSpec::text("token_endpoint_auth_method"),
            FieldSpec::scalar("grant_types", decoders::comma_list),
            FieldSpec::text("dataCustodianId"),
            FieldSpec::text("thirdPartyApplicationName"),
            FieldSpec::list("scope", decoders::pairs),
        ],
    )
}

#[must_use]
pub fn usage_point() -> Schema {
    Schema::new(
        USAGE_POINT,
        vec![
            FieldSpec::record(
                "ServiceCategory",
                Schema::record("ServiceCategory", vec![FieldSpec::text("kind")]),
            ),
            FieldSpec::record(
                "ServiceDeliveryPoint",
                Schema::record(
                    "ServiceDeliveryPoint",
                    vec![FieldSpec::text("name"), FieldSpec::text("trafficProfile")],
                ),
            ),
        ],
    )
}

/// Meter readings carry no payload fields; their content is reached via links.
#[must_use]
pub fn meter_reading() -> Schema {
    Schema::new(METER_READING, Vec::new())
}

#[must_use]
pub fn reading_type() -> Schema {
    Schema::new(
        READING_TYPE,
        [
            "accumulationBehaviour",
            "commodity",
            "currency",
            "dataQualifier",
            "flowDirection",
            "intervalLength",
            "kind",
            "phase",
            "powerOfTenMultiplier",
            "timeAttribute",
            "uom",
        ]
        .into_iter()
        .map(FieldSpec::text)
        .collect(),
    )
}

#[must_use]
pub fn interval_block() -> Schema {
    Schema::new(
        INTERVAL_BLOCK,
        vec![
            FieldSpec::records(
                "IntervalReading",
                Schema::record(
                    "IntervalReading",
                    vec![
                        FieldSpec::text("cost"),
                        FieldSpec::text("value"),
                        FieldSpec::scalar("timePeriod", decoders::interval),
                    ],
                ),
            ),
            FieldSpec::interval("interval"),
        ],
    )
}

#[must_use]
pub fn local_time_parameters() -> Schema {
    Schema::new(
        LOCAL_TIME_PARAMETERS,
        vec![
            FieldSpec::text("dstEndRule"),
            FieldSpec::text("dstOffset"),
            FieldSpec::text("dstStartRule"),
            FieldSpec::text("tzOffset"),
        ],
    )
}

#[must_use]
pub fn electric_power_usage_summary() -> Schema {
    Schema::new(
        ELECTRIC_POWER_USAGE_SUMMARY,
        vec![
            FieldSpec::text("billLastPeriod"),
            FieldSpec::text("billToDate"),
            FieldSpec::text("costAdditionalLastPeriod"),
            FieldSpec::text("currency"),
            FieldSpec::text("qualityOfReading"),
            FieldSpec::text("statusTimeStamp"),
            FieldSpec::interval("billingPeriod"),
            FieldSpec::record(
                "overallConsumptionLastPeriod",
                Schema::record(
                    "OverallConsumptionLastPeriod",
                    vec![
                        FieldSpec::text("powerOfTenMultiplier"),
                        FieldSpec::text("uom"),
                        FieldSpec::text("value"),
                    ],
                ),
            ),
            FieldSpec::record(
                "currentBillingPeriodOverAllConsumption",
                Schema::record(
                    "CurrentBillingPeriodOverAllConsumption",
                    vec![
                        FieldSpec::text("powerOfTenMultiplier"),
                        FieldSpec::text("timeStamp"),
                        FieldSpec::text("uom"),
                        FieldSpec::text("value"),
                    ],
                ),
            ),
        ],
    )
}

#[must_use]
pub fn electric_power_quality_summary() -> Schema {
    Schema::new(ELECTRIC_POWER_QUALITY_SUMMARY, Vec::new())
}
