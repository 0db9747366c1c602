//! Field-level decode functions used in schema tables.
//!
//! Every decoder receives the matched element and the namespace registry and
//! returns a `Value`. None of them perform I/O or touch shared state.

use chrono::{DateTime, TimeDelta, Utc};
use roxmltree::Node;

use super::value::{Interval, Pairs, Value};
use crate::error::{GreenButtonError, Result};
use crate::namespace::Namespaces;
use crate::naming::parse_pairs;
use crate::xml::{find_child, get_tag_name, get_text};

/// Element text as-is.
pub fn text(node: Node<'_, '_>, _ns: &Namespaces) -> Result<Value> {
    Ok(Value::Text(get_text(node)))
}

/// Comma-separated element text (e.g. `grant_types`).
pub fn comma_list(node: Node<'_, '_>, _ns: &Namespaces) -> Result<Value> {
    let text = get_text(node);
    Ok(Value::TextList(
        text.split(',').map(|item| item.trim().to_string()).collect(),
    ))
}

/// `key=value;key=value` element text (e.g. an OAuth scope string).
pub fn pairs(node: Node<'_, '_>, _ns: &Namespaces) -> Result<Value> {
    Ok(Value::Pairs(Pairs(parse_pairs(&get_text(node)))))
}

/// Start/duration time span.
///
/// With both `<start>` and `<duration>` present, `start` is read as epoch
/// seconds and `duration` as whole seconds. If either is missing the texts
/// that exist are kept unconverted in `Interval::Raw`.
pub fn interval(node: Node<'_, '_>, ns: &Namespaces) -> Result<Value> {
    let espi = ns.espi_ns();
    let start = find_child(node, espi, "start").map(get_text);
    let duration = find_child(node, espi, "duration").map(get_text);

    let interval = match (start, duration) {
        (Some(start), Some(duration)) => Interval::Resolved {
            start: parse_epoch(&start, node)?,
            duration: parse_seconds(&duration, node)?,
        },
        (start, duration) => Interval::Raw { start, duration },
    };

    Ok(Value::Interval(interval))
}

fn invalid(node: Node<'_, '_>, part: &str, value: &str, reason: &str) -> GreenButtonError {
    GreenButtonError::InvalidValue {
        field: format!("{}/{part}", get_tag_name(node)),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_epoch(text: &str, node: Node<'_, '_>) -> Result<DateTime<Utc>> {
    let seconds: f64 = text
        .parse()
        .ok()
        .filter(|seconds: &f64| seconds.is_finite())
        .ok_or_else(|| invalid(node, "start", text, "expected epoch seconds"))?;

    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        .ok_or_else(|| invalid(node, "start", text, "timestamp out of range"))
}

fn parse_seconds(text: &str, node: Node<'_, '_>) -> Result<TimeDelta> {
    let seconds: i64 = text
        .parse()
        .map_err(|_| invalid(node, "duration", text, "expected whole seconds"))?;

    TimeDelta::try_seconds(seconds)
        .ok_or_else(|| invalid(node, "duration", text, "duration out of range"))
}
