//! Human-readable rendering of decoded documents.
//!
//! One ` --label: value` line per header field and schema field, links
//! listed under ` --links:`, and each nested entity separated by a rule and
//! indented one tab.

use std::fmt::{self, Display, Formatter};

use crate::client::Resource;
use crate::document::{DocumentNode, Entity};
use crate::schema::{Field, Fields, Interval, Pairs, Record, Value};

const UNSET: &str = "None";
const RULE: &str = "---------";

fn write_optional(f: &mut Formatter<'_>, label: &str, value: Option<&str>) -> fmt::Result {
    writeln!(f, " --{label}: {}", value.unwrap_or(UNSET))
}

/// Header lines and links, without nested elements.
fn write_header(f: &mut Formatter<'_>, node: &DocumentNode) -> fmt::Result {
    writeln!(f, " --element_type: {}", node.element_type)?;
    write_optional(f, "id", node.id.as_deref())?;
    write_optional(f, "title", node.title.as_deref())?;
    write_optional(f, "updated", node.updated.as_deref())?;
    write!(f, " --links:")?;
    for (key, href) in node.links.iter() {
        write!(f, "\n\t--{key}: {href}")?;
    }
    Ok(())
}

fn write_fields(f: &mut Formatter<'_>, fields: &Fields) -> fmt::Result {
    for (name, field) in fields.iter() {
        write!(f, "\n --{name}: {field}")?;
    }
    Ok(())
}

impl Display for DocumentNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, self)?;
        for element in &self.elements {
            let nested = element.to_string().replace('\n', "\n\t");
            write!(f, "\n{RULE}\n\t{nested}")?;
        }
        Ok(())
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, &self.node)?;
        write_fields(f, &self.fields)
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(entity) => entity.fmt(f),
            Self::Feed(feed) => feed.fmt(f),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(Some(value)) => value.fmt(f),
            Self::Scalar(None) => f.write_str(UNSET),
            Self::List(values) => {
                let items: Vec<String> = values.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::TextList(items) => write!(f, "[{}]", items.join(", ")),
            Self::Pairs(pairs) => pairs.fmt(f),
            Self::Record(record) => record.fmt(f),
            Self::Interval(interval) => interval.fmt(f),
        }
    }
}

impl Display for Pairs {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", items.join("; "))
    }
}

/// Records render one indented `name:<tab>value` line per field.
impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (name, field) in self.fields.iter() {
            write!(f, "\n\t\t{name}:\t{field}")?;
        }
        Ok(())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { start, duration } => {
                write!(f, "{} for {}s", start.to_rfc3339(), duration.num_seconds())
            }
            Self::Raw { start, duration } => write!(
                f,
                "start={} duration={}",
                start.as_deref().unwrap_or(UNSET),
                duration.as_deref().unwrap_or(UNSET)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Decoder;
    use chrono::{DateTime, TimeDelta};
    use pretty_assertions::assert_eq;

    const FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:espi="http://naesb.org/espi">
  <id>urn:uuid:feed</id>
  <link href="https://x/espi/1_1/resource/Subscription/5/UsagePoint" rel="self"/>
  <entry>
    <id>urn:uuid:up1</id>
    <link href="https://x/espi/1_1/resource/Subscription/5/UsagePoint/1" rel="self"/>
    <link href="https://x/espi/1_1/resource/Subscription/5/UsagePoint/1/MeterReading" rel="related"/>
    <title>Front Meter</title>
    <content>
      <espi:UsagePoint>
        <espi:ServiceCategory><espi:kind>0</espi:kind></espi:ServiceCategory>
      </espi:UsagePoint>
    </content>
  </entry>
</feed>"#;

    #[test]
    fn test_render_feed() {
        let node = Decoder::espi().decode_str(FEED).unwrap();
        let expected = [
            " --element_type: feed",
            " --id: urn:uuid:feed",
            " --title: None",
            " --updated: None",
            " --links:",
            "\t--self: https://x/espi/1_1/resource/Subscription/5/UsagePoint",
            "---------",
            "\t --element_type: UsagePoint",
            "\t --id: urn:uuid:up1",
            "\t --title: Front Meter",
            "\t --updated: None",
            "\t --links:",
            "\t\t--self: https://x/espi/1_1/resource/Subscription/5/UsagePoint/1",
            "\t\t--meter_reading: https://x/espi/1_1/resource/Subscription/5/UsagePoint/1/MeterReading",
            "\t --service_category: ",
            "\t\t\tkind:\t0",
            "\t --service_delivery_point: None",
        ]
        .join("\n");
        assert_eq!(node.to_string(), expected);
    }

    #[test]
    fn test_render_interval() {
        let resolved = Interval::Resolved {
            start: DateTime::from_timestamp(0, 0).unwrap(),
            duration: TimeDelta::try_seconds(3600).unwrap(),
        };
        assert_eq!(resolved.to_string(), "1970-01-01T00:00:00+00:00 for 3600s");

        let raw = Interval::Raw {
            start: None,
            duration: Some("900".to_string()),
        };
        assert_eq!(raw.to_string(), "start=None duration=900");
    }

    #[test]
    fn test_render_values() {
        assert_eq!(
            Value::TextList(vec!["a".to_string(), "b".to_string()]).to_string(),
            "[a, b]"
        );
        let pairs = Pairs(vec![
            ("FB".to_string(), "1_3".to_string()),
            ("IntervalDuration".to_string(), "3600".to_string()),
        ]);
        assert_eq!(pairs.to_string(), "{FB=1_3; IntervalDuration=3600}");
        assert_eq!(Field::Scalar(None).to_string(), "None");
        assert_eq!(Field::List(vec![]).to_string(), "[]");
    }
}
