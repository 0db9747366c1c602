//! Command-line interface for the Green Button client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::client::{Client, Resource};
use crate::config::{
    ClientConfig, DEFAULT_BASE_URL, ENV_ACCESS_TOKEN, ENV_BASE_URL, ENV_TIMEOUT_SECS,
    HTTP_TIMEOUT_SECS,
};
use crate::error::{GreenButtonError, Result};
use crate::output::{self, OutputFormat};
use crate::shapes;
use crate::transport::FileTransport;

/// Green Button - Decode and browse ESPI energy usage feeds.
#[derive(Parser)]
#[command(name = "greenbutton")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Data custodian base URL
    #[arg(long, global = true, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// OAuth2 bearer token
    #[arg(long, global = true, env = ENV_ACCESS_TOKEN, hide_env_values = true)]
    pub token: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT_SECS, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a saved XML document.
    Decode {
        /// Path to an Atom feed or entry
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Fetch a resource path and optionally follow its links.
    Fetch {
        /// Path below the base URL (e.g., /espi/1_1/resource/UsagePoint)
        path: String,

        /// Treat PATH as an absolute URL
        #[arg(long)]
        absolute: bool,

        /// Link key to follow after fetching; repeat to follow a chain
        #[arg(long = "follow", value_name = "KEY")]
        follow: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },

    /// Fetch a resource by its identifiers.
    Get {
        /// Resource to fetch
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Subscription identifier
        #[arg(long)]
        subscription: Option<String>,

        /// Usage point identifier
        #[arg(long)]
        usage_point: Option<String>,

        /// Meter reading identifier
        #[arg(long)]
        meter_reading: Option<String>,

        /// Interval block identifier
        #[arg(long)]
        interval_block: Option<String>,

        /// Identifier of the resource itself
        #[arg(long)]
        id: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

/// Resources addressable by `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    ApplicationInformation,
    UsagePoint,
    MeterReading,
    ReadingType,
    IntervalBlock,
    LocalTimeParameters,
    ElectricPowerUsageSummary,
    ElectricPowerQualitySummary,
}

const SUBSCRIPTION_ID: &str = "subscription_id";
const USAGE_POINT_ID: &str = "usage_point_id";
const METER_READING_ID: &str = "meter_reading_id";
const INTERVAL_BLOCK_ID: &str = "interval_block_id";
const ID: &str = "id";

impl ResourceKind {
    fn name(self) -> &'static str {
        match self {
            Self::ApplicationInformation => shapes::APPLICATION_INFORMATION,
            Self::UsagePoint => shapes::USAGE_POINT,
            Self::MeterReading => shapes::METER_READING,
            Self::ReadingType => shapes::READING_TYPE,
            Self::IntervalBlock => shapes::INTERVAL_BLOCK,
            Self::LocalTimeParameters => shapes::LOCAL_TIME_PARAMETERS,
            Self::ElectricPowerUsageSummary => shapes::ELECTRIC_POWER_USAGE_SUMMARY,
            Self::ElectricPowerQualitySummary => shapes::ELECTRIC_POWER_QUALITY_SUMMARY,
        }
    }

    /// Identifiers that address this resource.
    fn accepts(self) -> &'static [&'static str] {
        match self {
            Self::ApplicationInformation | Self::ReadingType | Self::LocalTimeParameters => &[ID],
            Self::UsagePoint
            | Self::ElectricPowerUsageSummary
            | Self::ElectricPowerQualitySummary => &[SUBSCRIPTION_ID, USAGE_POINT_ID, ID],
            Self::MeterReading => &[SUBSCRIPTION_ID, USAGE_POINT_ID, METER_READING_ID, ID],
            Self::IntervalBlock => &[
                SUBSCRIPTION_ID,
                USAGE_POINT_ID,
                METER_READING_ID,
                INTERVAL_BLOCK_ID,
                ID,
            ],
        }
    }

    /// Scope flag that doubles as the resource's own identifier.
    fn own_identifier(self) -> Option<&'static str> {
        match self {
            Self::UsagePoint => Some(USAGE_POINT_ID),
            Self::MeterReading => Some(METER_READING_ID),
            Self::IntervalBlock => Some(INTERVAL_BLOCK_ID),
            _ => None,
        }
    }
}

/// Identifiers given to `get`.
#[derive(Debug, Default)]
struct Identifiers {
    subscription: Option<String>,
    usage_point: Option<String>,
    meter_reading: Option<String>,
    interval_block: Option<String>,
    id: Option<String>,
}

impl Identifiers {
    fn given(&self) -> Vec<&'static str> {
        [
            (SUBSCRIPTION_ID, &self.subscription),
            (USAGE_POINT_ID, &self.usage_point),
            (METER_READING_ID, &self.meter_reading),
            (INTERVAL_BLOCK_ID, &self.interval_block),
            (ID, &self.id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(name, _)| name)
        .collect()
    }

    /// Reject identifiers the resource can't use, and `--id` given alongside
    /// the flag it would replace.
    fn check(&self, kind: ResourceKind) -> Result<()> {
        let given = self.given();
        let unused = given.iter().any(|name| !kind.accepts().contains(name));
        let conflicting = self.id.is_some()
            && kind
                .own_identifier()
                .is_some_and(|own| given.contains(&own));

        if unused || conflicting {
            return Err(GreenButtonError::InvalidParameterCombination {
                resource: kind.name(),
                given,
            });
        }
        Ok(())
    }
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute parsed arguments.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Decode { ref file, format } => decode_command(file, format),
        Commands::Fetch {
            ref path,
            absolute,
            ref follow,
            format,
        } => {
            let client = http_client(&cli)?;
            fetch_command(&client, path, absolute, follow, format)
        }
        Commands::Get {
            resource,
            ref subscription,
            ref usage_point,
            ref meter_reading,
            ref interval_block,
            ref id,
            format,
        } => {
            let client = http_client(&cli)?;
            let ids = Identifiers {
                subscription: subscription.clone(),
                usage_point: usage_point.clone(),
                meter_reading: meter_reading.clone(),
                interval_block: interval_block.clone(),
                id: id.clone(),
            };
            let resource = with_spinner(&format!("Fetching {resource:?}..."), || {
                get_resource(&client, resource, &ids)
            })?;
            print_resource(&resource, format)
        }
    }
}

fn http_client(cli: &Cli) -> Result<Client> {
    let token = cli.token.clone().ok_or_else(|| {
        GreenButtonError::Config(format!(
            "No access token: pass --token or set {ENV_ACCESS_TOKEN}"
        ))
    })?;
    let config =
        ClientConfig::new(&cli.base_url, token)?.with_timeout(Duration::from_secs(cli.timeout));
    Client::new(&config)
}

/// Decode a local file through the same pipeline used for fetched documents.
fn decode_command(file: &Path, format: OutputFormat) -> Result<()> {
    let location = file.display().to_string();
    let client = Client::with_transport(location.clone(), FileTransport::new(file));
    let resource = client.fetch_absolute(&location)?;
    print_resource(&resource, format)
}

fn fetch_command(
    client: &Client,
    path: &str,
    absolute: bool,
    follow: &[String],
    format: OutputFormat,
) -> Result<()> {
    let mut resource = with_spinner(&format!("Fetching {path}..."), || {
        if absolute {
            client.fetch_absolute(path)
        } else {
            client.fetch(path)
        }
    })?;

    for key in follow {
        resource = with_spinner(&format!("Following {key}..."), || {
            resource.follow(client, key)
        })?;
    }

    print_resource(&resource, format)
}

fn get_resource(client: &Client, kind: ResourceKind, ids: &Identifiers) -> Result<Resource> {
    ids.check(kind)?;

    let sub = ids.subscription.as_deref();
    let up = ids.usage_point.as_deref();
    let mr = ids.meter_reading.as_deref();
    let ib = ids.interval_block.as_deref();
    let id = ids.id.as_deref();

    match kind {
        ResourceKind::ApplicationInformation => client.application_information(id),
        ResourceKind::UsagePoint => client.usage_point(id.or(up), sub),
        ResourceKind::MeterReading => client.meter_reading(id.or(mr), up, sub),
        ResourceKind::ReadingType => client.reading_type(id),
        ResourceKind::IntervalBlock => client.interval_block(sub, up, mr, id.or(ib)),
        ResourceKind::LocalTimeParameters => client.local_time_parameters(id),
        ResourceKind::ElectricPowerUsageSummary => {
            let (sub, up) = required_scope(sub, up, kind.name())?;
            client.electric_power_usage_summary(sub, up, id)
        }
        ResourceKind::ElectricPowerQualitySummary => {
            let (sub, up) = required_scope(sub, up, kind.name())?;
            client.electric_power_quality_summary(sub, up, id)
        }
    }
}

fn required_scope<'a>(
    subscription: Option<&'a str>,
    usage_point: Option<&'a str>,
    resource: &'static str,
) -> Result<(&'a str, &'a str)> {
    match (subscription, usage_point) {
        (Some(sub), Some(up)) => Ok((sub, up)),
        (sub, up) => Err(GreenButtonError::InvalidParameterCombination {
            resource,
            given: [(SUBSCRIPTION_ID, sub.is_some()), (USAGE_POINT_ID, up.is_some())]
                .into_iter()
                .filter(|(_, present)| *present)
                .map(|(name, _)| name)
                .collect(),
        }),
    }
}

/// Run `task` behind a spinner, clearing it whatever the outcome.
fn with_spinner<T>(message: &str, task: impl FnOnce() -> Result<T>) -> Result<T> {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = task();
    pb.finish_and_clear();
    result
}

fn print_resource(resource: &Resource, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Text {
        let node = resource.node();
        let label = match resource {
            Resource::Entity(entity) => entity.shape,
            Resource::Feed(_) => "feed",
        };
        println!(
            "{} {}",
            style(label).cyan().bold(),
            style(node.title.as_deref().unwrap_or_default()).green()
        );
    }
    println!("{}", output::render(resource, format)?);
    Ok(())
}
