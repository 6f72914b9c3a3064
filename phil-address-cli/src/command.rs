use crate::error::CliError;
use phil_address_client::{construct_address, AddressParts, PhilAddressClient, SearchOptions};
use serde_json::{Map, Value};

pub const USAGE: &str = "usage: phil-address <command>

commands:
  regions
  provinces <region-code>
  cities <province-code>
  barangays <city-code>
  search <query> [--fuzzy] [--limit N] [--no-regions] [--no-provinces] [--no-cities]
  address key=value...   (street, barangay, city, province, region, zipCode)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Regions,
    Provinces(String),
    Cities(String),
    Barangays(String),
    Search {
        query: String,
        fuzzy: bool,
        options: SearchOptions,
    },
    Address(AddressParts),
}

fn usage(message: impl Into<String>) -> CliError {
    CliError::Usage(message.into())
}

fn code_arg(mut args: impl Iterator<Item = String>, what: &str) -> Result<String, CliError> {
    args.next().ok_or_else(|| usage(format!("missing {}", what)))
}

impl Command {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let name = args.next().ok_or_else(|| usage("missing command"))?;

        match name.as_str() {
            "regions" => Ok(Command::Regions),
            "provinces" => Ok(Command::Provinces(code_arg(args, "region code")?)),
            "cities" => Ok(Command::Cities(code_arg(args, "province code")?)),
            "barangays" => Ok(Command::Barangays(code_arg(args, "city code")?)),
            "search" => Self::parse_search(args),
            "address" => Self::parse_address(args),
            other => Err(usage(format!("unknown command '{}'", other))),
        }
    }

    fn parse_search(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut query = Vec::new();
        let mut fuzzy = false;
        let mut options = SearchOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--fuzzy" => fuzzy = true,
                "--no-regions" => options = options.with_regions(false),
                "--no-provinces" => options = options.with_provinces(false),
                "--no-cities" => options = options.with_cities(false),
                "--limit" => {
                    let limit = args
                        .next()
                        .and_then(|value| value.parse().ok())
                        .ok_or_else(|| usage("--limit expects a number"))?;
                    options = options.with_limit(limit);
                }
                _ => query.push(arg),
            }
        }

        if query.is_empty() {
            return Err(usage("missing search query"));
        }
        Ok(Command::Search {
            query: query.join(" "),
            fuzzy,
            options,
        })
    }

    fn parse_address(args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut fields = Map::new();
        for arg in args {
            let (key, value) = arg
                .split_once('=')
                .ok_or_else(|| usage(format!("expected key=value, got '{}'", arg)))?;
            fields.insert(key.to_string(), Value::String(value.to_string()));
        }
        let parts = serde_json::from_value(Value::Object(fields))?;
        Ok(Command::Address(parts))
    }

    pub async fn run(&self, client: &PhilAddressClient) -> Result<Value, CliError> {
        let value = match self {
            Command::Regions => serde_json::to_value(client.regions().await)?,
            Command::Provinces(code) => serde_json::to_value(client.provinces(code).await)?,
            Command::Cities(code) => serde_json::to_value(client.cities(code).await)?,
            Command::Barangays(code) => serde_json::to_value(client.barangays(code).await)?,
            Command::Search {
                query,
                fuzzy: true,
                options,
            } => serde_json::to_value(client.fuzzy_search(query, options).await)?,
            Command::Search { query, options, .. } => {
                serde_json::to_value(client.search(query, options).await)?
            }
            Command::Address(parts) => Value::String(construct_address(parts)),
        };
        Ok(value)
    }
}
