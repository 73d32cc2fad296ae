use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    #[clap(help = "Country name to look up once; starts the interactive prompt when omitted")]
    name: Vec<String>,
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,
    #[clap(short = 'e', long, help = "Country API base URL")]
    endpoint: Option<String>,
    #[clap(
        short = 'd',
        long = "delay",
        name = "DELAY_MS",
        help = "Quiet period in milliseconds before a typed name is looked up"
    )]
    delay_ms: Option<u64>,
    #[clap(
        short = 't',
        long = "timeout",
        name = "TIMEOUT_MS",
        help = "Request timeout in milliseconds"
    )]
    timeout_ms: Option<u64>,
    #[clap(short = 'o', long, help = "HTML page to mirror the display regions into")]
    page: Option<PathBuf>,
    #[clap(short = 'r', long, help = "CA certificate PEM file path")]
    ca_cert: Option<String>,
    #[clap(
        short = 'k',
        long,
        help = "Allow insecure server connections when using SSL"
    )]
    insecure: bool,
    #[clap(
        short = 'H',
        long = "header",
        name = "KEY: VALUE",
        value_parser = parse_header,
        help = "HTTP header to send with every lookup"
    )]
    headers: Vec<(String, String)>,
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("Invalid header format: {s} (expected 'Key: Value')")),
    }
}

#[derive(Debug)]
pub struct CommandLineArgs {
    name: Option<String>,
    profile: String,
    endpoint: Option<String>,
    delay_ms: Option<u64>,
    timeout_ms: Option<u64>,
    page: Option<PathBuf>,
    ca_cert: Option<String>,
    insecure: bool,
    headers: HashMap<String, String>,
    verbose: bool,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        let name = if args.name.is_empty() {
            None
        } else {
            Some(args.name.join(" "))
        };
        Self {
            name,
            profile: args.profile,
            endpoint: args.endpoint,
            delay_ms: args.delay_ms,
            timeout_ms: args.timeout_ms,
            page: args.page,
            ca_cert: args.ca_cert,
            insecure: args.insecure,
            headers: args.headers.into_iter().collect(),
            verbose: args.verbose,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    #[allow(dead_code)]
    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    /// The one-shot lookup name, words joined by single spaces.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn endpoint(&self) -> Option<&String> {
        self.endpoint.as_ref()
    }

    pub fn delay_ms(&self) -> Option<u64> {
        self.delay_ms
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    pub fn page(&self) -> Option<&PathBuf> {
        self.page.as_ref()
    }

    pub fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
