use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(name = "autosherpa")]
#[command(about = "Dealership tools for the AutoSherpa assistant: valuation, EMI, FAQ and bookings")]
pub struct CliConfig {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BookingTarget {
    Service,
    TestDrive,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Estimate the resale value of a car
    Value {
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "0")]
        kms: u64,
        #[arg(long, default_value = "good")]
        condition: String,
        /// Print every intermediate figure
        #[arg(long)]
        explain: bool,
        /// Seed the market noise for a reproducible quote
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Structured quote from the valuation partner, falling back to the local estimate
    Quote {
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "0")]
        kms: u64,
        #[arg(long)]
        reg_no: Option<String>,
    },
    /// Monthly instalment for a car loan
    Emi {
        #[arg(long, conflicts_with = "model", required_unless_present = "model")]
        principal: Option<u64>,
        /// Use the catalog price of this model as the principal
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        rate: Option<f64>,
        #[arg(long)]
        months: Option<u32>,
    },
    /// Search the catalog
    Cars {
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        budget: Option<u64>,
    },
    /// Look up the FAQ knowledge base
    Faq {
        question: String,
        #[arg(long)]
        max: Option<usize>,
    },
    /// List bookable slots
    Slots {
        #[arg(value_enum)]
        target: BookingTarget,
        /// Start date, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
    },
    /// List service packages
    Packages,
    /// Book a test drive or service appointment
    Book {
        #[arg(value_enum)]
        target: BookingTarget,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        model: String,
        /// Slot, YYYY-MM-DD HH:MM
        #[arg(long)]
        slot: String,
        #[arg(long)]
        package: Option<String>,
    },
    /// List recorded bookings
    Bookings,
    /// Run a raw JSON tool call, e.g. '{"tool":"faq_lookup","question":"address"}'; "-" reads stdin
    Tool { json: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_command() {
        let cli = CliConfig::parse_from([
            "autosherpa", "value", "--model", "creta", "--year", "2019", "--kms", "42000",
        ]);
        match cli.command {
            Command::Value {
                model,
                year,
                kms,
                condition,
                explain,
                seed,
            } => {
                assert_eq!(model, "creta");
                assert_eq!(year, 2019);
                assert_eq!(kms, 42_000);
                assert_eq!(condition, "good");
                assert!(!explain);
                assert!(seed.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::parse_from(["autosherpa", "packages", "--verbose", "--log-format", "json"]);
        assert!(cli.verbose);
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn test_emi_requires_principal_or_model() {
        assert!(CliConfig::try_parse_from(["autosherpa", "emi"]).is_err());
        assert!(CliConfig::try_parse_from(["autosherpa", "emi", "--model", "nexon"]).is_ok());
        assert!(
            CliConfig::try_parse_from(["autosherpa", "emi", "--principal", "500000", "--model", "nexon"])
                .is_err()
        );
    }

    #[test]
    fn test_booking_target_names() {
        let cli = CliConfig::parse_from([
            "autosherpa", "book", "test-drive", "--phone", "919000000000", "--model", "nexon",
            "--slot", "2025-11-12 10:00",
        ]);
        assert!(matches!(
            cli.command,
            Command::Book {
                target: BookingTarget::TestDrive,
                ..
            }
        ));
    }
}
