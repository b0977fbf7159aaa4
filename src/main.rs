use autosherpa::app::{build_toolkit, market_noise};
use autosherpa::config::cli::{BookingTarget, Command, LogFormat};
use autosherpa::core::finance::emi_plan;
use autosherpa::domain::model::{Condition, PartnerRequest, ValuationRequest};
use autosherpa::utils::error::ErrorSeverity;
use autosherpa::utils::{logger, validation::Validate};
use autosherpa::{AppConfig, CliConfig, LocalStorage, SherpaError, Toolkit};
use clap::Parser;
use serde::Serialize;
use std::io::Read;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::debug!("CLI arguments: {:?}", cli);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match AppConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => AppConfig::default(),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let seed = match &cli.command {
        Command::Value { seed, .. } => *seed,
        _ => None,
    };

    let outcome = match build_toolkit(&config, market_noise(seed)) {
        Ok(toolkit) => run(&toolkit, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(toolkit: &Toolkit<LocalStorage>, command: Command) -> autosherpa::Result<()> {
    match command {
        Command::Value {
            model,
            year,
            kms,
            condition,
            explain,
            seed: _,
        } => {
            let request = ValuationRequest {
                model,
                year,
                kms,
                condition: Condition::from_tag(&condition),
            };
            if explain {
                print_json(&toolkit.estimator().breakdown(&request))
            } else {
                print_json(&toolkit.estimator().estimate(&request))
            }
        }
        Command::Quote {
            model,
            year,
            kms,
            reg_no,
        } => {
            let request = PartnerRequest {
                model,
                year,
                kms,
                reg_no,
            };
            if !toolkit.quotes().has_partner() {
                tracing::info!("No valuation partner configured; using local heuristic");
            }
            print_json(&toolkit.quotes().quote(&request).await)
        }
        Command::Emi {
            principal,
            model,
            rate,
            months,
        } => {
            let principal = match (principal, model) {
                (Some(principal), _) => principal,
                (None, Some(model)) => toolkit.principal_for_model(&model)?,
                (None, None) => {
                    return Err(SherpaError::validation("either --principal or --model is required"))
                }
            };
            let defaults = toolkit.defaults();
            let plan = emi_plan(
                principal,
                rate.unwrap_or(defaults.annual_rate_percent),
                months.unwrap_or(defaults.tenure_months),
            )?;
            print_json(&plan)
        }
        Command::Cars { brand, budget } => {
            print_json(&toolkit.catalog().search(brand.as_deref(), budget))
        }
        Command::Faq { question, max } => {
            let max = max.unwrap_or(toolkit.defaults().faq_max_results);
            println!("{}", toolkit.faq().answer(&question, max));
            Ok(())
        }
        Command::Slots { target, date } => {
            let plan = match target {
                BookingTarget::Service => &toolkit.defaults().service_slots,
                BookingTarget::TestDrive => &toolkit.defaults().test_drive_slots,
            };
            print_json(&plan.available_slots(date.as_deref()))
        }
        Command::Packages => print_json(&toolkit.ledger().packages()),
        Command::Book {
            target,
            phone,
            model,
            slot,
            package,
        } => {
            let booking = match target {
                BookingTarget::TestDrive => {
                    if package.is_some() {
                        tracing::warn!("⚠️ --package is ignored for test drives");
                    }
                    toolkit.ledger().book_test_drive(&phone, &model, &slot).await?
                }
                BookingTarget::Service => {
                    toolkit
                        .ledger()
                        .book_service(&phone, &model, &slot, package.as_deref())
                        .await?
                }
            };
            tracing::info!("✅ Booking #{} confirmed", booking.id);
            print_json(&booking)
        }
        Command::Bookings => print_json(&toolkit.ledger().list().await?),
        Command::Tool { json } => {
            let raw = if json == "-" {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else {
                json
            };
            print_json(&toolkit.invoke_json(&raw).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> autosherpa::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
