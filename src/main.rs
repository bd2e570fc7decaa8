use anyhow::Context;
use clap::Parser;
use shipsgo_sync::config::Command;
use shipsgo_sync::domain::model::{ProjectRecord, TrackingMode};
use shipsgo_sync::domain::ports::RecordStore;
use shipsgo_sync::utils::error::ErrorSeverity;
use shipsgo_sync::utils::{logger, validation::Validate};
use shipsgo_sync::{
    Caller, CliConfig, Disposition, FileStore, ShipsGoError, ShipsGoService, TomlConfig,
};

type Service = ShipsGoService<FileStore, TomlConfig>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI args: {:?}", cli);

    let config = TomlConfig::from_file(&cli.config)
        .with_context(|| format!("failed to load config file '{}'", cli.config))?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let store = FileStore::new(config.store_path());
    tracing::debug!("📁 Using record store at {}", store.path().display());
    let service = ShipsGoService::new(store, config);

    if let Err(e) = run(&service, cli.command).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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

async fn run(service: &Service, command: Command) -> Result<(), ShipsGoError> {
    match command {
        Command::SaveProject {
            name,
            carrier,
            track_with,
            tracking_number,
        } => {
            // 保留既有的出貨結果欄位，只更新追蹤欄位
            let mut record = service
                .store()
                .get_project(&name)
                .await?
                .unwrap_or_else(|| ProjectRecord::new(&name));
            record.carrier = carrier.or(record.carrier);
            record.track_with = track_with.map(TrackingMode::from).or(record.track_with);
            record.tracking_number = tracking_number.or(record.tracking_number);

            service.save_project(record).await?;
            println!("✅ Project {} saved", name);
        }
        Command::CreateShipment { record_id, user } => {
            let outcome = service
                .create_shipment(&record_id, &Caller::user(user))
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);

            if outcome.status == Disposition::Failed {
                std::process::exit(1);
            }
            if outcome.status == Disposition::Retryable {
                std::process::exit(2);
            }
        }
        Command::SyncCarriers => {
            let report = service.fetch_carrier_list().await;
            println!(
                "📋 {} created, {} already present, {} skipped without SCAC",
                report.created, report.already_present, report.missing_scac
            );
        }
        Command::ShowProject { record_id } => {
            let record = service.project(&record_id).await?;
            print_project(&record);
        }
        Command::GetShipment { shipment_id, user } => {
            let shipment = service
                .get_shipment(&Caller::user(user), &shipment_id)
                .await?;
            println!("{}", serde_json::to_string_pretty(&shipment)?);
        }
        Command::TrackingLink => match service.tracking_link().await? {
            Some(link) => println!("{}", link),
            None => println!("No dashboard URL configured"),
        },
        Command::Tokens { viewer, roles } => {
            for row in service.settings_view(&viewer, &roles).await? {
                println!(
                    "{}\t{}\t{}",
                    row.user,
                    row.access_token,
                    if row.active { "active" } else { "inactive" }
                );
            }
        }
    }

    Ok(())
}

fn print_project(record: &ProjectRecord) {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();

    println!("Project:         {}", record.name);
    println!("Carrier:         {}", or_dash(record.carrier.as_deref()));
    println!(
        "Track With:      {}",
        or_dash(record.track_with.as_ref().map(|m| m.label()))
    );
    println!("Tracking Number: {}", or_dash(record.tracking_number.as_deref()));
    println!("Shipment ID:     {}", or_dash(record.shipment_id.as_deref()));
    println!(
        "Status:          {}",
        or_dash(record.shipment_status.map(|s| s.as_str()))
    );
    if !record.shipment_error.is_empty() {
        println!("Error:           {}", record.shipment_error);
    }
    if let Some(action) = record.next_action() {
        println!("Next action:     {}", action.label());
    }
}
