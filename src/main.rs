use clap::Parser;
use office_locator::core::GeolocationProvider;
use office_locator::utils::error::{ErrorSeverity, LocatorError};
use office_locator::utils::logger::{self, LogFormat};
use office_locator::utils::validation::Validate;
use office_locator::{
    CliConfig, DevicePositionProvider, IpLookupProvider, LocatorConfig, OfficeRegistry,
    OutputFormat, PageSession, PersonalizationResult, SessionOutcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let log_format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(cli.verbose, log_format);

    tracing::info!("Starting office-locator");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Personalization failed: {} (Category: {:?}, Severity: {:?})",
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

async fn run(cli: &CliConfig) -> Result<(), LocatorError> {
    cli.validate()?;

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            LocatorConfig::from_file(path)?
        }
        None => LocatorConfig::default(),
    };
    config.validate()?;

    let resolver = config.resolver()?;

    if cli.list_offices {
        print_offices(resolver.registry(), cli.format)?;
        return Ok(());
    }

    let provider = select_provider(cli, &config)?;
    let (session, _teardown) = PageSession::new(resolver);

    match session.run(provider.as_ref()).await? {
        SessionOutcome::Personalized(result) => print_result(&result, cli.format)?,
        SessionOutcome::Discarded => tracing::warn!("Session discarded before a result arrived"),
    }

    Ok(())
}

fn select_provider(
    cli: &CliConfig,
    config: &LocatorConfig,
) -> Result<Box<dyn GeolocationProvider>, LocatorError> {
    if let Some(coordinate) = cli.coordinate() {
        return Ok(Box::new(DevicePositionProvider::fixed(coordinate).configured(config)));
    }

    if cli.offline {
        tracing::info!("Offline mode, no location source available");
        return Ok(Box::new(DevicePositionProvider::unsupported()));
    }

    Ok(Box::new(IpLookupProvider::from_config(config)?))
}

fn print_offices(registry: &OfficeRegistry, format: OutputFormat) -> Result<(), LocatorError> {
    match format {
        OutputFormat::Json => {
            let offices: Vec<_> = registry.iter().map(|office| office.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&offices)?);
        }
        OutputFormat::Text => {
            println!("📋 Offices ({}):", registry.len());
            for office in registry.iter() {
                println!(
                    "  {} | {}, {} | {} | {} | ({}, {})",
                    office.id,
                    office.city,
                    office.state,
                    office.phone,
                    office.email,
                    office.latitude,
                    office.longitude
                );
            }
        }
    }
    Ok(())
}

fn print_result(result: &PersonalizationResult, format: OutputFormat) -> Result<(), LocatorError> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let d = &result.directives;
    match result.distance_km {
        Some(distance) => println!("📍 Nearest office: {} ({:.1} km)", d.city, distance),
        None => println!("📍 Nearest office: {} (default)", d.city),
    }
    println!("  Address: {}", result.office.address);
    println!("  Phone:   {} <{}>", d.phone.display, d.phone.tel_href);
    println!("  Email:   {} <{}>", d.email.address, d.email.mailto_href);

    if let Some(subtitle) = &d.hero_subtitle {
        println!("  Hero:    {}", subtitle);
    }
    if let Some(form) = &d.form_location {
        println!("  Form:    {} (placeholder \"{}\")", form.value, form.placeholder);
    }
    if let Some(meta) = &d.meta_user_location {
        println!("  Meta:    user-location = {}", meta);
    }
    if let Some(projects) = &d.local_projects {
        println!("  {} ({}):", projects.title, projects.count);
        for project in &projects.projects {
            println!("    🏗️ {}", project);
        }
    }
    if let Some(tracking) = &d.tracking {
        println!("  Analytics event: {}", tracking.event.name);
    }

    Ok(())
}
