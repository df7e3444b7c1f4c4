use anyhow::{Context, Result};
use route_gateway::config::{Config, Mode, OutputFormat};
use route_gateway::routes::lookup::RouteEngine;
use route_gateway::routes::parser;
use route_gateway::{DefaultRoute, DefaultRouteResolver, RouteError, RouteRecord};

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("route-gateway: {:#}", e);
            std::process::exit(2);
        }
    };

    // Initialize logging; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .init();
    if let Some(path) = &config.config_path {
        tracing::info!("Loaded configuration from: {}", path.display());
    }
    tracing::debug!("Configuration: {:?}", config);

    if let Err(e) = run(&config) {
        match e.downcast_ref::<RouteError>() {
            Some(route_err) => {
                tracing::error!("{}", route_err);
                eprintln!("route-gateway: {}", route_err.user_message());
            }
            None => eprintln!("route-gateway: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    match config.mode {
        Mode::DefaultRoute => {
            let resolver = DefaultRouteResolver::new(&config.table_path, config.selection);
            let route = resolver.resolve()?.with_context(|| {
                format!("no default route in {}", config.table_path.display())
            })?;
            print_default_route(&route, config.format)
        }
        Mode::Table => {
            let table = parser::read_route_table(&config.table_path)?;
            match config.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
                OutputFormat::Text => {
                    for route in &table.routes {
                        println!("{}", route);
                    }
                }
            }
            Ok(())
        }
        Mode::Lookup(dest) => {
            let table = parser::read_route_table(&config.table_path)?;
            let route = RouteEngine::new(&table.routes)
                .lookup(dest)
                .with_context(|| format!("no route to host {}", dest))?;
            print_record(route, config.format)
        }
    }
}

fn print_default_route(route: &DefaultRoute, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", route),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(route)?),
    }
    Ok(())
}

fn print_record(route: &RouteRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{}", route),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(route)?),
    }
    Ok(())
}
