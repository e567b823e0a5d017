use log::{error, info};
use skywatch_runner::config::{self, SkywatchConfig};
use skywatch_runner::{DashboardBootstrap, DashboardView, RunnerError};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// `skywatch [CONFIG] [--toggle]`
fn parse_args() -> Result<(SkywatchConfig, bool), RunnerError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let toggle = args.iter().any(|arg| arg == "--toggle");
    let config = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            config::load_config(path)?
        }
        None => config::load_default_config()?,
    };
    Ok((config, toggle))
}

async fn run() -> Result<(), RunnerError> {
    let (config, toggle) = parse_args()?;
    info!("Starting Skywatch dashboard...");

    let mut dashboard = DashboardBootstrap::start(config)?;
    let mut view = dashboard.new_view();

    // A failed read never answers; the switch then shows off
    let (power_tx, power_rx) = tokio::sync::oneshot::channel();
    dashboard.view.request_initial_actuator_state(move |on| {
        let _ = power_tx.send(on);
    });
    view.set_power(power_rx.await.unwrap_or(false));
    if toggle {
        let on = dashboard.view.toggle_actuator().await??;
        view.set_power(on);
    }

    let mut current = dashboard.view.current_conditions();
    let mut forecast = dashboard.view.forecast_samples();
    view.set_current(current.borrow_and_update().clone());
    view.set_forecast(&forecast.borrow_and_update());
    render(&view);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = current.changed() => {
                if changed.is_err() {
                    break;
                }
                view.set_current(current.borrow_and_update().clone());
            }
            changed = forecast.changed() => {
                if changed.is_err() {
                    break;
                }
                view.set_forecast(&forecast.borrow_and_update());
            }
        }
        render(&view);
    }

    info!("Shutting down");
    dashboard.shutdown();
    Ok(())
}

fn render(view: &DashboardView) {
    println!("----------------------------------------");
    for line in view.render() {
        println!("{}", line);
    }
}
