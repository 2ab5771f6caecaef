use anyhow::Result;
use milkwizard::api::HttpAssistantApi;
use milkwizard::config::ClientConfig;
use milkwizard::session::ChatSession;
use milkwizard::{console, ui};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "milkwizard=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::load()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--list-devices") {
        list_devices();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--console") {
        info!("Starting Milk Wizard console client");
        return run_console(config);
    }

    info!("Starting Milk Wizard chat window");
    ui::run(config)
}

fn run_console(config: ClientConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let session = ChatSession::new(HttpAssistantApi::new(config.api.clone()), config.texts);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    runtime.block_on(async {
        console::print_banner(&session, &mut stdout).await?;
        console::run(&session, stdin.lock(), &mut stdout).await
    })?;
    Ok(())
}

#[cfg(feature = "audio-io")]
fn list_devices() {
    let devices = milkwizard::audio::list_input_devices();
    if devices.is_empty() {
        println!("No microphones found");
    }
    for device in devices {
        let marker = if device.is_default { " (default)" } else { "" };
        println!("{}{}", device.name, marker);
    }
}

#[cfg(not(feature = "audio-io"))]
fn list_devices() {
    println!("Built without microphone support");
}
