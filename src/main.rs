use accremote::cli::{Cli, Command};
use accremote::frontend::{self, Console};
use accremote::{init_logging, list_ports, SessionManager, BUILD_DATE, VERSION};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.json_logs)?;
    tracing::info!("accremote {} (built {})", VERSION, BUILD_DATE);

    let config = cli.load_config()?;

    match cli.command() {
        Command::Ports => {
            for port in list_ports()? {
                println!("{:<24} {}", port.port_name, port.description);
            }
            Ok(())
        }
        Command::Run { connect } => {
            let mut session = SessionManager::serial(&config);
            if connect {
                session.connect_default();
            }
            let console = Console::new(session, std::io::stdout());

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(frontend::run(console, config.console.tick_interval()))
        }
    }
}
