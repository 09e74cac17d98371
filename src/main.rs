use anyhow::Result;
use clap::{Parser, Subcommand};

use research_assistant::web::{AppState, ResearchServer};
use research_assistant::{init_logging, Config, ResearchAssistant, ResearchRequest};

#[derive(Parser)]
#[command(name = "research-assistant", about = "Web search + LLM research reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every research step
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Overrides HOST
        #[arg(long)]
        host: Option<String>,
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Research a single topic and print the report
    Ask {
        /// The topic to research
        topic: String,
        /// brief, detailed or comprehensive
        #[arg(short, long, default_value = "brief")]
        depth: String,
        /// openai, gemini or anthropic (defaults to the first configured)
        #[arg(short, long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_logging(config.log_json, cli.verbose);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            let address = config.address();
            let assistant = ResearchAssistant::new(config)?;
            ResearchServer::new(address, AppState::new(assistant))
                .start()
                .await?;
        }
        Commands::Ask {
            topic,
            depth,
            provider,
        } => {
            let assistant = ResearchAssistant::new(config)?;
            let mut request = ResearchRequest::new(topic).with_depth(depth);
            request.model = provider;

            let report = assistant.research(&request).await?;
            println!("\n{}\n", report.result);
            for (i, source) in report.sources.iter().enumerate() {
                println!("[Source {}] {} - {}", i + 1, source.title, source.url);
            }
            println!("\n{}", report.run.summary());
        }
    }

    Ok(())
}
