use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use divine_greetings::client::{ClientError, GreetingClient, ShareTarget};
use divine_greetings::config::setup_logging;
use divine_greetings::constants::DEFAULT_TEMPLATE_PATH;
use divine_greetings::greeting::GreetingSelection;
use tracing::{error, info};
use url::Url;

/// Make a greeting from the command line against a running server.
///
///   greet morning hindu ganesha peaceful --message "Happy Birthday Mom!"
#[derive(Parser, Debug)]
#[command(name = "greet")]
#[command(about = "Generate a divine greeting image through a running Divine Greetings server")]
struct Args {
    /// morning or night
    time_of_day: String,

    /// hindu, muslim, christian or sikh
    religion: String,

    /// Deity id within the tradition, e.g. ganesha, jesus, waheguru
    deity: String,

    /// motivational, peaceful, grateful or hopeful
    mood: String,

    /// Optional personal message
    #[arg(long)]
    message: Option<String>,

    /// Server to talk to
    #[arg(long, default_value = "http://localhost:9000", env = "DIVINE_SERVER")]
    server: String,

    /// Template image path as the server sees it
    #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
    template_path: String,

    /// Where to save the image
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print a shareable link once the image is ready
    #[arg(long)]
    share: bool,

    /// Enable debug logging
    #[arg(long, short)]
    debug: bool,
}

struct PrintShare;

impl ShareTarget for PrintShare {
    fn share(&self, url: &Url) -> Result<(), ClientError> {
        println!("Share this blessing: {}", url);
        Ok(())
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let selection = GreetingSelection::from_ids(
        &args.time_of_day,
        &args.religion,
        &args.deity,
        &args.mood,
        args.message.as_deref(),
    )
    .context("Invalid greeting choices")?;

    let mut client =
        GreetingClient::new(&args.server)?.with_template_path(&args.template_path);
    if args.share {
        client = client.with_share(Box::new(PrintShare));
    }

    let outcome = client
        .generate(&selection)
        .await
        .map_err(|err| anyhow::anyhow!(err.alert_message()))?;

    match client
        .download(&outcome, selection.time_of_day, &args.out_dir)
        .await?
    {
        Some(path) => println!("{}", path.display()),
        None => info!("The server did not return an image"),
    }
    if let Some(text) = &outcome.text {
        info!("Model note: {}", text);
    }
    if args.share {
        client.share(&outcome)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if setup_logging(args.debug).is_err() {
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
