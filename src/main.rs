mod cli;

use std::path::Path;
use std::process::ExitCode;

use cli::Commands;
use figmage_lib::{
    Config, ExtractMode, Extractor, FigmaApiClient, FigmageError, SourceApi, DEFAULT_CONFIG_FILE,
};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();

    match args.command {
        Commands::Tokenize { only_new } => {
            run_tokenize(args.config.as_deref(), args.verbose, only_new).await
        }
    }
}

async fn run_tokenize(config_path: Option<&Path>, verbose: bool, only_new: bool) -> ExitCode {
    let config_path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => return fail(err),
    };

    let (access_token, file_id) = match read_credentials() {
        Ok(creds) => creds,
        Err(err) => return fail(err),
    };

    let client = match FigmaApiClient::new(&access_token, file_id) {
        Ok(client) => client.with_batch_size(config.batch_size),
        Err(err) => return fail(err),
    };

    if verbose {
        match client.fetch_latest_version().await {
            Ok(Some(version)) => eprintln!("Latest published version: {version}"),
            Ok(None) => {}
            Err(err) => eprintln!("warning: could not fetch file versions: {err}"),
        }
        eprintln!("Extracting design tokens ({} categories)…", config.tokens.len());
    }

    let mode = if only_new {
        ExtractMode::OnlyNew
    } else {
        ExtractMode::Full
    };
    let extractor = Extractor::new(&config, &client);
    let store = match extractor.extract(mode).await {
        Ok(store) => store,
        Err(err) => return fail(err),
    };

    let snapshot_path = config.snapshot_path();
    if let Err(err) = store.save_to_path(&snapshot_path) {
        return fail(err);
    }

    eprintln!("Design tokens saved to {}", snapshot_path.display());
    ExitCode::SUCCESS
}

fn read_credentials() -> Result<(String, String), FigmageError> {
    let access_token = std::env::var("FIGMA_ACCESS_TOKEN")
        .map_err(|_| FigmageError::config("FIGMA_ACCESS_TOKEN is not set"))?;
    let file_id = std::env::var("FIGMA_FILE_ID")
        .map_err(|_| FigmageError::config("FIGMA_FILE_ID is not set"))?;
    Ok((access_token, file_id))
}

fn fail(err: FigmageError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::FAILURE
}
