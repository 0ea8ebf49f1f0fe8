use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pkgsign_cli::commands::verify::{all_ok, run_verify, VerifyOptions};
use pkgsign_core::trust::TrustStore;

#[derive(Parser)]
#[command(name = "pkgsign", about = "Verify signed npm packages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a package directory or registry tarball
    Verify {
        /// Package directory or .tgz tarball to verify
        path: PathBuf,
        /// Expected package name (defaults to the manifest's declared name)
        #[arg(long)]
        package_name: Option<String>,
        /// Discover and verify every nested package under PATH
        #[arg(long)]
        all: bool,
        /// Never prompt to trust a signer
        #[arg(long)]
        non_interactive: bool,
        /// Trust store directory (defaults to ~/.pkgsign-trust-store)
        #[arg(long)]
        trust_store: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Verify {
            path,
            package_name,
            all,
            non_interactive,
            trust_store,
        } => {
            let trust = trust_store.map_or_else(TrustStore::open_default, TrustStore::at);
            let opts = VerifyOptions {
                package_name,
                all,
                non_interactive,
            };
            let results = run_verify(&path, &opts, &trust).await?;
            if !all_ok(&results, opts.non_interactive) {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
