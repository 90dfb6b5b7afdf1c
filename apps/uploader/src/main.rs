//! `apkshelf-upload`: publishes the APK store site to its FTP host.

use std::process::ExitCode;

use apkshelf_ftp::FtpTransport;
use apkshelf_site_sync::{SyncError, Synchronizer};
use apkshelf_uploader::{env, report};

/// Exit status after an interrupt (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    apkshelf_uploader::init_tracing();
    apkshelf_uploader::load_dotenv();

    println!("APK Distribution Site - FTP Uploader");
    println!("====================================\n");

    let config = match env::load_sync_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            eprintln!("\nYour .env file should contain:\n{}", env::ENV_HELP);
            return ExitCode::FAILURE;
        }
    };

    let mut sync = Synchronizer::new(config);

    let printer = sync.take_events().map(|mut events| {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if let Some(line) = report::progress_line(&event) {
                    println!("{line}");
                }
            }
        })
    });

    // First Ctrl-C stops after the current file; a second one aborts the
    // upload in flight.
    let cancel = sync.cancel_token();
    tokio::spawn(async move {
        if apkshelf_uploader::watch_interrupts(cancel, tokio::signal::ctrl_c).await {
            eprintln!("\nUpload aborted.");
            std::process::exit(i32::from(EXIT_INTERRUPTED));
        }
    });

    let transport = FtpTransport::new();
    let result = sync.run(&transport).await;

    // Dropping the synchronizer closes the event channel.
    drop(sync);
    if let Some(printer) = printer {
        let _ = printer.await;
    }

    match result {
        Ok(session) => {
            print!("{}", report::summary(&session));
            if session.interrupted {
                println!("\nUpload interrupted.");
                ExitCode::from(EXIT_INTERRUPTED)
            } else {
                println!("\nUpload completed.");
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("\nUpload failed: {e}");
            if let SyncError::Config(_) = e {
                eprintln!("\nYour .env file should contain:\n{}", env::ENV_HELP);
            }
            ExitCode::FAILURE
        }
    }
}
