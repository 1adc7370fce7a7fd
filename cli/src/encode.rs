use std::fs;
use std::path::PathBuf;

use clap::Args;
use pem::ToPem;
use pkcs::{RSAPublicKey, SubjectPublicKeyInfo};
use tracing::info;

use crate::error::Result;
use crate::store::StoreArgs;
use crate::utils::write_creating_dirs;

#[derive(Args)]
pub(crate) struct Config {
    /// Modulus as base64 of its big-endian bytes
    modulus: String,

    /// Public exponent as base64 of its big-endian bytes
    exponent: String,

    /// Path to the output PEM file. If not specified, writes to stdout
    #[arg(conflicts_with = "store")]
    output: Option<PathBuf>,

    #[command(flatten)]
    key_store: StoreArgs,
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let key = RSAPublicKey::from_base64(&config.modulus, &config.exponent)?;
    info!(bits = key.key_size(), "decoded RSA public key");

    let pem = SubjectPublicKeyInfo::from_rsa(&key).to_pem()?.to_string();

    let path = match (config.output, config.key_store.location()?) {
        (Some(path), _) => {
            fs::write(&path, &pem)?;
            path
        }
        (None, Some(location)) => {
            let path = location.path();
            write_creating_dirs(&path, &pem)?;
            path
        }
        (None, None) => {
            print!("{pem}");
            return Ok(());
        }
    };
    info!(path = %path.display(), "written to file");

    Ok(())
}
