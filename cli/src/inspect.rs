use std::fmt::Write;
use std::path::PathBuf;

use asn1::Integer;
use clap::Args;
use pem::Pem;
use pkcs::RSAPublicKey;
use rsapub::decoder::Decoder;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::store::StoreArgs;
use crate::utils::read_input;

#[derive(Args)]
pub(crate) struct Config {
    /// Path to the PEM file. If not specified, reads from stdin
    #[arg(conflicts_with = "store")]
    file: Option<PathBuf>,

    #[command(flatten)]
    key_store: StoreArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,
}

#[derive(Debug, Serialize)]
struct KeyReport {
    label: String,
    bits: usize,
    modulus: ComponentReport,
    public_exponent: ComponentReport,
}

#[derive(Debug, Serialize)]
struct ComponentReport {
    base64: String,
    hex: String,
}

impl From<&Integer> for ComponentReport {
    fn from(value: &Integer) -> Self {
        ComponentReport {
            base64: pem::base64::encode(value.as_bytes()),
            hex: format!("{:x}", value),
        }
    }
}

impl KeyReport {
    fn new(pem: &Pem, key: &RSAPublicKey) -> Self {
        KeyReport {
            label: pem.label().to_string(),
            bits: key.key_size(),
            modulus: ComponentReport::from(key.modulus()),
            public_exponent: ComponentReport::from(key.public_exponent()),
        }
    }
}

fn format_text(report: &KeyReport, key: &RSAPublicKey) -> Result<String> {
    let mut output = String::new();
    writeln!(output, "RSA Public Key ({})", report.label)?;
    writeln!(output, "Modulus (n): {} bits", report.bits)?;
    writeln!(output, "  base64: {}", report.modulus.base64)?;
    writeln!(output, "  hex: {}", report.modulus.hex)?;
    writeln!(output, "Public Exponent (e): {}", key.public_exponent())?;
    writeln!(output, "  base64: {}", report.public_exponent.base64)?;
    writeln!(output, "  hex: {}", report.public_exponent.hex)?;
    Ok(output)
}

pub(crate) fn execute(config: Config) -> Result<()> {
    let path = match config.key_store.location()? {
        Some(location) => Some(location.path()),
        None => config.file,
    };
    if let Some(path) = &path {
        debug!(path = %path.display(), "reading key");
    }

    let text = read_input(path.as_deref())?;
    let pem: Pem = text.decode()?;
    let key = RSAPublicKey::from_pem(&pem)?;
    let report = KeyReport::new(&pem, &key);

    match config.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print!("{}", format_text(&report, &key)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_text() {
        let key = RSAPublicKey::from_base64("AMOh", "AQAB").unwrap();
        let pem = Pem::from_bytes(pem::Label::PublicKey, &[]);
        let report = KeyReport::new(&pem, &key);

        let expected = "RSA Public Key (PUBLIC KEY)\n\
                        Modulus (n): 16 bits\n  base64: w6E=\n  hex: c3a1\n\
                        Public Exponent (e): 65537\n  base64: AQAB\n  hex: 010001\n";
        assert_eq!(expected, format_text(&report, &key).unwrap());
    }

    #[test]
    fn test_report_json() {
        let key = RSAPublicKey::from_base64("AMOh", "AQAB").unwrap();
        let pem = Pem::from_bytes(pem::Label::PublicKey, &[]);
        let json = serde_json::to_value(KeyReport::new(&pem, &key)).unwrap();

        assert_eq!(16, json["bits"]);
        assert_eq!("w6E=", json["modulus"]["base64"]);
        assert_eq!("010001", json["public_exponent"]["hex"]);
    }
}
