//! Scheme key store layout: `<root>/<rid in lowercase hex>/<index>.pem`.

use std::path::PathBuf;

use clap::Args;

use crate::error::{Error, Result};

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct StoreArgs {
    /// Root directory of the scheme key store
    #[arg(long, value_name = "DIR", requires_all = ["rid", "index"])]
    store: Option<PathBuf>,

    /// Registered application provider identifier, hex encoded
    #[arg(long, value_name = "HEX", requires = "store")]
    rid: Option<String>,

    /// Key index under the RID directory
    #[arg(long, value_name = "N", requires = "store")]
    index: Option<u32>,
}

impl StoreArgs {
    /// `None` when no store was requested on the command line.
    pub(crate) fn location(&self) -> Result<Option<KeyLocation>> {
        match (&self.store, &self.rid, self.index) {
            (None, None, None) => Ok(None),
            (Some(root), Some(rid), Some(index)) => {
                KeyLocation::new(root.clone(), rid, index).map(Some)
            }
            _ => Err(Error::InvalidInput(
                "--store, --rid and --index must be given together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyLocation {
    root: PathBuf,
    rid: String,
    index: u32,
}

impl KeyLocation {
    pub(crate) fn new(root: PathBuf, rid: &str, index: u32) -> Result<Self> {
        if rid.is_empty() || rid.len() % 2 != 0 || !rid.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidInput(format!(
                "RID must be a non-empty even-length hex string, got '{}'",
                rid
            )));
        }
        Ok(KeyLocation {
            root,
            rid: rid.to_ascii_lowercase(),
            index,
        })
    }

    pub(crate) fn path(&self) -> PathBuf {
        self.root
            .join(&self.rid)
            .join(format!("{}.pem", self.index))
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rstest::rstest;

    use super::{KeyLocation, StoreArgs};
    use crate::error::Error;

    #[rstest(rid, index, expected,
        case("A000000003", 9, "keys/a000000003/9.pem"),
        case("a000000004", 241, "keys/a000000004/241.pem"),
        case("00", 0, "keys/00/0.pem")
    )]
    fn test_key_location_path(rid: &str, index: u32, expected: &str) {
        let location = KeyLocation::new(PathBuf::from("keys"), rid, index).unwrap();
        assert_eq!(PathBuf::from(expected), location.path());
    }

    #[rstest(rid, case(""), case("A00"), case("A0000000G3"), case("a0 00"))]
    fn test_key_location_invalid_rid(rid: &str) {
        let result = KeyLocation::new(PathBuf::from("keys"), rid, 1);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_store_args_location() {
        assert_eq!(None, StoreArgs::default().location().unwrap());

        let args = StoreArgs {
            store: Some(PathBuf::from("keys")),
            rid: Some("A000000003".to_string()),
            index: Some(9),
        };
        let location = args.location().unwrap().unwrap();
        assert_eq!(PathBuf::from("keys/a000000003/9.pem"), location.path());

        let partial = StoreArgs {
            store: Some(PathBuf::from("keys")),
            rid: None,
            index: Some(9),
        };
        assert!(matches!(partial.location(), Err(Error::InvalidInput(_))));
    }
}
