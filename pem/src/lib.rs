pub mod base64;
pub mod error;

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
    sync::LazyLock,
};

use error::Error;
use regex::Regex;
use rsapub::decoder::{DecodableFrom, Decoder};

const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

static BOUNDARY_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^-----(BEGIN|END) ([A-Z0-9 ]+)-----\s*$"));

fn boundary_regex() -> Result<&'static Regex, Error> {
    BOUNDARY_RE
        .as_ref()
        .map_err(|_| Error::InvalidEncapsulationBoundary)
}

/// RFC 7468 section 3: base64 lines are wrapped at 64 characters.
pub const LINE_WIDTH: usize = 64;

const BOUNDARY_DASHES: &str = "-----";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// X.509 SubjectPublicKeyInfo
    PublicKey,
    /// PKCS#1 RSAPublicKey
    RSAPublicKey,
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::PublicKey => write!(f, "{}", PUBLIC_KEY_LABEL),
            Label::RSAPublicKey => write!(f, "{}", RSA_PUBLIC_KEY_LABEL),
        }
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PUBLIC_KEY_LABEL => Ok(Label::PublicKey),
            RSA_PUBLIC_KEY_LABEL => Ok(Label::RSAPublicKey),
            _ => Err(Error::InvalidLabel),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Boundary {
    Begin(Label),
    End(Label),
}

impl Boundary {
    fn parse(line: &str) -> Result<Boundary, Error> {
        let captured = boundary_regex()?
            .captures(line)
            .ok_or(Error::InvalidEncapsulationBoundary)?;
        let (Some(kind), Some(label)) = (captured.get(1), captured.get(2)) else {
            return Err(Error::InvalidEncapsulationBoundary);
        };
        let label = Label::from_str(label.as_str())?;
        match kind.as_str() {
            "BEGIN" => Ok(Boundary::Begin(label)),
            _ => Ok(Boundary::End(label)),
        }
    }
}

/*
ref: https://www.rfc-editor.org/rfc/rfc7468.html#section-3
*/

/// A PEM block: a label and its base64 payload (without line breaks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pem {
    label: Label,
    base64_data: String,
}

impl Pem {
    pub fn new(label: Label, base64_data: String) -> Self {
        Pem { label, base64_data }
    }

    pub fn from_bytes(label: Label, data: &[u8]) -> Self {
        Pem {
            label,
            base64_data: base64::encode(data),
        }
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn data(&self) -> &str {
        &self.base64_data
    }
}

impl Display for Pem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "-----BEGIN {}-----", self.label)?;
        for chunk in self.base64_data.as_bytes().chunks(LINE_WIDTH) {
            let line = std::str::from_utf8(chunk).map_err(|_| std::fmt::Error)?;
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "-----END {}-----", self.label)
    }
}

/// Armors DER bytes as a PEM document with the given label.
///
/// Every line, the footer included, ends with `\n`.
pub fn write(der: &[u8], label: Label) -> String {
    Pem::from_bytes(label, der).to_string()
}

/// Trait for types that can be converted to PEM format
pub trait ToPem {
    type Error;

    fn pem_label(&self) -> Label;

    fn to_pem(&self) -> Result<Pem, Self::Error>;
}

/// Trait for types that can be constructed from PEM format
pub trait FromPem: Sized {
    type Error;

    fn expected_label() -> Label;

    fn from_pem(pem: &Pem) -> Result<Self, Self::Error>;
}

impl DecodableFrom<Pem> for Vec<u8> {}

impl Decoder<Pem, Vec<u8>> for Pem {
    type Error = Error;

    fn decode(&self) -> Result<Vec<u8>, Self::Error> {
        // the label is dropped here; callers check it before decoding
        Ok(base64::decode(self.data())?)
    }
}

impl DecodableFrom<String> for Pem {}

impl Decoder<String, Pem> for String {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl DecodableFrom<&str> for Pem {}

impl Decoder<&str, Pem> for &str {
    type Error = Error;

    fn decode(&self) -> Result<Pem, Self::Error> {
        Pem::from_str(self)
    }
}

impl FromStr for Pem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();

        // explanatory text before the pre-eb is skipped
        let label = loop {
            let Some(line) = lines.next() else {
                return Err(Error::MissingPreEncapsulationBoundary);
            };
            if !line.starts_with(BOUNDARY_DASHES) {
                continue;
            }
            match Boundary::parse(line)? {
                Boundary::Begin(label) => break label,
                Boundary::End(_) => return Err(Error::MissingPreEncapsulationBoundary),
            }
        };

        let mut base64_data = String::new();
        loop {
            let Some(line) = lines.next() else {
                return Err(Error::MissingPostEncapsulationBoundary);
            };
            if line.starts_with(BOUNDARY_DASHES) {
                match Boundary::parse(line)? {
                    Boundary::End(l) if l == label => break,
                    Boundary::End(_) => return Err(Error::LabelMissMatch),
                    Boundary::Begin(_) => return Err(Error::MissingPostEncapsulationBoundary),
                }
            }
            let line = line.trim();
            if line.is_empty() {
                if base64_data.is_empty() {
                    return Err(Error::MissingData);
                }
                return Err(Error::InvalidBase64Line);
            }
            base64_data.push_str(line);
        }

        if base64_data.is_empty() {
            return Err(Error::MissingData);
        }

        Ok(Pem { label, base64_data })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rsapub::decoder::Decoder;
    use std::str::FromStr;

    use crate::{Boundary, Error, Label, Pem, boundary_regex, write};

    #[rstest(
        input,
        expected,
        case("-----BEGIN PUBLIC KEY-----", Boundary::Begin(Label::PublicKey)),
        case("-----END PUBLIC KEY-----", Boundary::End(Label::PublicKey)),
        case("-----END PUBLIC KEY-----     ", Boundary::End(Label::PublicKey)),
        case("-----BEGIN RSA PUBLIC KEY-----", Boundary::Begin(Label::RSAPublicKey))
    )]
    fn test_parse_boundary(input: &str, expected: Boundary) {
        assert_eq!(expected, Boundary::parse(input).unwrap());
    }

    #[rstest(
        input,
        expected,
        case("-----BEGIN CERTIFICATE-----", Error::InvalidLabel),
        case("-----BEGIN PUBLIC KEY----", Error::InvalidEncapsulationBoundary),
        case("-----MIDDLE PUBLIC KEY-----", Error::InvalidEncapsulationBoundary)
    )]
    fn test_parse_boundary_with_error(input: &str, expected: Error) {
        assert_eq!(expected, Boundary::parse(input).unwrap_err());
    }

    #[test]
    fn test_boundary_regex_compiled_once() {
        let first = boundary_regex().unwrap();
        assert_eq!(
            Boundary::End(Label::PublicKey),
            Boundary::parse("-----END PUBLIC KEY-----").unwrap()
        );
        assert!(std::ptr::eq(first, boundary_regex().unwrap()));
    }

    // 2048-bit RSA key produced by `openssl rsa -pubout`
    const TEST_PUBLIC_KEY: &str = r"-----BEGIN PUBLIC KEY-----
MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEArVaEn6la4IJkX2taWtEX
WkeLihy735fVRttsRiy0u4/jNXBEnNVUw+A7H8GG+3L0bSszl1uXJ1AaJClxb0LO
PfiIfS8U+hkF0BK/YdkapA10IdSKOs0T1PW538FtA/N8aYUiHYJbru2VABkdMy+y
yRBIBRa6sv8Ds0Ep2XVkNNjiEZBsy+MslH6R7aOCBXE7hmezQDSQRYUuqSOtoetf
L8Mgdyz7mIpsrVyGZGcJn2ogZP56T2rJT5B7T1GyiZAms3kDf6Am+YutifSCLr3C
JCkb0L5qHinDnUTApT0qwxyaFgAUBHwArpG3seTxW22cCgE1xijpOjc/GqJIzJnn
0wIDAQAB
-----END PUBLIC KEY-----
";

    const TEST_PEM_WITH_TEXT: &str = r"Scheme key A000000003, index 9
-----BEGIN PUBLIC KEY-----
MB4wDQYJKoZIhvcNAQEBBQADDQAwCgIDAMOhAgMBAAE=
-----END PUBLIC KEY-----
";

    const TEST_PEM_SPLIT_PADDING: &str = r"-----BEGIN RSA PUBLIC KEY-----
AAA
BBB=
=
-----END RSA PUBLIC KEY-----";

    #[rstest(
        input,
        expected_label,
        expected_data,
        case(TEST_PEM_WITH_TEXT, Label::PublicKey, "MB4wDQYJKoZIhvcNAQEBBQADDQAwCgIDAMOhAgMBAAE="),
        case(TEST_PEM_SPLIT_PADDING, Label::RSAPublicKey, "AAABBB=="),
        case(
            TEST_PUBLIC_KEY,
            Label::PublicKey,
            "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEArVaEn6la4IJkX2taWtEXWkeLihy735fVRttsRiy0u4/jNXBEnNVUw+A7H8GG+3L0bSszl1uXJ1AaJClxb0LOPfiIfS8U+hkF0BK/YdkapA10IdSKOs0T1PW538FtA/N8aYUiHYJbru2VABkdMy+yyRBIBRa6sv8Ds0Ep2XVkNNjiEZBsy+MslH6R7aOCBXE7hmezQDSQRYUuqSOtoetfL8Mgdyz7mIpsrVyGZGcJn2ogZP56T2rJT5B7T1GyiZAms3kDf6Am+YutifSCLr3CJCkb0L5qHinDnUTApT0qwxyaFgAUBHwArpG3seTxW22cCgE1xijpOjc/GqJIzJnn0wIDAQAB"
        )
    )]
    fn test_pem_from_str(input: &str, expected_label: Label, expected_data: &str) {
        let pem = Pem::from_str(input).unwrap();
        assert_eq!(expected_label, pem.label());
        assert_eq!(expected_data, pem.data());
    }

    const INVALID_TEST_PEM1: &str = r"";
    const INVALID_TEST_PEM2: &str = r"-----BEGIN PUBLIC KEY-----

-----END PUBLIC KEY-----
";
    const INVALID_TEST_PEM3: &str = r"-----BEGIN PUBLIC KEY-----
AAA
";
    const INVALID_TEST_PEM4: &str = r"-----BEGIN PUBLIC KEY-----
AAA

-----END PUBLIC KEY-----
";
    const INVALID_TEST_PEM5: &str = r"-----BEGIN PUBLIC KEY-----
AAA==
-----END RSA PUBLIC KEY-----
";
    const INVALID_TEST_PEM6: &str = r"-----BEGIN PUBLIC KEY-----
-----END PUBLIC KEY-----
";
    const INVALID_TEST_PEM7: &str = r"-----END PUBLIC KEY-----
";

    #[rstest(
        input,
        expected,
        case(INVALID_TEST_PEM1, Error::MissingPreEncapsulationBoundary),
        case(INVALID_TEST_PEM2, Error::MissingData),
        case(INVALID_TEST_PEM3, Error::MissingPostEncapsulationBoundary),
        case(INVALID_TEST_PEM4, Error::InvalidBase64Line),
        case(INVALID_TEST_PEM5, Error::LabelMissMatch),
        case(INVALID_TEST_PEM6, Error::MissingData),
        case(INVALID_TEST_PEM7, Error::MissingPreEncapsulationBoundary)
    )]
    fn test_pem_from_str_with_error(input: &str, expected: Error) {
        if let Err(e) = Pem::from_str(input) {
            assert_eq!(expected, e);
        } else {
            panic!("this test should return an error");
        }
    }

    #[rstest(len, case(1), case(47), case(48), case(49), case(96), case(294))]
    fn test_write_line_layout(len: usize) {
        let der: Vec<u8> = (0..len).map(|i| i as u8).collect();
        let text = write(&der, Label::PublicKey);

        assert!(text.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(text.ends_with("-----END PUBLIC KEY-----\n"));

        let lines: Vec<&str> = text.lines().collect();
        let payload = &lines[1..lines.len() - 1];
        if let Some((last, full)) = payload.split_last() {
            assert!(full.iter().all(|l| l.len() == 64));
            assert!(!last.is_empty() && last.len() <= 64);
        }

        let pem: Pem = text.parse().unwrap();
        let decoded: Vec<u8> = pem.decode().unwrap();
        assert_eq!(der, decoded);
    }

    #[test]
    fn test_write_reproduces_openssl_layout() {
        let pem: Pem = TEST_PUBLIC_KEY.parse().unwrap();
        let der: Vec<u8> = pem.decode().unwrap();
        assert_eq!(TEST_PUBLIC_KEY, write(&der, Label::PublicKey));
    }

    #[test]
    fn test_decode_rejects_corrupted_payload() {
        let pem = Pem::new(Label::PublicKey, "MB4w*QYJ".to_string());
        let result: Result<Vec<u8>, Error> = pem.decode();
        assert!(matches!(result, Err(Error::Base64Decode(_))));
    }
}
