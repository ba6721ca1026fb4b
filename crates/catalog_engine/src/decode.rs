use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecodedPage {
    pub text: String,
    pub encoding: &'static Encoding,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_errors: bool,
}

/// Decode a page body: BOM, then the Content-Type charset, then byte sniffing.
///
/// `tld` is the last label of the page host (e.g. `b"tr"`) and only steers
/// the sniffer. Decoding is lossy; a few broken bytes must not cost the
/// whole catalog.
pub(crate) fn decode_page(bytes: &[u8], content_type: Option<&str>, tld: Option<&[u8]>) -> DecodedPage {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| sniff(bytes, tld));

    // `decode` strips a matching BOM itself.
    let (text, actual, had_errors) = encoding.decode(bytes);
    DecodedPage {
        text: text.into_owned(),
        encoding: actual,
        had_errors,
    }
}

fn sniff(bytes: &[u8], tld: Option<&[u8]>) -> &'static Encoding {
    if bytes.is_empty() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(tld, true)
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(['"', '\'']);
        (!value.is_empty()).then(|| value.to_string())
    })
}
