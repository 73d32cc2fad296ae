use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder};
use std::io::{self, Read};

pub const ENC_GZIP: &str = "gzip";
pub const ENC_DEFLATE: &str = "deflate";
pub const ENC_ZSTD: &str = "zstd";

/// Value sent in `Accept-Encoding` so the decoders below are the only ones we get.
pub const ACCEPT_ENCODING: &str = "gzip, deflate, zstd";

pub fn decode_gzip(data: &[u8]) -> io::Result<Bytes> {
    let mut decoder = GzDecoder::new(data);
    let mut decoded_data = Vec::new();
    decoder.read_to_end(&mut decoded_data)?;
    Ok(Bytes::from(decoded_data))
}

pub fn decode_deflate(data: &[u8]) -> io::Result<Bytes> {
    let mut decoder = DeflateDecoder::new(data);
    let mut decoded_data = Vec::new();
    decoder.read_to_end(&mut decoded_data)?;
    Ok(Bytes::from(decoded_data))
}

pub fn decode_zstd(data: &[u8]) -> io::Result<Bytes> {
    zstd::decode_all(data).map(Bytes::from)
}

/// Undo the codings listed in a `Content-Encoding` header.
///
/// Codings are applied by the server in listed order, so they are removed last to first.
/// Unknown codings (including `identity`) leave the data untouched.
pub fn decode_body(data: Bytes, content_encoding: Option<&str>) -> io::Result<Bytes> {
    let Some(header) = content_encoding else {
        return Ok(data);
    };

    let mut body = data;
    for coding in header.rsplit(',') {
        body = match coding.trim().to_ascii_lowercase().as_str() {
            ENC_GZIP => decode_gzip(&body)?,
            ENC_DEFLATE => decode_deflate(&body)?,
            ENC_ZSTD => decode_zstd(&body)?,
            _ => body,
        };
    }
    Ok(body)
}
