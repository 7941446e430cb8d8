use std::ops::Range;

use log::debug;
use rugo_error::{RugoResult, rugo_bail, rugo_err};
use rugo_io::RugoReadAt;

use crate::{ENCRYPTED_MAGIC_BYTES, EOF_SIZE, MAGIC_BYTES};

const EOF_LEN: u64 = EOF_SIZE as u64;

/// Read the trailer of a file of `file_size` bytes and return the byte range of its footer.
pub fn locate_footer<R: RugoReadAt>(read: &R, file_size: u64) -> RugoResult<Range<u64>> {
    if file_size < EOF_LEN {
        rugo_bail!(NotThisFormat: "file of {} bytes is too small to be a Parquet file", file_size);
    }
    let trailer = read.read_byte_range(file_size - EOF_LEN..file_size)?;
    let trailer: [u8; EOF_SIZE] = trailer.as_ref().try_into().map_err(|_| {
        rugo_err!(UnexpectedEndOfInput: "expected {} trailer bytes, read {}", EOF_SIZE, trailer.len())
    })?;
    let footer = parse_trailer(trailer, file_size)?;
    debug!(
        "located {} byte footer at {}..{}",
        footer.end - footer.start,
        footer.start,
        footer.end
    );
    Ok(footer)
}

/// Validate the 8 trailing bytes of a file and compute where its footer lives.
///
/// The trailer is the little-endian `u32` footer length followed by the magic bytes. The
/// footer ends where the trailer starts.
pub fn parse_trailer(trailer: [u8; EOF_SIZE], file_size: u64) -> RugoResult<Range<u64>> {
    let [l0, l1, l2, l3, m0, m1, m2, m3] = trailer;
    let magic = [m0, m1, m2, m3];
    if magic == ENCRYPTED_MAGIC_BYTES {
        rugo_bail!(NotThisFormat: "file has an encrypted footer, which cannot be read");
    }
    if magic != MAGIC_BYTES {
        rugo_bail!(NotThisFormat: "invalid magic bytes, got {:?}", magic);
    }

    let footer_len = u64::from(u32::from_le_bytes([l0, l1, l2, l3]));
    let footer_end = file_size.checked_sub(EOF_LEN).ok_or_else(|| {
        rugo_err!(NotThisFormat: "file of {} bytes is too small to be a Parquet file", file_size)
    })?;
    let footer_start = footer_end.checked_sub(footer_len).ok_or_else(|| {
        rugo_err!(
            InvalidLength: "footer length {} exceeds the {} bytes preceding the trailer",
            footer_len,
            footer_end
        )
    })?;
    Ok(footer_start..footer_end)
}
