#![no_main]

use bytes::Bytes;
use libfuzzer_sys::{Corpus, fuzz_target};
use rugo_error::RugoError;
use rugo_parquet::{MAGIC_BYTES, read_metadata_from_bytes, read_metadata_from_footer};
use rugo_thrift::{CompactReader, ThriftType};

fuzz_target!(|data: &[u8]| -> Corpus {
    if data.is_empty() {
        return Corpus::Reject;
    }
    let footer = Bytes::copy_from_slice(data);

    if let Err(err) = CompactReader::new(footer.clone()).skip(ThriftType::Struct) {
        check_error(&err);
    }

    let decoded = read_metadata_from_footer(footer.clone());

    // The same bytes framed as a complete file must decode identically.
    let Ok(len) = u32::try_from(data.len()) else {
        return Corpus::Reject;
    };
    let mut file = MAGIC_BYTES.to_vec();
    file.extend_from_slice(data);
    file.extend_from_slice(&len.to_le_bytes());
    file.extend_from_slice(&MAGIC_BYTES);
    match (decoded, read_metadata_from_bytes(file)) {
        (Ok(footer), Ok(framed)) => assert_eq!(footer, framed),
        (Err(err), Err(framed)) => {
            check_error(&err);
            check_error(&framed);
        }
        (footer, framed) => panic!(
            "framing changed the outcome: {} vs {}",
            footer.is_ok(),
            framed.is_ok()
        ),
    }

    // Arbitrary bytes taken as a whole file only ever fail cleanly.
    if let Err(err) = read_metadata_from_bytes(footer) {
        check_error(&err);
    }
    Corpus::Keep
});

fn check_error(err: &RugoError) {
    match err {
        RugoError::UnexpectedEndOfInput(..)
        | RugoError::InvalidLength(..)
        | RugoError::NestingTooDeep(..)
        | RugoError::NotThisFormat(..) => {}
        _ => panic!("unexpected error kind: {err}"),
    }
}
