#![no_main]

use bytes::Bytes;
use libfuzzer_sys::{Corpus, fuzz_target};
use rugo_parquet::{BloomFilter, BloomFilterOptions, probe_bloom_filter};

fuzz_target!(|data: &[u8]| -> Corpus {
    let Some((&selector, rest)) = data.split_first() else {
        return Corpus::Reject;
    };
    let options = BloomFilterOptions::default();
    let value = &rest[..rest.len().min(16)];

    // Arbitrary filter bytes never panic, and parsed filters answer consistently.
    if let Ok(filter) = BloomFilter::try_from_bytes(rest, &options) {
        assert_eq!(
            filter.might_contain(value),
            probe_bloom_filter(Bytes::copy_from_slice(rest), 0, None, value, &options)
        );
    }
    let offset = u64::from(selector % 16);
    let length = (selector >= 128).then(|| u64::from(selector % 64));
    probe_bloom_filter(Bytes::copy_from_slice(rest), offset, length, value, &options);

    // No false negatives for inserted values.
    let mut filter = BloomFilter::new(u32::from(selector % 8) + 1, u32::from(selector % 4) + 1);
    for chunk in rest.chunks(4) {
        filter.insert(chunk);
    }
    let reparsed = BloomFilter::try_from_bytes(&filter.to_bytes(), &options)
        .unwrap_or_else(|err| panic!("serialized filter does not parse: {err}"));
    for chunk in rest.chunks(4) {
        assert!(reparsed.might_contain(chunk));
    }
    Corpus::Keep
});
