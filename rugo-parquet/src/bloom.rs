use log::debug;
use rugo_error::{ResultExt, RugoError, RugoResult, rugo_bail};
use rugo_io::{OffsetReadAt, RugoReadAt};

/// The size of the bloom filter header in bytes.
pub const BLOOM_HEADER_SIZE: usize = 12;
/// The size of a filter block in bytes.
pub const BLOOM_BLOCK_SIZE: usize = 32;
const BITS_PER_BLOCK: u32 = 256;

/// The number of bytes read when the filter length is unknown and the header is unusable.
pub const FALLBACK_BLOOM_FILTER_LENGTH: u64 = (BLOOM_HEADER_SIZE + 32 * BLOOM_BLOCK_SIZE) as u64;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const DJB2_SEED: u32 = 5381;

/// Bounds applied to a bloom filter header before its bits are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BloomFilterOptions {
    max_hash_functions: u32,
    max_blocks: u32,
}

impl Default for BloomFilterOptions {
    fn default() -> Self {
        Self {
            max_hash_functions: 10,
            max_blocks: 1024,
        }
    }
}

impl BloomFilterOptions {
    /// Configure the largest accepted number of hash functions.
    pub fn with_max_hash_functions(mut self, max_hash_functions: u32) -> RugoResult<Self> {
        if max_hash_functions == 0 {
            rugo_bail!(InvalidArgument: "max_hash_functions must be at least 1");
        }
        self.max_hash_functions = max_hash_functions;
        Ok(self)
    }

    /// Configure the largest accepted number of 32 byte blocks.
    pub fn with_max_blocks(mut self, max_blocks: u32) -> RugoResult<Self> {
        if max_blocks == 0 {
            rugo_bail!(InvalidArgument: "max_blocks must be at least 1");
        }
        self.max_blocks = max_blocks;
        Ok(self)
    }

    pub fn max_hash_functions(&self) -> u32 {
        self.max_hash_functions
    }

    pub fn max_blocks(&self) -> u32 {
        self.max_blocks
    }

    /// The total filter length implied by a header, if the header is within bounds.
    fn filter_length(&self, header: &[u8]) -> Option<u64> {
        let (hash_functions, blocks) = parse_header(header)?;
        self.check_header(hash_functions, blocks).ok()?;
        Some(BLOOM_HEADER_SIZE as u64 + u64::from(blocks) * BLOOM_BLOCK_SIZE as u64)
    }

    /// The longest filter these bounds accept. Longer recorded lengths are not read in full.
    fn max_filter_length(&self) -> u64 {
        BLOOM_HEADER_SIZE as u64 + u64::from(self.max_blocks) * BLOOM_BLOCK_SIZE as u64
    }

    fn check_header(&self, hash_functions: u32, blocks: u32) -> RugoResult<()> {
        if hash_functions == 0 || hash_functions > self.max_hash_functions {
            rugo_bail!(
                InvalidArgument: "bloom filter declares {} hash functions, expected 1..={}",
                hash_functions,
                self.max_hash_functions
            );
        }
        if blocks == 0 || blocks > self.max_blocks {
            rugo_bail!(
                InvalidArgument: "bloom filter declares {} blocks, expected 1..={}",
                blocks,
                self.max_blocks
            );
        }
        Ok(())
    }
}

fn parse_header(header: &[u8]) -> Option<(u32, u32)> {
    match header {
        [h0, h1, h2, h3, b0, b1, b2, b3, ..] if header.len() >= BLOOM_HEADER_SIZE => Some((
            u32::from_le_bytes([*h0, *h1, *h2, *h3]),
            u32::from_le_bytes([*b0, *b1, *b2, *b3]),
        )),
        _ => None,
    }
}

/// A split-block bloom filter.
///
/// The serialized form is a 12 byte header (`u32` LE hash function count, `u32` LE block
/// count, 4 reserved bytes) followed by the blocks. Each block holds 256 bits, bit `k` being
/// `1 << (k % 8)` of byte `k / 8`.
///
/// A value is probed with two 32 bit hashes, `h1` FNV-1a and `h2` djb2. Probe `i` selects the
/// bit `combined / blocks % 256` of block `combined % blocks`, where
/// `combined = h1 + i * h2` with wrapping arithmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    hash_functions: u32,
    blocks: u32,
    bits: Vec<u8>,
}

impl BloomFilter {
    /// Parse a serialized filter, validating the header against `options`.
    ///
    /// Trailing bytes after the last block are ignored.
    pub fn try_from_bytes(bytes: &[u8], options: &BloomFilterOptions) -> RugoResult<Self> {
        let Some((hash_functions, blocks)) = parse_header(bytes) else {
            rugo_bail!(
                InvalidLength: "bloom filter of {} bytes is shorter than its header",
                bytes.len()
            );
        };
        options.check_header(hash_functions, blocks)?;

        let bits_len = usize::try_from(blocks)? * BLOOM_BLOCK_SIZE;
        let Some(bits) = bytes.get(BLOOM_HEADER_SIZE..BLOOM_HEADER_SIZE + bits_len) else {
            rugo_bail!(
                InvalidLength: "bloom filter of {} blocks needs {} bytes, got {}",
                blocks,
                BLOOM_HEADER_SIZE + bits_len,
                bytes.len()
            );
        };
        Ok(Self {
            hash_functions,
            blocks,
            bits: bits.to_vec(),
        })
    }

    pub fn hash_functions(&self) -> u32 {
        self.hash_functions
    }

    pub fn blocks(&self) -> u32 {
        self.blocks
    }

    /// Returns `false` if `value` was definitely never inserted.
    pub fn might_contain(&self, value: impl AsRef<[u8]>) -> bool {
        self.probes(value.as_ref())
            .all(|(byte, mask)| self.bits.get(byte).is_some_and(|b| b & mask != 0))
    }

    /// The byte index and bit mask of every probe for `value`.
    fn probes(&self, value: &[u8]) -> impl Iterator<Item = (usize, u8)> + use<> {
        let h1 = fnv1a_32(value);
        let h2 = djb2_32(value);
        let blocks = self.blocks;
        (0..self.hash_functions).map(move |i| {
            let combined = h1.wrapping_add(i.wrapping_mul(h2));
            let block = combined % blocks;
            let bit = (combined / blocks) % BITS_PER_BLOCK;
            let byte = block as usize * BLOOM_BLOCK_SIZE + (bit / 8) as usize;
            (byte, 1u8 << (bit % 8))
        })
    }
}

#[cfg(any(test, feature = "test-harness"))]
impl BloomFilter {
    /// An empty filter with no bits set.
    pub fn new(hash_functions: u32, blocks: u32) -> Self {
        Self {
            hash_functions,
            blocks,
            bits: vec![0; blocks as usize * BLOOM_BLOCK_SIZE],
        }
    }

    pub fn insert(&mut self, value: impl AsRef<[u8]>) {
        let probes: Vec<_> = self.probes(value.as_ref()).collect();
        for (byte, mask) in probes {
            if let Some(b) = self.bits.get_mut(byte) {
                *b |= mask;
            }
        }
    }

    /// Serialize the filter, header included.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(BLOOM_HEADER_SIZE + self.bits.len());
        bytes.extend_from_slice(&self.hash_functions.to_le_bytes());
        bytes.extend_from_slice(&self.blocks.to_le_bytes());
        bytes.extend_from_slice(&[0; 4]);
        bytes.extend_from_slice(&self.bits);
        bytes
    }
}

/// Read the filter at `offset` and probe it for `value`.
///
/// When `length` is `None` it is derived from the filter header. Any failure to read or
/// validate the filter is logged and answers `false`.
pub fn probe_bloom_filter<R: RugoReadAt>(
    read: R,
    offset: u64,
    length: Option<u64>,
    value: impl AsRef<[u8]>,
    options: &BloomFilterOptions,
) -> bool {
    match read_bloom_filter(read, offset, length, options) {
        Ok(filter) => filter.might_contain(value),
        Err(err) => {
            debug!("treating bloom filter at offset {offset} as a miss: {err}");
            false
        }
    }
}

/// Read and validate the filter at `offset`.
pub fn read_bloom_filter<R: RugoReadAt>(
    read: R,
    offset: u64,
    length: Option<u64>,
    options: &BloomFilterOptions,
) -> RugoResult<BloomFilter> {
    let read = OffsetReadAt::new(read, offset);
    let length = match length {
        Some(length) => length,
        None => {
            let header = read.read_byte_range(0..BLOOM_HEADER_SIZE as u64)?;
            options
                .filter_length(&header)
                .unwrap_or(FALLBACK_BLOOM_FILTER_LENGTH)
        }
    };
    let filter = read
        .read_byte_range(0..length.min(options.max_filter_length()))
        .map_err(RugoError::from)
        .map(|bytes| BloomFilter::try_from_bytes(&bytes, options));
    ResultExt::flatten(filter)
}

fn fnv1a_32(value: &[u8]) -> u32 {
    value.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn djb2_32(value: &[u8]) -> u32 {
    value.iter().fold(DJB2_SEED, |hash, byte| {
        hash.wrapping_mul(33).wrapping_add(u32::from(*byte))
    })
}
