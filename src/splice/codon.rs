//! Standard genetic code.

use hashbrown::HashMap;
use once_cell::sync::Lazy;

/// Symbol for codons with ambiguous or unknown bases.
pub const UNKNOWN_AA: u8 = b'X';

const BASES: &[u8; 4] = b"TCAG";
const AMINO_ACIDS: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

static CODON_TABLE: Lazy<HashMap<[u8; 3], u8>> = Lazy::new(|| {
    let mut table = HashMap::with_capacity(64);
    for (i, aa) in AMINO_ACIDS.iter().enumerate() {
        let codon = [BASES[i / 16], BASES[(i / 4) % 4], BASES[i % 4]];
        table.insert(codon, *aa);
    }
    table
});

/// Translates one codon; lowercase bases and `U` are accepted.
pub fn translate_codon(codon: &[u8; 3]) -> u8 {
    let key = codon.map(|b| {
        match b.to_ascii_uppercase() {
            b'U' => b'T',
            b => b,
        }
    });
    CODON_TABLE.get(&key).copied().unwrap_or(UNKNOWN_AA)
}

/// Translates `seq` codon by codon; one or two trailing bases are ignored.
pub fn translate(seq: &[u8]) -> Vec<u8> {
    seq.chunks_exact(3)
        .map(|chunk| translate_codon(&[chunk[0], chunk[1], chunk[2]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(b"ATG", b'M')]
    #[case(b"TAA", b'*')]
    #[case(b"TGA", b'*')]
    #[case(b"tgg", b'W')]
    #[case(b"GGU", b'G')]
    #[case(b"GCN", b'X')]
    #[case(b"A-G", b'X')]
    fn codons(
        #[case] codon: &[u8; 3],
        #[case] aa: u8,
    ) {
        assert_eq!(translate_codon(codon), aa);
    }

    #[rstest]
    #[case(b"ATGGCCTAA".as_slice(), b"MA*".as_slice())]
    #[case(b"ATGGCCTAAG".as_slice(), b"MA*".as_slice())]
    #[case(b"ATGGCCTA".as_slice(), b"MA".as_slice())]
    #[case(b"AT".as_slice(), b"".as_slice())]
    fn trailing_bases_dropped(
        #[case] seq: &[u8],
        #[case] protein: &[u8],
    ) {
        assert_eq!(translate(seq), protein.to_vec());
    }
}
