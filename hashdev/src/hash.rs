//! 带种子的 MurmurHash3 (x86_32)
//!
//! 按小端序读取4字节的字，与平台字节序无关。

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

pub fn murmur3_32(key: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    let mut words = key.chunks_exact(4);
    for word in &mut words {
        let k = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        h ^= scramble(k);
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    // 剩余的0~3字节
    let tail = words.remainder();
    if !tail.is_empty() {
        let k = tail.iter().rev().fold(0u32, |k, &byte| (k << 8) | byte as u32);
        h ^= scramble(k);
    }

    // 长度按32位截断参与混合
    h ^= key.len() as u32;
    avalanche(h)
}

#[inline]
fn scramble(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline]
fn avalanche(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn known_answers() {
        assert_eq!(murmur3_32(b"", 0), 0);
        assert_eq!(murmur3_32(b"", 1), 0x514e_28b7);
        assert_eq!(murmur3_32(b"", 0xffff_ffff), 0x81f1_6f39);
        assert_eq!(murmur3_32(b"test", 0), 0xba6b_d213);
        assert_eq!(murmur3_32(b"abc", 0), 0xb3dd_93fa);
        assert_eq!(murmur3_32(b"aaaa", 0x9747_b28c), 0x5a97_808a);
        assert_eq!(murmur3_32(b"Hello, world!", 0x9747_b28c), 0x2488_4cba);
        assert_eq!(
            murmur3_32(b"The quick brown fox jumps over the lazy dog", 0x9747_b28c),
            0x2fa8_26cd
        );
    }

    #[test]
    fn deterministic() {
        let key = b"hello world whahtttata";
        for seed in [0, 1, 7, u32::MAX] {
            assert_eq!(murmur3_32(key, seed), murmur3_32(key, seed));
        }
    }

    #[test]
    fn seed_changes_output() {
        assert_ne!(murmur3_32(b"abc", 0), murmur3_32(b"abc", 7));
    }

    #[test]
    fn no_collision_in_corpus() {
        let corpus: [&[u8]; 10] = [
            b"",
            b"a",
            b"ab",
            b"abc",
            b"abcd",
            b"abcde",
            b"hello",
            b"hello world whahtttata",
            b"hell of world whahtttata",
            &[0u8; 64],
        ];

        let hashes: HashSet<u32> = corpus.iter().map(|key| murmur3_32(key, 0)).collect();
        assert_eq!(hashes.len(), corpus.len());
    }
}
