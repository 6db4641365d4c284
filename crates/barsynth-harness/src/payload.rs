use rand::Rng;

/// Digits drawn for the numeric pass. The EAN windows are cut from its tail.
pub const NUMERIC_LEN: usize = 14;

/// Characters drawn for the alphanumeric pass.
pub const PRINTABLE_LEN: usize = 10;

/// `len` random decimal digits.
pub fn numeric_payload<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10_u8)))
        .collect()
}

/// `len` random printable ASCII characters, space through tilde.
pub fn printable_payload<R: Rng>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.gen_range(0x20..0x7f_u8)))
        .collect()
}
