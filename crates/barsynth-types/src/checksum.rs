//! Check-character arithmetic shared by encoders and decoders.

use crate::tables::CODE128_MODULUS;

/// EAN/UPC check digit over `digits` (values `0..=9`).
///
/// Weights alternate 3/1 counting from the check position, so the same
/// routine serves EAN-13 (12 digits in) and EAN-8 (7 digits in).
pub fn ean_check_digit(digits: &[u8]) -> u8 {
    let n = digits.len();
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            let d = u32::from(d);
            if (i ^ n) & 1 == 1 { d * 3 } else { d }
        })
        .sum();
    #[allow(clippy::cast_possible_truncation)]
    let chk = ((10 - sum % 10) % 10) as u8;
    chk
}

/// Code 128 check value: `(start + Σ (i+1) * value_i) mod 103`.
pub fn code128_checksum<I>(start: u8, values: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let sum = values
        .into_iter()
        .zip(1_u32..)
        .fold(u32::from(start), |acc, (v, weight)| {
            (acc + weight * u32::from(v)) % CODE128_MODULUS
        });
    #[allow(clippy::cast_possible_truncation)]
    let chk = (sum % CODE128_MODULUS) as u8;
    chk
}
