use core::iter::zip;

use md5::{Digest, Md5};

use crate::Authenticator;


/// MD5 hash output size, in bytes.
const MD5_OUTPUT_SIZE: usize = 16;

fn xor_slices(output: &mut [u8], pseudo_pad: &[u8]) {
    for (out, pad) in zip(output, pseudo_pad) {
        *out ^= pad;
    }
}

/// Length of a User-Password value once NUL-padded to a multiple of 16 bytes.
pub(crate) const fn padded_password_length(password_length: usize) -> usize {
    if password_length == 0 {
        MD5_OUTPUT_SIZE
    } else {
        password_length.div_ceil(MD5_OUTPUT_SIZE) * MD5_OUTPUT_SIZE
    }
}

/// Obfuscates a NUL-padded User-Password value in place, as specified in [RFC2865 section 5.2].
///
/// Each 16-byte block is XORed with `MD5(secret + previous)`, where `previous` is the request
/// authenticator for the first block and the previous obfuscated block afterwards.
///
/// [RFC2865 section 5.2]: https://www.rfc-editor.org/rfc/rfc2865.html#section-5.2
pub(crate) fn hide_password(value: &mut [u8], secret: &[u8], authenticator: &Authenticator) {
    // the secret prefixes every hash invocation, so it only needs to be hashed once
    let mut prefix_hasher = Md5::new();
    prefix_hasher.update(secret);

    let mut previous = *authenticator.as_bytes();
    let mut pseudo_pad = [0; MD5_OUTPUT_SIZE];

    for chunk in value.chunks_mut(MD5_OUTPUT_SIZE) {
        let mut hasher = prefix_hasher.clone();
        hasher.update(previous);
        hasher.finalize_into((&mut pseudo_pad).into());

        xor_slices(chunk, &pseudo_pad);

        // chaining continues from the obfuscated block
        previous[..chunk.len()].copy_from_slice(chunk);
    }
}

/// Reverses [`hide_password`] in place.
pub(crate) fn reveal_password(value: &mut [u8], secret: &[u8], authenticator: &Authenticator) {
    let mut prefix_hasher = Md5::new();
    prefix_hasher.update(secret);

    let mut previous = *authenticator.as_bytes();
    let mut pseudo_pad = [0; MD5_OUTPUT_SIZE];

    for chunk in value.chunks_mut(MD5_OUTPUT_SIZE) {
        let mut hasher = prefix_hasher.clone();
        hasher.update(previous);
        hasher.finalize_into((&mut pseudo_pad).into());

        // the next block is keyed off of this one before it's revealed
        previous[..chunk.len()].copy_from_slice(chunk);

        xor_slices(chunk, &pseudo_pad);
    }
}

/// Computes the authenticator of a reply packet, per [RFC2865 section 3]:
/// `MD5(code + identifier + length + request authenticator + attributes + secret)`.
///
/// `prefix` is the first four bytes of the reply header (code, identifier & length).
///
/// [RFC2865 section 3]: https://www.rfc-editor.org/rfc/rfc2865.html#section-3
pub(crate) fn response_authenticator(
    prefix: &[u8],
    request_authenticator: &Authenticator,
    attributes: &[u8],
    secret: &[u8],
) -> Authenticator {
    let mut hasher = Md5::new();
    hasher.update(prefix);
    hasher.update(request_authenticator.as_bytes());
    hasher.update(attributes);
    hasher.update(secret);

    let mut digest = [0; Authenticator::SIZE];
    hasher.finalize_into((&mut digest).into());

    Authenticator::from(digest)
}
