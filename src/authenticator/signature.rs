use super::SignatureError;

/// Raw P-256 signature length: 32-byte r followed by 32-byte s.
pub const P1363_LEN: usize = 64;

/// DER-encode a raw P-256 ECDSA signature (r || s) as `SEQUENCE { INTEGER r, INTEGER s }`.
pub fn p1363_to_der(raw: &[u8]) -> Result<Vec<u8>, SignatureError> {
    if raw.len() != P1363_LEN {
        return Err(SignatureError::MalformedSignature(raw.len()));
    }
    let (r, s) = raw.split_at(P1363_LEN / 2);
    let r_der = der_integer(r);
    let s_der = der_integer(s);
    // At most 2 * (2 + 33) bytes, so short-form lengths always suffice.
    let inner_len = (r_der.len() + s_der.len()) as u8;
    let mut out = Vec::with_capacity(2 + inner_len as usize);
    out.push(0x30);
    out.push(inner_len);
    out.extend_from_slice(&r_der);
    out.extend_from_slice(&s_der);
    Ok(out)
}

fn der_integer(n: &[u8]) -> Vec<u8> {
    let start = n.iter().position(|&b| b != 0).unwrap_or(n.len());
    let n = if start == n.len() { &[0u8][..] } else { &n[start..] };
    let pad = n[0] & 0x80 != 0;
    let mut out = Vec::with_capacity(3 + n.len());
    out.push(0x02);
    out.push(n.len() as u8 + pad as u8);
    if pad {
        out.push(0);
    }
    out.extend_from_slice(n);
    out
}
