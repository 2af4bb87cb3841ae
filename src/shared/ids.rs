use getrandom::getrandom;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_SPACE: u32 = 36_u32.pow(4);

fn base36_encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while value > 0 {
        chars.push(BASE36_ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    chars.iter().rev().collect()
}

fn base36_encode_fixed_u32(mut value: u32, width: usize) -> String {
    let mut chars = vec!['0'; width];
    for idx in (0..width).rev() {
        chars[idx] = BASE36_ALPHABET[(value % 36) as usize] as char;
        value /= 36;
    }
    chars.into_iter().collect()
}

/// Compact correlation id for one tool call: `call-<ts36>-<rand4>`.
/// Falls back to a timestamp-only id if the entropy source fails;
/// correlation ids are observability aids, not security tokens.
pub fn generate_call_id() -> String {
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    let ts = base36_encode_u64(now);
    let mut bytes = [0_u8; 4];
    if getrandom(&mut bytes).is_err() {
        return format!("call-{ts}");
    }
    let sample = u32::from_le_bytes(bytes) % SUFFIX_SPACE;
    format!("call-{ts}-{}", base36_encode_fixed_u32(sample, 4))
}
