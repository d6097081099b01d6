use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a quote identifier: `quote_<unix millis>_<9 base-36 chars>`.
///
/// Collisions need two submissions in the same millisecond drawing the same suffix.
/// The store still rejects a duplicate if one ever happens.
pub fn generate_quote_id() -> String {
    generate_quote_id_at(chrono::Utc::now().timestamp_millis())
}

pub fn generate_quote_id_at(millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("quote_{}_{}", millis, suffix)
}
