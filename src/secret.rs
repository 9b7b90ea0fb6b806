use rand::Rng;

/// Length of the generated JWT secret.
pub const SECRET_LEN: usize = 32;

/// Characters a generated secret may contain.
pub const CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Random string of `len` characters, each drawn uniformly from [`CHARSET`].
///
/// Uses the thread-local CSPRNG. The value is a development default for the
/// generated `.env`, not a long-lived credential.
pub fn generate_secret(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_has_fixed_length() {
        assert_eq!(generate_secret(SECRET_LEN).len(), SECRET_LEN);
        assert_eq!(generate_secret(0), "");
    }

    #[test]
    fn secret_uses_only_charset() {
        for _ in 0..50 {
            let s = generate_secret(SECRET_LEN);
            assert!(s.bytes().all(|b| CHARSET.contains(&b)), "unexpected char in {s}");
        }
    }

    #[test]
    fn consecutive_secrets_differ() {
        assert_ne!(generate_secret(SECRET_LEN), generate_secret(SECRET_LEN));
    }
}
