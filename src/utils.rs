use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Width of every one-time code we issue.
pub const OTP_CODE_LENGTH: usize = 4;

pub fn current_time_millis() -> i64 {
    let since_the_epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards");

    since_the_epoch.as_millis() as i64
}

pub fn gen_random_string() -> String {
    // encode 32 bytes of random in base64
    base64_url::encode(&thread_rng().gen::<[u8; 32]>())
}

// fixed-width code drawn uniformly from the digit alphabet
pub fn gen_otp_code() -> String {
    let mut rng = thread_rng();
    (0..OTP_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10)))
        .collect()
}

pub fn hash_str(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key);
    let result = hasher.finalize();
    base64_url::encode(&result)
}

// emails are compared case-insensitively everywhere
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_email_valid(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
        }
        None => false,
    }
}

pub fn is_name_valid(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.len() <= 100
}

pub fn is_otp_code_valid(code: &str) -> bool {
    code.len() == OTP_CODE_LENGTH && code.chars().all(|x| x.is_ascii_digit())
}

pub fn is_secure_password(password: &str) -> bool {
    let len = password.len();

    let numdigits = password.matches(char::is_numeric).count();

    len >= 8 && numdigits > 0
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, argon2::Error> {
    argon2::verify_encoded(password_hash, password.as_bytes())
}

pub fn hash_password(password: &str) -> Result<String, argon2::Error> {
    argon2::hash_encoded(
        // password
        password.as_bytes(),
        // salt
        &thread_rng().gen::<[u8; 32]>(),
        //config
        &argon2::Config::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_codes_are_fixed_width_digits() {
        for _ in 0..64 {
            let code = gen_otp_code();
            assert_eq!(code.len(), OTP_CODE_LENGTH);
            assert!(code.chars().all(|x| x.is_ascii_digit()));
        }
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("Secret123!").unwrap();
        assert!(verify_password("Secret123!", &hash).unwrap());
        assert!(!verify_password("wrongpass1", &hash).unwrap());
    }

    #[test]
    fn password_strength() {
        assert!(is_secure_password("Secret123!"));
        assert!(!is_secure_password("short1"));
        assert!(!is_secure_password("nodigitshere"));
    }

    #[test]
    fn email_normalization_and_shape() {
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
        assert!(is_email_valid("a@x.com"));
        assert!(!is_email_valid("a@com"));
        assert!(!is_email_valid("@x.com"));
        assert!(!is_email_valid("ax.com"));
    }
}
