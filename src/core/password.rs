//! crypt(3)-compatible hashing for rotation proofs.

use crate::error::Error;

/// Hash `password` with a crypt setting such as `$6$salt$` or `$1$salt$`.
pub fn hash(password: &str, salt: &str) -> Result<String, Error> {
    pwhash::unix::crypt(password, salt).map_err(|e| Error::Crypt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_crypt_keeps_setting() {
        let hashed = hash("password", "$1$5pZSV9va$").unwrap();
        assert!(hashed.starts_with("$1$5pZSV9va$"));
        assert!(hashed.len() > "$1$5pZSV9va$".len());
    }

    #[test]
    fn test_sha512_is_deterministic_per_salt() {
        let a = hash("secret", "$6$abcdefgh$").unwrap();
        let b = hash("secret", "$6$abcdefgh$").unwrap();
        let c = hash("secret", "$6$hgfedcba$").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("$6$abcdefgh$"));
    }

    #[test]
    fn test_full_hash_as_salt_verifies() {
        let stored = hash("secret", "$5$saltsalt$").unwrap();
        assert_eq!(hash("secret", &stored).unwrap(), stored);
        assert_ne!(hash("wrong", &stored).unwrap(), stored);
    }
}
