use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, Salt,
        SaltString,
    },
};
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

/// Password hashing for stored credentials.
///
/// Argon2id with a random per-password salt and a server-side pepper that
/// never reaches the database. Hashes are PHC strings, so parameters travel
/// with each hash and can be raised later without invalidating old ones.
pub struct PasswordCrypto {
    argon2: Argon2<'static>,
    pepper: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for PasswordCrypto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCrypto")
            .field("params", self.argon2.params())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Error)]
pub enum PasswordCryptoError {
    #[error("password pepper must not be empty")]
    EmptyPepper,
    #[error("invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl From<PasswordHashError> for PasswordCryptoError {
    fn from(err: PasswordHashError) -> Self {
        PasswordCryptoError::PasswordHash(err.to_string())
    }
}

impl PasswordCrypto {
    /// ~19 MiB and 2 passes, the OWASP baseline for Argon2id.
    const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;
    const DEFAULT_ITERATIONS: u32 = 2;
    const DEFAULT_PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = Salt::RECOMMENDED_LENGTH;

    pub fn new(pepper: impl AsRef<[u8]>) -> Result<Self, PasswordCryptoError> {
        Self::with_params(
            pepper,
            ParamsBuilder::new()
                .m_cost(Self::DEFAULT_MEMORY_KIB)
                .t_cost(Self::DEFAULT_ITERATIONS)
                .p_cost(Self::DEFAULT_PARALLELISM)
                .output_len(32)
                .build()
                .map_err(|err| PasswordCryptoError::InvalidArgon2Params(err.to_string()))?,
        )
    }

    /// Caller-chosen Argon2 parameters, mainly so tests can hash cheaply.
    pub fn with_params(
        pepper: impl AsRef<[u8]>,
        params: Params,
    ) -> Result<Self, PasswordCryptoError> {
        let pepper = pepper.as_ref();
        if pepper.is_empty() {
            return Err(PasswordCryptoError::EmptyPepper);
        }

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::default(), params),
            pepper: Zeroizing::new(pepper.to_vec()),
        })
    }

    /// Smallest parameters Argon2 accepts. Never use outside tests.
    pub fn insecure_for_tests(pepper: impl AsRef<[u8]>) -> Result<Self, PasswordCryptoError> {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)
            .map_err(|err| PasswordCryptoError::InvalidArgon2Params(err.to_string()))?;
        Self::with_params(pepper, params)
    }

    pub fn hash_password(&self, password: &str) -> Result<String, PasswordCryptoError> {
        let material = self.peppered(password);

        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| PasswordCryptoError::PasswordHash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)?;

        Ok(self.argon2.hash_password(&material, &salt)?.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PasswordCryptoError> {
        let parsed = PasswordHash::new(password_hash)?;
        let material = self.peppered(password);

        Ok(self.argon2.verify_password(&material, &parsed).is_ok())
    }

    fn peppered(&self, password: &str) -> Zeroizing<Vec<u8>> {
        let mut material = Zeroizing::new(Vec::with_capacity(password.len() + self.pepper.len()));
        material.extend_from_slice(password.as_bytes());
        material.extend_from_slice(&self.pepper);
        material
    }
}
