//! Opaque credential generation for new accounts.

/// Produces a fresh, unguessable token each time it is called.
pub trait KeyGenerator: Send + Sync {
    fn generate_user_key(&self) -> String;
}

/// Default generator: 32 random bytes rendered as 64 hex characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate_user_key(&self) -> String {
        generate_api_key()
    }
}

#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}
