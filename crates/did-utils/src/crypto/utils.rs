use super::{errors::Error, traits::BYTES_LENGTH_32};

// Seeds of the wrong length are replaced by random bytes.
pub(super) fn generate_seed(initial_seed: &[u8]) -> Result<[u8; BYTES_LENGTH_32], Error> {
    if let Ok(seed) = <[u8; BYTES_LENGTH_32]>::try_from(initial_seed) {
        return Ok(seed);
    }

    let mut seed = [0u8; BYTES_LENGTH_32];
    getrandom::getrandom(&mut seed).map_err(|_| Error::InvalidSeed)?;
    Ok(seed)
}
