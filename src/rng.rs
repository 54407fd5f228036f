/// Source of random bytes for `CXNN`. Abstracted so tests can script it.
#[cfg_attr(test, mockall::automock)]
pub trait Chip8Rng {
    fn random_u8(&self) -> u8;
}

impl Chip8Rng for fastrand::Rng {
    fn random_u8(&self) -> u8 {
        self.u8(..)
    }
}

#[cfg(test)]
mod tests {
    use super::Chip8Rng;

    #[test]
    fn seeded_fastrand_is_repeatable() {
        let a = fastrand::Rng::with_seed(7);
        let b = fastrand::Rng::with_seed(7);
        let first: Vec<u8> = (0..8).map(|_| a.random_u8()).collect();
        let second: Vec<u8> = (0..8).map(|_| b.random_u8()).collect();
        assert_eq!(first, second);
    }
}
