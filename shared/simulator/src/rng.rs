pub use rand_chacha::ChaCha8Rng as SeededRng;

pub fn new_rng(seed: u32) -> SeededRng {
    rand_seeder::Seeder::from(seed).make_rng()
}

#[cfg(test)]
mod test {
    use super::new_rng;
    use rand::Rng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = new_rng(7);
        let mut b = new_rng(7);
        for _ in 0..8 {
            assert_eq!(a.gen::<u64>(), b.gen::<u64>());
        }
    }
}
