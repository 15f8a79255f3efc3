/// Seeded train/valid/test split of class folders.
pub mod split;
