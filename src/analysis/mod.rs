pub mod diversity;
