pub mod hermes;
